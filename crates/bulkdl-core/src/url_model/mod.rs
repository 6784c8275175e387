//! URL templating and filename derivation.
//!
//! Builds request URLs from the configured template and derives local
//! filenames from the Content-Disposition header, falling back to a
//! timestamped `download_<YYYYMMDD_HHMMSS>.bin` name.

mod content_disposition;
mod sanitize;
mod template;

pub use content_disposition::{parse_content_disposition_filename, parse_disposition, Disposition};
pub use sanitize::sanitize_filename;
pub use template::{TemplateError, UrlTemplate};

use chrono::NaiveDateTime;

/// Where a derived filename came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilenameSource {
    ContentDisposition,
    Fallback,
}

impl FilenameSource {
    pub fn as_str(self) -> &'static str {
        match self {
            FilenameSource::ContentDisposition => "content-disposition",
            FilenameSource::Fallback => "fallback",
        }
    }
}

/// A filename chosen for one response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedFilename {
    pub name: String,
    pub source: FilenameSource,
}

/// Timestamped placeholder name, second resolution.
pub fn fallback_filename(now: NaiveDateTime) -> String {
    format!("download_{}.bin", now.format("%Y%m%d_%H%M%S"))
}

/// Derives the filename for a response.
///
/// Uses the `filename` parameter of `content_disposition` when the header parses.
/// With `sanitize` set, the name is passed through [`sanitize_filename`] and a name
/// that sanitizes to nothing counts as absent. Otherwise falls back to
/// [`fallback_filename`] for `now`.
///
/// # Examples
///
/// - `Some("attachment; filename=\"report.pdf\"")` → `"report.pdf"`
/// - `None` at 2024-03-05 14:07:09 → `"download_20240305_140709.bin"`
pub fn derive_filename(
    content_disposition: Option<&str>,
    sanitize: bool,
    now: NaiveDateTime,
) -> DerivedFilename {
    let from_header = content_disposition
        .and_then(parse_content_disposition_filename)
        .map(|name| if sanitize { sanitize_filename(&name) } else { name })
        .filter(|name| !name.is_empty() && name != "." && name != "..");

    match from_header {
        Some(name) => DerivedFilename {
            name,
            source: FilenameSource::ContentDisposition,
        },
        None => DerivedFilename {
            name: fallback_filename(now),
            source: FilenameSource::Fallback,
        },
    }
}

/// Extension of a filename: the text after the last `.`, if any.
pub fn extension_of(name: &str) -> Option<&str> {
    name.rsplit_once('.').map(|(_, ext)| ext)
}
