//! Filename sanitization for server-supplied names.

/// Linux NAME_MAX.
const NAME_MAX: usize = 255;

/// Sanitizes a server-supplied filename so it names one entry inside the output directory.
///
/// - Replaces NUL, `/`, `\`, and control characters with `_`
/// - Trims leading/trailing spaces and dots (no hidden files, no `..`)
/// - Limits length to 255 bytes on a char boundary, shortening the stem so the
///   extension survives
///
/// Inner spaces and repeated underscores are left as they are.
pub fn sanitize_filename(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| {
            if c == '\0' || c == '/' || c == '\\' || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();

    let trimmed = trim_edges(&replaced);
    if trimmed.len() <= NAME_MAX {
        return trimmed.to_string();
    }

    match trimmed.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() && ext.len() + 2 <= NAME_MAX => {
            let stem = trim_edges(cut_to(stem, NAME_MAX - ext.len() - 1));
            if stem.is_empty() {
                trim_edges(cut_to(trimmed, NAME_MAX)).to_string()
            } else {
                format!("{}.{}", stem, ext)
            }
        }
        _ => trim_edges(cut_to(trimmed, NAME_MAX)).to_string(),
    }
}

fn trim_edges(s: &str) -> &str {
    s.trim_matches(|c: char| c == ' ' || c == '.')
}

/// Longest prefix of `s` no longer than `max` bytes.
fn cut_to(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut take = max;
    while take > 0 && !s.is_char_boundary(take) {
        take -= 1;
    }
    &s[..take]
}
