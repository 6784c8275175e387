//! Content-Disposition header parsing as a MIME parameter set.
//!
//! The header must look like `<type>; name=value; ...`. Values are tokens or
//! quoted strings; parameter names are case-insensitive. Anything malformed
//! (missing type, bare parameter, duplicate name) makes the whole header
//! unusable, which callers treat as "no filename".

use std::collections::BTreeMap;

/// A parsed Content-Disposition value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disposition {
    /// Disposition type, lowercased (`attachment`, `inline`, ...).
    pub kind: String,
    /// Parameters keyed by lowercased name, values unquoted.
    pub params: BTreeMap<String, String>,
}

impl Disposition {
    /// The filename parameter. RFC 5987 `filename*` takes precedence over `filename`.
    pub fn filename(&self) -> Option<String> {
        if let Some(decoded) = self.params.get("filename*").and_then(|v| decode_ext_value(v)) {
            if !decoded.is_empty() {
                return Some(decoded);
            }
        }
        self.params
            .get("filename")
            .filter(|v| !v.is_empty())
            .cloned()
    }
}

/// Parses a raw Content-Disposition header value.
pub fn parse_disposition(header_value: &str) -> Option<Disposition> {
    let mut parts = split_params(header_value).into_iter();
    let kind = parts.next()?.trim().to_ascii_lowercase();
    if !is_token(&kind) {
        return None;
    }

    let mut params = BTreeMap::new();
    for part in parts {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let (name, value) = part.split_once('=')?;
        let name = name.trim().to_ascii_lowercase();
        if !is_token(&name) {
            return None;
        }
        let value = value.trim();
        let value = match value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
        {
            Some(inner) => unescape_quoted(inner),
            None if is_token(value) => value.to_string(),
            None => return None,
        };
        if params.insert(name, value).is_some() {
            return None;
        }
    }

    Some(Disposition { kind, params })
}

/// Extracts the filename from a raw Content-Disposition header value.
pub fn parse_content_disposition_filename(header_value: &str) -> Option<String> {
    parse_disposition(header_value)?.filename()
}

/// Splits on `;` outside quoted strings.
fn split_params(value: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;
    for (i, c) in value.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                out.push(&value[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    out.push(&value[start..]);
    out
}

fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.chars().all(|c| {
            c.is_ascii()
                && !c.is_ascii_control()
                && c != ' '
                && !"()<>@,;:\\\"/[]?=".contains(c)
        })
}

/// Decode backslash escapes inside a quoted-string value.
fn unescape_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// Decodes an RFC 5987 `charset'language'percent-encoded` value.
/// Only UTF-8 and US-ASCII charsets are understood.
fn decode_ext_value(value: &str) -> Option<String> {
    let mut pieces = value.splitn(3, '\'');
    let charset = pieces.next()?;
    let _language = pieces.next()?;
    let encoded = pieces.next()?;
    if !charset.eq_ignore_ascii_case("utf-8") && !charset.eq_ignore_ascii_case("us-ascii") {
        return None;
    }
    Some(percent_decode(encoded))
}

fn percent_decode(input: &str) -> String {
    let mut out = Vec::with_capacity(input.len());
    let bytes = input.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(high), Some(low)) = (hex_digit(bytes[i + 1]), hex_digit(bytes[i + 2])) {
                out.push(high << 4 | low);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
