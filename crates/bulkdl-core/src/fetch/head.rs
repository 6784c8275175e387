//! Response head accumulated from libcurl header callbacks.

/// Status and headers of the final response in a (possibly redirected) exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHead {
    /// HTTP status code (0 until a status line has been seen).
    pub status: u32,
    headers: Vec<(String, String)>,
}

impl ResponseHead {
    /// Feeds one raw header line. A status line starts a new response, so
    /// headers of redirects and `100 Continue` are discarded.
    pub(crate) fn push_line(&mut self, raw: &[u8]) {
        let line = String::from_utf8_lossy(raw);
        let line = line.trim_end();
        if line.is_empty() {
            return;
        }
        if line.starts_with("HTTP/") {
            self.headers.clear();
            self.status = line
                .split_whitespace()
                .nth(1)
                .and_then(|code| code.parse().ok())
                .unwrap_or(0);
            return;
        }
        if let Some((name, value)) = line.split_once(':') {
            self.headers
                .push((name.trim().to_string(), value.trim().to_string()));
        }
    }

    #[cfg(test)]
    pub(crate) fn from_lines(lines: &[&str]) -> Self {
        let mut head = ResponseHead::default();
        for line in lines {
            head.push_line(line.as_bytes());
        }
        head
    }

    /// First value of `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// `Content-Disposition` value if present (filename hint).
    pub fn content_disposition(&self) -> Option<&str> {
        self.header("content-disposition").filter(|v| !v.is_empty())
    }

    pub fn content_length(&self) -> Option<u64> {
        self.header("content-length")?.parse().ok()
    }
}
