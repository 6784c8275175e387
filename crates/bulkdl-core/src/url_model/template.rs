//! Request URL construction from a base template and a numeric ID.

use std::fmt;

const ID_PLACEHOLDER: &str = "{id}";

/// Errors raised while validating a `base_url` template.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("template is empty")]
    Empty,
    #[error("{url:?} does not parse as a URL: {source}")]
    Parse {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("unsupported scheme {0:?} (expected http or https)")]
    Scheme(String),
}

/// A validated request URL template.
///
/// Every `{id}` in the template is replaced by the decimal ID. A template without
/// the placeholder gets the ID appended, so `...&download_id=` works as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    raw: String,
}

impl UrlTemplate {
    pub fn parse(raw: &str) -> Result<Self, TemplateError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(TemplateError::Empty);
        }
        let template = UrlTemplate {
            raw: raw.to_string(),
        };
        let sample = template.render(0);
        let parsed = url::Url::parse(&sample).map_err(|source| TemplateError::Parse {
            url: sample.clone(),
            source,
        })?;
        match parsed.scheme() {
            "http" | "https" => Ok(template),
            other => Err(TemplateError::Scheme(other.to_string())),
        }
    }

    pub fn render(&self, id: u64) -> String {
        if self.raw.contains(ID_PLACEHOLDER) {
            self.raw.replace(ID_PLACEHOLDER, &id.to_string())
        } else {
            format!("{}{}", self.raw, id)
        }
    }
}

impl fmt::Display for UrlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_id_without_placeholder() {
        let t = UrlTemplate::parse(
            "https://shop.example.com/index.php?route=product/download&download_id=",
        )
        .unwrap();
        assert_eq!(
            t.render(42),
            "https://shop.example.com/index.php?route=product/download&download_id=42"
        );
    }

    #[test]
    fn substitutes_every_placeholder() {
        let t = UrlTemplate::parse("http://127.0.0.1:8080/files/{id}?copy={id}").unwrap();
        assert_eq!(t.render(7), "http://127.0.0.1:8080/files/7?copy=7");
    }

    #[test]
    fn rejects_empty_and_relative() {
        assert!(matches!(UrlTemplate::parse("  "), Err(TemplateError::Empty)));
        assert!(matches!(
            UrlTemplate::parse("/download?id="),
            Err(TemplateError::Parse { .. })
        ));
    }

    #[test]
    fn rejects_non_http_scheme() {
        match UrlTemplate::parse("ftp://example.com/{id}") {
            Err(TemplateError::Scheme(s)) => assert_eq!(s, "ftp"),
            other => panic!("expected scheme error, got {:?}", other),
        }
    }
}
