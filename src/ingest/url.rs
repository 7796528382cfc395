use url::Url;

/// Outcome of normalizing a raw user-supplied link.
///
/// Invalid input is reported, never raised: the caller decides whether to
/// reject the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedUrl {
    pub url: String,
    pub is_valid: bool,
}

/// Normalizes a raw link string into an absolute URL.
///
/// A link without an explicit `http://` or `https://` scheme gets `https://`
/// prepended before parsing. Input that carries a different explicit scheme
/// (`ftp://`, `file://`, ...), or that fails to parse, is reported as invalid.
pub fn normalize_url(link: &str) -> NormalizedUrl {
    let link = link.trim();
    let has_http_scheme = link.starts_with("http://") || link.starts_with("https://");
    let url = if has_http_scheme {
        link.to_string()
    } else {
        format!("https://{link}")
    };

    let is_valid = if !has_http_scheme && has_foreign_scheme(link) {
        tracing::debug!(link, "rejected link with non-http scheme");
        false
    } else {
        match Url::parse(&url) {
            Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
            Err(err) => {
                tracing::debug!(link, error = %err, "rejected unparseable link");
                false
            }
        }
    };

    NormalizedUrl { url, is_valid }
}

/// True when the input starts with some `scheme://` other than http(s).
/// A `://` occurring after the first path segment (e.g. inside a query
/// string) is not a scheme.
fn has_foreign_scheme(link: &str) -> bool {
    match link.find("://") {
        Some(idx) => !link[..idx].contains('/'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepends_https_when_scheme_is_missing() {
        let result = normalize_url("example.com/x");
        assert_eq!(result.url, "https://example.com/x");
        assert!(result.is_valid);
    }

    #[test]
    fn keeps_explicit_http_scheme() {
        let result = normalize_url("http://example.com");
        assert_eq!(result.url, "http://example.com");
        assert!(result.is_valid);
    }

    #[test]
    fn keeps_explicit_https_scheme() {
        let result = normalize_url("https://youtu.be/abc");
        assert_eq!(result.url, "https://youtu.be/abc");
        assert!(result.is_valid);
    }

    #[test]
    fn rejects_non_http_scheme() {
        assert!(!normalize_url("ftp://x").is_valid);
        assert!(!normalize_url("file:///etc/hosts").is_valid);
    }

    #[test]
    fn rejects_unparseable_input() {
        assert!(!normalize_url("http://").is_valid);
        assert!(!normalize_url("https://not a host").is_valid);
    }

    #[test]
    fn scheme_in_query_string_is_not_a_scheme() {
        let result = normalize_url("example.com/a?next=https://b.com");
        assert_eq!(result.url, "https://example.com/a?next=https://b.com");
        assert!(result.is_valid);
    }
}
