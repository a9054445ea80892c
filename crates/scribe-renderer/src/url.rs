//! URL allowlisting for link and image targets.
//!
//! Only `http://`, `https://` and `ipfs://` targets are ever emitted. IPFS
//! addresses are rewritten to an HTTP gateway. Everything else (including
//! `javascript:`, `data:` and relative paths) is rejected.

/// Gateway used for `ipfs://` addresses unless configured otherwise.
pub const DEFAULT_IPFS_GATEWAY: &str = "https://ipfs.io/ipfs/";

/// Target emitted in place of a rejected URL.
pub const REJECTED_URL: &str = "#";

const IPFS_SCHEME: &str = "ipfs://";

/// Outcome of normalizing a user-supplied URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SafeUrl {
    /// URL passed the allowlist (possibly rewritten).
    Allowed(String),
    /// URL is empty or uses a scheme that is not allowed.
    Rejected,
}

impl SafeUrl {
    /// The URL to emit, or [`REJECTED_URL`] when rejected.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Allowed(url) => url,
            Self::Rejected => REJECTED_URL,
        }
    }

    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed(_))
    }

    /// Consume into the URL to emit, or [`REJECTED_URL`] when rejected.
    #[must_use]
    pub fn into_string(self) -> String {
        match self {
            Self::Allowed(url) => url,
            Self::Rejected => REJECTED_URL.to_owned(),
        }
    }
}

/// Scheme allowlist with a configurable IPFS gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlPolicy {
    ipfs_gateway: String,
}

impl Default for UrlPolicy {
    fn default() -> Self {
        Self {
            ipfs_gateway: DEFAULT_IPFS_GATEWAY.to_owned(),
        }
    }
}

impl UrlPolicy {
    /// Create a policy using [`DEFAULT_IPFS_GATEWAY`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom IPFS gateway prefix.
    ///
    /// A trailing `/` is appended when missing. The gateway is emitted verbatim
    /// into `href`/`src` attributes and must come from trusted configuration.
    #[must_use]
    pub fn with_gateway(mut self, gateway: impl Into<String>) -> Self {
        let mut gateway = gateway.into();
        if !gateway.ends_with('/') {
            gateway.push('/');
        }
        self.ipfs_gateway = gateway;
        self
    }

    /// Configured IPFS gateway prefix.
    #[must_use]
    pub fn gateway(&self) -> &str {
        &self.ipfs_gateway
    }

    /// Normalize a URL against the allowlist.
    ///
    /// # Examples
    ///
    /// ```
    /// use scribe_renderer::{SafeUrl, UrlPolicy};
    ///
    /// let policy = UrlPolicy::new();
    /// assert_eq!(
    ///     policy.normalize("ipfs://ipfs/QmHash"),
    ///     SafeUrl::Allowed("https://ipfs.io/ipfs/QmHash".to_owned())
    /// );
    /// assert_eq!(policy.normalize("javascript:alert(1)"), SafeUrl::Rejected);
    /// ```
    pub fn normalize(&self, url: &str) -> SafeUrl {
        let url = url.trim();
        if url.is_empty() {
            return SafeUrl::Rejected;
        }

        if let Some(rest) = strip_prefix_ignore_case(url, IPFS_SCHEME) {
            let path = rest.strip_prefix("ipfs/").unwrap_or(rest);
            if path.is_empty() {
                return SafeUrl::Rejected;
            }
            return SafeUrl::Allowed(format!("{}{path}", self.ipfs_gateway));
        }

        if strip_prefix_ignore_case(url, "http://").is_some()
            || strip_prefix_ignore_case(url, "https://").is_some()
        {
            return SafeUrl::Allowed(url.to_owned());
        }

        SafeUrl::Rejected
    }
}

/// Normalize a URL with the default [`UrlPolicy`].
///
/// Returns the allowed URL (trimmed, IPFS rewritten to the public gateway) or
/// `"#"`. The result is not HTML-escaped; escape it before placing it in markup.
///
/// # Examples
///
/// ```
/// use scribe_renderer::normalize_url;
///
/// assert_eq!(normalize_url("https://example.com"), "https://example.com");
/// assert_eq!(normalize_url("ipfs://Qm123/f.png"), "https://ipfs.io/ipfs/Qm123/f.png");
/// assert_eq!(normalize_url("javascript:alert(1)"), "#");
/// assert_eq!(normalize_url(""), "#");
/// ```
pub fn normalize_url(url: &str) -> String {
    UrlPolicy::default().normalize(url).into_string()
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_https_unchanged() {
        assert_eq!(normalize_url("https://example.com"), "https://example.com");
    }

    #[test]
    fn test_http_unchanged() {
        assert_eq!(
            normalize_url("http://example.com/a?b=c"),
            "http://example.com/a?b=c"
        );
    }

    #[test]
    fn test_whitespace_trimmed() {
        assert_eq!(
            normalize_url("  https://example.com/x \n"),
            "https://example.com/x"
        );
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(normalize_url(""), "#");
        assert_eq!(normalize_url("   "), "#");
    }

    #[test]
    fn test_ipfs_rewritten() {
        assert_eq!(
            normalize_url("ipfs://Qm123/f.png"),
            "https://ipfs.io/ipfs/Qm123/f.png"
        );
    }

    #[test]
    fn test_ipfs_redundant_segment_stripped() {
        assert_eq!(
            normalize_url("ipfs://ipfs/Qm123"),
            "https://ipfs.io/ipfs/Qm123"
        );
    }

    #[test]
    fn test_ipfs_without_content_id_rejected() {
        assert_eq!(normalize_url("ipfs://"), "#");
        assert_eq!(normalize_url("ipfs://ipfs/"), "#");
    }

    #[test]
    fn test_script_schemes_rejected() {
        assert_eq!(normalize_url("javascript:alert(1)"), "#");
        assert_eq!(normalize_url("JavaScript:alert(1)"), "#");
        assert_eq!(normalize_url("data:text/html;base64,PHNjcmlwdD4="), "#");
        assert_eq!(normalize_url("vbscript:msgbox"), "#");
    }

    #[test]
    fn test_relative_and_bare_rejected() {
        assert_eq!(normalize_url("/etc/passwd"), "#");
        assert_eq!(normalize_url("page.html"), "#");
        assert_eq!(normalize_url("//evil.example"), "#");
        assert_eq!(normalize_url("example.com"), "#");
    }

    #[test]
    fn test_scheme_match_ignores_case() {
        assert_eq!(normalize_url("HTTPS://Example.com"), "HTTPS://Example.com");
        assert_eq!(
            normalize_url("IPFS://Qm123"),
            "https://ipfs.io/ipfs/Qm123"
        );
    }

    #[test]
    fn test_scheme_must_be_prefix() {
        assert_eq!(normalize_url("javascript:alert('https://x')"), "#");
    }

    #[test]
    fn test_custom_gateway() {
        let policy = UrlPolicy::new().with_gateway("https://gw.example/ipfs");
        assert_eq!(policy.gateway(), "https://gw.example/ipfs/");
        assert_eq!(
            policy.normalize("ipfs://Qm123").as_str(),
            "https://gw.example/ipfs/Qm123"
        );
    }

    #[test]
    fn test_safe_url_accessors() {
        let allowed = SafeUrl::Allowed("https://x".to_owned());
        assert!(allowed.is_allowed());
        assert_eq!(allowed.as_str(), "https://x");
        assert!(!SafeUrl::Rejected.is_allowed());
        assert_eq!(SafeUrl::Rejected.as_str(), "#");
        assert_eq!(SafeUrl::Rejected.into_string(), "#");
    }

    #[test]
    fn test_multibyte_input_does_not_panic() {
        assert_eq!(normalize_url("ü"), "#");
        assert_eq!(normalize_url("日本語のテキスト"), "#");
    }
}
