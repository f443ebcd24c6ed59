//! Absolute URL validation shared by profile, post, and portfolio forms.

use url::Url;

/// Schemes accepted for browsable links and hosted images.
pub const HTTP_SCHEMES: &[&str] = &["http", "https"];
/// Schemes accepted for project links.
pub const PROJECT_SCHEMES: &[&str] = &["http", "https", "ftp"];

/// Reasons a URL is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WebUrlError {
    /// The value did not parse as an absolute URL.
    #[error("must be an absolute URL")]
    Malformed,
    /// The scheme is not in the allowed set.
    #[error("URL scheme `{scheme}` is not allowed")]
    Scheme {
        /// Rejected scheme.
        scheme: String,
    },
}

/// Parse `raw` as an absolute URL whose scheme appears in `schemes`.
///
/// The original spelling is returned so stored values match what users typed.
///
/// # Examples
/// ```
/// use whoami::domain::web_url::{HTTP_SCHEMES, parse_web_url};
///
/// assert!(parse_web_url("https://whoami.page/ada", HTTP_SCHEMES).is_ok());
/// assert!(parse_web_url("javascript:alert(1)", HTTP_SCHEMES).is_err());
/// ```
pub fn parse_web_url(raw: &str, schemes: &[&str]) -> Result<String, WebUrlError> {
    let trimmed = raw.trim();
    let parsed = Url::parse(trimmed).map_err(|_| WebUrlError::Malformed)?;
    if !schemes.contains(&parsed.scheme()) {
        return Err(WebUrlError::Scheme {
            scheme: parsed.scheme().to_owned(),
        });
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(WebUrlError::Malformed);
    }
    Ok(trimmed.to_owned())
}
