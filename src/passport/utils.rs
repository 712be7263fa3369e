//! Small helpers for profile validation and environment parsing.

use regex::Regex;
use url::Url;

/// Basic email format check.
pub(crate) fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email))
}

/// Accepts absolute http(s) URLs and scheme-less hosts such as `www.example.com`.
pub(crate) fn is_url(value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return false;
    }
    if value.contains("://") {
        return Url::parse(value).is_ok_and(|url| {
            matches!(url.scheme(), "http" | "https") && url.host_str().is_some()
        });
    }
    Url::parse(&format!("http://{value}")).is_ok_and(|url| {
        url.host_str()
            .is_some_and(|host| host.contains('.') || host == "localhost")
    })
}

/// Drop the `?sz=` size hint Google appends to profile image URLs.
pub(crate) fn strip_size_param(url: &str) -> &str {
    url.split("?sz=").next().unwrap_or(url)
}

/// Lenient boolean parsing for `AUTH_*_ENABLED` style variables.
pub(crate) fn env_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "t" | "yes" | "y" | "on" | "1"
    )
}
