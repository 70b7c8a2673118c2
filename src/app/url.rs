//! Site URL normalization.

use log::warn;

const INTERNAL_SCHEMES: &[&str] = &["chrome://", "edge://"];

/// True for browser-internal pages, which have no remote address.
pub fn is_browser_internal(url: &str) -> bool {
    INTERNAL_SCHEMES.iter().any(|s| url.starts_with(s))
}

/// Normalizes a URL given on the command line.
///
/// Adds an `https://` prefix when no scheme is given. Browser-internal URLs are
/// returned unchanged. Logs a warning and returns `None` for invalid URLs and
/// schemes other than http/https.
pub fn normalize_site_url(url: &str) -> Option<String> {
    let url = url.trim();
    if is_browser_internal(url) {
        return Some(url.to_string());
    }

    let normalized = if url.contains("://") {
        url.to_string()
    } else {
        format!("https://{url}")
    };

    match url::Url::parse(&normalized) {
        Ok(parsed) => match parsed.scheme() {
            "http" | "https" if parsed.host_str().is_some() => Some(normalized),
            "http" | "https" => {
                warn!("Skipping URL without a host: {url}");
                None
            }
            _ => {
                warn!("Skipping unsupported scheme for URL: {url}");
                None
            }
        },
        Err(_) => {
            warn!("Skipping invalid URL: {url}");
            None
        }
    }
}
