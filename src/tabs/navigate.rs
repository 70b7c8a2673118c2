//! Page visits.
//!
//! Visiting a URL stands in for a browser navigation: the final response's remote
//! address becomes the main-frame completion event for the tab.

use reqwest::Version;

use super::TabId;
use crate::background::{RequestCompleted, ResourceType};
use crate::error_handling::FetchError;

/// Outcome of visiting a page in a tab.
#[derive(Debug, Clone, PartialEq)]
pub struct PageVisit {
    /// Main-frame completion to feed to the background service
    pub completed: RequestCompleted,
    /// Negotiated protocol in `nextHopProtocol` form (`h2`, `http/1.1`, ...)
    pub protocol: String,
}

/// GETs `url` for `tab_id` and reports the main-frame completion.
///
/// Redirects are followed; the completion carries the final URL and the address
/// of the server that answered it. Non-2xx answers still count as a completed
/// navigation.
pub async fn visit(
    client: &reqwest::Client,
    tab_id: TabId,
    url: &str,
) -> Result<PageVisit, FetchError> {
    let response = client.get(url).send().await?;
    let ip = response.remote_addr().map(|addr| addr.ip().to_string());
    if ip.is_none() {
        log::debug!("No remote address for {}", url);
    }

    Ok(PageVisit {
        completed: RequestCompleted {
            tab_id,
            resource_type: ResourceType::MainFrame,
            ip,
            url: Some(response.url().to_string()),
        },
        protocol: protocol_name(response.version()).to_string(),
    })
}

fn protocol_name(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "http/0.9",
        Version::HTTP_10 => "http/1.0",
        Version::HTTP_11 => "http/1.1",
        Version::HTTP_2 => "h2",
        Version::HTTP_3 => "h3",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_names() {
        assert_eq!(protocol_name(Version::HTTP_11), "http/1.1");
        assert_eq!(protocol_name(Version::HTTP_2), "h2");
        assert_eq!(protocol_name(Version::HTTP_3), "h3");
    }
}
