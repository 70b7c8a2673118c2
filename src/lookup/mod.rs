//! IP detail lookup against the IP-intelligence API.
//!
//! [`DetailClient::fetch_details`] issues a single GET to `<base>/<ip>?token=<token>`
//! and parses the JSON body on a 2xx answer. [`DetailClient::lookup_cached`] puts
//! the session detail cache (`ip_cache_<ip>`) in front of it, so each distinct IP
//! is fetched at most once per session. There is no retry and no client-side rate
//! limiting; every failure is logged, counted and reported as "no data".

mod types;

use std::sync::Arc;

use serde_json::Value;

use crate::error_handling::{categorize_fetch_error, FailureStats, FetchError};
use crate::store::{StorageKey, Store, StoreExt};

pub use types::{IpDetails, IpRecord};

/// Client for the IP-intelligence API.
#[derive(Clone)]
pub struct DetailClient {
    client: Arc<reqwest::Client>,
    base_url: String,
    stats: Arc<FailureStats>,
}

impl DetailClient {
    /// Creates a client for the API at `base_url`.
    pub fn new(client: Arc<reqwest::Client>, base_url: &str, stats: Arc<FailureStats>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            stats,
        }
    }

    /// URL queried for `ip`, without the token.
    pub fn detail_url(&self, ip: &str) -> String {
        format!("{}/{}", self.base_url, ip)
    }

    /// Fetches details for `ip`. Returns `None` on any failure.
    pub async fn fetch_details(&self, ip: &str, token: &str) -> Option<IpDetails> {
        match self.try_fetch_details(ip, token).await {
            Ok(details) => Some(details),
            Err(e) => {
                let kind = categorize_fetch_error(&e);
                self.stats.record(kind);
                log::warn!("API error {} ({}): {}", ip, kind.as_str(), e);
                None
            }
        }
    }

    async fn try_fetch_details(&self, ip: &str, token: &str) -> Result<IpDetails, FetchError> {
        let url = self.detail_url(ip);
        log::debug!("Looking up details for {}", ip);

        let response = self
            .client
            .get(&url)
            .query(&[("token", token)])
            .send()
            .await?
            .error_for_status()?;

        match response.json::<Value>().await? {
            Value::Object(map) => Ok(IpDetails::from_map(map)),
            other => Err(FetchError::Unexpected {
                url,
                reason: format!("expected a JSON object, got {}", json_kind(&other)),
            }),
        }
    }

    /// Cache-backed lookup: reads `ip_cache_<ip>` from `session` first and only
    /// fetches on a miss. Successful fetches are written back.
    pub async fn lookup_cached(
        &self,
        session: &dyn Store,
        ip: &str,
        token: &str,
    ) -> Option<IpDetails> {
        let key = StorageKey::DetailCache(ip.to_string());

        match session.get::<IpDetails>(&key) {
            Ok(Some(details)) => {
                log::debug!("Detail cache hit for {}", ip);
                return Some(details);
            }
            Ok(None) => {}
            Err(e) => log::warn!("Ignoring unreadable cache entry for {}: {}", ip, e),
        }

        let details = self.fetch_details(ip, token).await?;
        if let Err(e) = session.set(&key, &details) {
            log::warn!("Failed to cache details for {}: {}", ip, e);
        }
        Some(details)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
