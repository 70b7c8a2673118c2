//! Egress IP resolution.
//!
//! Four plaintext endpoints report the address a request left the network from:
//! a domestic and a global service, each over IPv4 and IPv6. They are queried
//! concurrently with a short timeout. A slot is written to the session store only
//! when its endpoint answered with a non-empty body and a token is configured;
//! any failure leaves whatever the slot held before.

use std::time::Duration;

use futures::stream::FuturesUnordered;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use crate::config::EgressEndpoints;
use crate::error_handling::{categorize_fetch_error, FailureStats, FetchError};
use crate::lookup::{DetailClient, IpRecord};
use crate::store::{StorageKey, Store, StoreExt};

/// One of the four egress endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EgressSlot {
    /// Domestic service, IPv4
    DomesticV4,
    /// Domestic service, IPv6
    DomesticV6,
    /// Global service, IPv4
    GlobalV4,
    /// Global service, IPv6
    GlobalV6,
}

/// Fetches a plaintext IP from `url`, trimmed.
///
/// # Errors
///
/// Returns `FetchError::Request` on network errors, timeouts and non-2xx answers,
/// and `FetchError::EmptyBody` when the trimmed body is empty.
pub async fn fetch_plain_ip(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> Result<String, FetchError> {
    let body = client
        .get(url)
        .timeout(timeout)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    let ip = body.trim();
    if ip.is_empty() {
        return Err(FetchError::EmptyBody(url.to_string()));
    }
    Ok(ip.to_string())
}

/// Shared pieces needed to refresh the egress slots.
pub struct EgressResolver<'a> {
    /// HTTP client
    pub client: &'a reqwest::Client,
    /// Detail lookup client
    pub details: &'a DetailClient,
    /// Endpoint URLs
    pub endpoints: &'a EgressEndpoints,
    /// Per-request timeout
    pub timeout: Duration,
    /// Failure counters
    pub stats: &'a FailureStats,
}

impl EgressResolver<'_> {
    /// Resolves one slot. Returns the record to store, or `None` when nothing
    /// should be written.
    pub async fn resolve(&self, slot: EgressSlot, token: Option<&str>) -> Option<IpRecord> {
        let url = self.endpoints.url(slot);
        let ip = match fetch_plain_ip(self.client, url, self.timeout).await {
            Ok(ip) => ip,
            Err(e) => {
                let kind = categorize_fetch_error(&e);
                self.stats.record(kind);
                log::debug!("Egress {:?} skipped ({}): {}", slot, kind.as_str(), e);
                return None;
            }
        };

        let Some(token) = token else {
            log::debug!("Egress {:?} resolved to {} but no token is set", slot, ip);
            return None;
        };

        let details = self.details.fetch_details(&ip, token).await;
        Some(IpRecord { ip, details })
    }

    /// Resolves all four slots concurrently and writes the successful ones to
    /// `session`. Returns the slots that were written, in completion order.
    pub async fn refresh_all(&self, session: &dyn Store, token: Option<&str>) -> Vec<EgressSlot> {
        let mut pending: FuturesUnordered<_> = EgressSlot::iter()
            .map(|slot| async move { (slot, self.resolve(slot, token).await) })
            .collect();

        let mut written = Vec::new();
        while let Some((slot, record)) = pending.next().await {
            let Some(record) = record else { continue };
            match session.set(&StorageKey::Egress(slot), &record) {
                Ok(()) => {
                    log::info!("Egress {:?}: {}", slot, record.ip);
                    written.push(slot);
                }
                Err(e) => log::warn!("Failed to store egress {:?}: {}", slot, e),
            }
        }
        written
    }
}
