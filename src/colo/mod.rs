//! Cloudflare edge-location (colo) probing.
//!
//! Cloudflare edges answer `/cdn-cgi/trace` on any anycast address they serve and
//! include a `colo=<IATA code>` line naming the data center that handled the
//! request. An optional directory maps those codes to a location name and country.

use std::collections::HashMap;
use std::net::IpAddr;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::TRACE_PATH;

static COLO_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"colo=([A-Z]+)").expect("static regex is valid"));

/// Result of a colo probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "code", rename_all = "snake_case")]
pub enum ColoOutcome {
    /// The edge disclosed its colo code
    Found(String),
    /// The edge answered without a colo line
    Unknown,
    /// The probe failed (network error or timeout)
    Failed,
}

/// Extracts the colo code from a trace body.
pub fn extract_colo(body: &str) -> Option<String> {
    COLO_PATTERN
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Trace URL for an IP, bracketing IPv6 literals.
pub fn trace_url(ip: &str) -> String {
    match ip.parse::<IpAddr>() {
        Ok(IpAddr::V6(v6)) => format!("http://[{}]{}", v6, TRACE_PATH),
        _ => format!("http://{}{}", ip, TRACE_PATH),
    }
}

/// Probes the trace endpoint on `ip`.
pub async fn probe_colo(client: &reqwest::Client, ip: &str, timeout: Duration) -> ColoOutcome {
    probe_colo_at(client, &trace_url(ip), timeout).await
}

/// Probes a trace endpoint at an explicit URL.
///
/// The body is inspected whatever the status code.
pub async fn probe_colo_at(client: &reqwest::Client, url: &str, timeout: Duration) -> ColoOutcome {
    let body = match client.get(url).timeout(timeout).send().await {
        Ok(response) => response.text().await,
        Err(e) => Err(e),
    };
    match body {
        Ok(body) => match extract_colo(&body) {
            Some(code) => ColoOutcome::Found(code),
            None => ColoOutcome::Unknown,
        },
        Err(e) => {
            log::debug!("Colo probe {} failed: {}", url, e);
            ColoOutcome::Failed
        }
    }
}

/// Location of a colo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColoLocation {
    /// Human-readable location (usually the city)
    pub name: String,
    /// Two-letter country code
    #[serde(default)]
    pub cca2: Option<String>,
}

/// Colo code -> location, as published in `cloudflare.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ColoDirectory(HashMap<String, ColoLocation>);

impl ColoDirectory {
    /// Loads a directory from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read colo directory {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to parse colo directory {}", path.display()))
    }

    /// Parses a directory from JSON text.
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Location of `code`, if listed.
    pub fn get(&self, code: &str) -> Option<&ColoLocation> {
        self.0.get(code)
    }

    /// Number of listed colos.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no colo is listed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
