//! Detail record data structures.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A detail record as returned by the IP-intelligence API.
///
/// The record is an opaque JSON object kept verbatim, so unknown fields survive a
/// store round-trip and nothing is validated. Accessors read the well-known fields
/// and treat anything missing or of an unexpected type as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IpDetails(Map<String, Value>);

impl IpDetails {
    /// Wraps a raw JSON object.
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// The raw JSON object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// A string field, if present and a string.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Two-letter country code as sent by the API.
    pub fn country(&self) -> Option<&str> {
        self.str_field("country")
    }

    /// Organization string (`"AS13335 Cloudflare, Inc."` on the free tier).
    pub fn org(&self) -> Option<&str> {
        self.str_field("org")
    }

    /// ASN text. Paid tiers send an object; its `asn` member is used.
    pub fn asn(&self) -> Option<&str> {
        match self.0.get("asn")? {
            Value::String(s) => Some(s),
            Value::Object(o) => o.get("asn").and_then(Value::as_str),
            _ => None,
        }
    }

    /// True only when the `anycast` field is the JSON literal `true`.
    pub fn is_anycast(&self) -> bool {
        matches!(self.0.get("anycast"), Some(Value::Bool(true)))
    }

    /// Display text for a field, or `None` when it should not be shown.
    ///
    /// Empty strings, `false`, `null` and arrays are not shown. Objects show
    /// their `name` member, falling back to `asn`.
    pub fn display_field(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(true) => Some("true".to_string()),
            Value::Object(o) => o
                .get("name")
                .or_else(|| o.get("asn"))
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            _ => None,
        }
    }
}

/// An egress IP and the details looked up for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpRecord {
    /// The IP as returned by the plaintext endpoint (trimmed)
    pub ip: String,
    /// Details, `null` when the lookup failed
    pub details: Option<IpDetails>,
}
