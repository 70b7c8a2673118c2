//! Anycast provider classification.
//!
//! Anycast addresses are announced from many locations, so their country code says
//! little about where a request is served. For those, the operator is identified
//! from the organization/ASN text and its logo is shown instead of a flag.

use crate::lookup::IpDetails;

/// Keyword -> provider identifier, in match priority order.
///
/// The first keyword that is a substring of the lower-cased text wins, so the
/// order of this table is significant.
pub const ANYCAST_PROVIDERS: &[(&str, &str)] = &[
    ("cloudflare", "cloudflare"),
    ("google", "google"),
    ("akamai", "akamai"),
    ("fastly", "fastly"),
    ("amazon", "aws"),
    ("aws", "aws"),
    ("tencent", "qq"),
    ("ace", "qq"),
    ("microsoft", "azure"),
    ("azure", "azure"),
    ("aliyun", "aliyun"),
    ("alibaba", "aliyun"),
];

/// Provider identifier of Cloudflare, whose edges disclose their colo.
pub const CLOUDFLARE: &str = "cloudflare";

/// Returns the provider identifier of the first keyword contained in `text`.
///
/// Matching is case-insensitive.
pub fn classify(text: &str) -> Option<&'static str> {
    let text = text.to_lowercase();
    ANYCAST_PROVIDERS
        .iter()
        .find(|(keyword, _)| text.contains(keyword))
        .map(|(_, provider)| *provider)
}

/// Classifies a detail record by its `org` and `asn` text.
///
/// Records without the anycast flag are never classified.
pub fn provider_for(details: &IpDetails) -> Option<&'static str> {
    if !details.is_anycast() {
        return None;
    }
    let text = format!(
        "{} {}",
        details.org().unwrap_or_default(),
        details.asn().unwrap_or_default()
    );
    classify(&text)
}
