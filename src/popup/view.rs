//! Card view models built from the `getData` response.

use std::path::PathBuf;

use serde::Serialize;

use crate::anycast::{provider_for, CLOUDFLARE};
use crate::background::DataResponse;
use crate::colo::{ColoDirectory, ColoOutcome};
use crate::config::{FLAGS_SVG_DIR, UNKNOWN_FLAG};
use crate::icon::{resolve_icon_code, IconResolver};
use crate::lookup::{IpDetails, IpRecord};

const ANYCAST_ROWS: &[&str] = &["org", "asn"];
const UNICAST_ROWS: &[&str] = &["city", "region", "country", "org", "asn"];

/// What a card describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    /// The active tab's site
    Site,
    /// An IPv4 egress address
    Ipv4,
    /// An IPv6 egress address
    Ipv6,
}

impl CardKind {
    /// Card title.
    pub fn title(self) -> &'static str {
        match self {
            CardKind::Site => "Site",
            CardKind::Ipv4 => "IPv4",
            CardKind::Ipv6 => "IPv6",
        }
    }
}

/// One labelled detail line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailRow {
    /// Field name
    pub label: &'static str,
    /// Display value
    pub value: String,
}

/// State of the colo row on a Cloudflare site card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ColoView {
    /// Probe not finished yet
    Probing,
    /// The edge disclosed its colo
    Found {
        /// IATA-style colo code
        code: String,
        /// Location name from the colo directory
        name: Option<String>,
        /// Mini flag for the location's country, when the asset exists
        flag: Option<PathBuf>,
    },
    /// The edge answered without a colo
    Unknown,
    /// The probe failed
    Failed,
}

/// A rendered IP card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    /// Card kind
    pub kind: CardKind,
    /// The IP
    pub ip: String,
    /// Flag name (provider, country code or `unknown`)
    pub flag: String,
    /// Flag asset shown on the card
    pub flag_path: PathBuf,
    /// Whether the anycast badge is shown
    pub anycast: bool,
    /// Detail rows, absent fields skipped
    pub rows: Vec<DetailRow>,
    /// Colo row, only on Cloudflare site cards
    pub colo: Option<ColoView>,
    /// True when the lookup returned nothing ("no info")
    pub no_info: bool,
}

/// Builds a card for `ip`.
pub fn card_view(
    kind: CardKind,
    ip: &str,
    details: Option<&IpDetails>,
    icons: &IconResolver,
) -> CardView {
    let flag = resolve_icon_code(details).as_str().to_string();
    let flag_path = icons.card_flag(&flag);

    let Some(details) = details else {
        return CardView {
            kind,
            ip: ip.to_string(),
            flag,
            flag_path,
            anycast: false,
            rows: Vec::new(),
            colo: None,
            no_info: true,
        };
    };

    let anycast = details.is_anycast();
    let fields = if anycast { ANYCAST_ROWS } else { UNICAST_ROWS };
    let rows = fields
        .iter()
        .filter_map(|&label| {
            details
                .display_field(label)
                .map(|value| DetailRow { label, value })
        })
        .collect();

    let colo = (kind == CardKind::Site && provider_for(details) == Some(CLOUDFLARE))
        .then_some(ColoView::Probing);

    CardView {
        kind,
        ip: ip.to_string(),
        flag,
        flag_path,
        anycast,
        rows,
        colo,
        no_info: false,
    }
}

fn record_card(kind: CardKind, record: &IpRecord, icons: &IconResolver) -> CardView {
    card_view(kind, &record.ip, record.details.as_ref(), icons)
}

/// Network section layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum NetworkView {
    /// Domestic and global egress are in different countries
    Split {
        /// Domestic cards (v4 then v6)
        domestic: Vec<CardView>,
        /// Global cards (v4 then v6)
        global: Vec<CardView>,
    },
    /// One v4 and one v6 card, global preferred
    Merged {
        /// The cards
        cards: Vec<CardView>,
    },
    /// No egress data yet
    Detecting,
}

fn pair_country(v4: Option<&IpRecord>, v6: Option<&IpRecord>) -> String {
    fn country(r: Option<&IpRecord>) -> Option<&str> {
        r.and_then(|r| r.details.as_ref())
            .and_then(IpDetails::country)
            .filter(|c| !c.is_empty())
    }
    country(v4)
        .or_else(|| country(v6))
        .unwrap_or_default()
        .to_uppercase()
}

fn pair_cards(v4: Option<&IpRecord>, v6: Option<&IpRecord>, icons: &IconResolver) -> Vec<CardView> {
    let mut cards = Vec::new();
    if let Some(r) = v4 {
        cards.push(record_card(CardKind::Ipv4, r, icons));
    }
    if let Some(r) = v6 {
        cards.push(record_card(CardKind::Ipv6, r, icons));
    }
    cards
}

/// Lays out the four egress records.
pub fn network_view(data: &DataResponse, icons: &IconResolver) -> NetworkView {
    let (dom_v4, dom_v6) = (data.dom_ipv4.as_ref(), data.dom_ipv6.as_ref());
    let (glob_v4, glob_v6) = (data.glob_ipv4.as_ref(), data.glob_ipv6.as_ref());

    let has_domestic = dom_v4.is_some() || dom_v6.is_some();
    let has_global = glob_v4.is_some() || glob_v6.is_some();

    if has_domestic
        && has_global
        && pair_country(dom_v4, dom_v6) != pair_country(glob_v4, glob_v6)
    {
        return NetworkView::Split {
            domestic: pair_cards(dom_v4, dom_v6, icons),
            global: pair_cards(glob_v4, glob_v6, icons),
        };
    }

    let cards = pair_cards(glob_v4.or(dom_v4), glob_v6.or(dom_v6), icons);
    if cards.is_empty() {
        NetworkView::Detecting
    } else {
        NetworkView::Merged { cards }
    }
}

/// Site section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SiteView {
    /// The active tab has no tracked IP
    NoSiteIp,
    /// The site card
    Card(CardView),
}

/// Everything the popup shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopupView {
    /// Site section
    pub site: SiteView,
    /// Protocol label of the active page, if known
    pub protocol: Option<String>,
    /// Network section
    pub network: NetworkView,
}

impl PopupView {
    /// Builds the view from a `getData` response.
    pub fn from_data(data: &DataResponse, icons: &IconResolver) -> Self {
        let site = match &data.site_ip {
            Some(ip) => SiteView::Card(card_view(
                CardKind::Site,
                ip,
                data.site_details.as_ref(),
                icons,
            )),
            None => SiteView::NoSiteIp,
        };
        Self {
            site,
            protocol: None,
            network: network_view(data, icons),
        }
    }

    /// The site card, if the active tab has one.
    pub fn site_card_mut(&mut self) -> Option<&mut CardView> {
        match &mut self.site {
            SiteView::Card(card) => Some(card),
            SiteView::NoSiteIp => None,
        }
    }
}

/// Turns a probe outcome into the colo row, enriched from the directory.
pub fn colo_view(
    outcome: ColoOutcome,
    directory: Option<&ColoDirectory>,
    icons: &IconResolver,
) -> ColoView {
    match outcome {
        ColoOutcome::Found(code) => {
            let location = directory.and_then(|d| d.get(&code));
            let flag = location.and_then(|loc| {
                let name = loc.cca2.as_deref().unwrap_or(UNKNOWN_FLAG).to_lowercase();
                let path = icons
                    .asset_dir()
                    .join(FLAGS_SVG_DIR)
                    .join(format!("{}.svg", name));
                path.is_file().then_some(path)
            });
            ColoView::Found {
                name: location.map(|loc| loc.name.clone()),
                code,
                flag,
            }
        }
        ColoOutcome::Unknown => ColoView::Unknown,
        ColoOutcome::Failed => ColoView::Failed,
    }
}

/// Display label for a `nextHopProtocol` value.
pub fn protocol_label(raw: &str) -> String {
    match raw {
        "h3" => "HTTP/3".to_string(),
        "h2" => "HTTP/2".to_string(),
        "http/1.1" => "HTTP/1.1".to_string(),
        other => other.to_uppercase(),
    }
}

/// Protocol label for a page: `LOCAL` for browser-internal pages, `UNK` when
/// the protocol could not be read.
pub fn page_protocol(url: &str, next_hop: Option<&str>) -> String {
    if url.starts_with("chrome://") || url.starts_with("edge://") {
        return "LOCAL".to_string();
    }
    match next_hop {
        Some(raw) if !raw.is_empty() => protocol_label(raw),
        _ => "UNK".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn details(value: serde_json::Value) -> IpDetails {
        serde_json::from_value(value).expect("details")
    }

    fn record(ip: &str, country: &str) -> IpRecord {
        IpRecord {
            ip: ip.to_string(),
            details: Some(details(json!({ "ip": ip, "country": country }))),
        }
    }

    fn icons() -> IconResolver {
        IconResolver::new("/nonexistent-assets")
    }

    #[test]
    fn test_unicast_card_rows() {
        let d = details(json!({
            "city": "Mountain View", "region": "California", "country": "US",
            "org": "AS15169 Google LLC", "timezone": "America/Los_Angeles"
        }));
        let card = card_view(CardKind::Ipv4, "8.8.4.4", Some(&d), &icons());
        assert_eq!(card.flag, "us");
        assert!(!card.anycast);
        let labels: Vec<_> = card.rows.iter().map(|r| r.label).collect();
        assert_eq!(labels, vec!["city", "region", "country", "org"]);
        assert!(card.colo.is_none());
    }

    #[test]
    fn test_anycast_card_shows_org_and_asn_only() {
        let d = details(json!({
            "city": "San Francisco", "country": "US", "org": "AS13335 Cloudflare, Inc.",
            "asn": { "asn": "AS13335", "name": "Cloudflare, Inc." }, "anycast": true
        }));
        let card = card_view(CardKind::Site, "1.1.1.1", Some(&d), &icons());
        assert_eq!(card.flag, "cloudflare");
        assert!(card.anycast);
        let labels: Vec<_> = card.rows.iter().map(|r| r.label).collect();
        assert_eq!(labels, vec!["org", "asn"]);
        assert_eq!(card.colo, Some(ColoView::Probing));
    }

    #[test]
    fn test_colo_row_only_on_site_cards() {
        let d = details(json!({ "org": "Cloudflare", "anycast": true }));
        let card = card_view(CardKind::Ipv4, "1.1.1.1", Some(&d), &icons());
        assert!(card.colo.is_none());
    }

    #[test]
    fn test_card_without_details() {
        let card = card_view(CardKind::Ipv6, "2001:db8::1", None, &icons());
        assert!(card.no_info);
        assert_eq!(card.flag, "unknown");
        assert!(card.flag_path.ends_with("flags/unknown.svg"));
        assert!(card.rows.is_empty());
    }

    #[test]
    fn test_network_split_when_countries_differ() {
        let data = DataResponse {
            dom_ipv4: Some(record("36.1.1.1", "CN")),
            glob_ipv4: Some(record("203.0.113.9", "jp")),
            glob_ipv6: Some(record("2001:db8::9", "JP")),
            ..Default::default()
        };
        match network_view(&data, &icons()) {
            NetworkView::Split { domestic, global } => {
                assert_eq!(domestic.len(), 1);
                assert_eq!(global.len(), 2);
                assert_eq!(global[1].kind, CardKind::Ipv6);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_network_merged_prefers_global() {
        let data = DataResponse {
            dom_ipv4: Some(record("198.51.100.1", "US")),
            dom_ipv6: Some(record("2001:db8::1", "US")),
            glob_ipv4: Some(record("198.51.100.2", "us")),
            ..Default::default()
        };
        match network_view(&data, &icons()) {
            NetworkView::Merged { cards } => {
                assert_eq!(cards.len(), 2);
                assert_eq!(cards[0].ip, "198.51.100.2");
                assert_eq!(cards[1].ip, "2001:db8::1");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_network_v6_country_fallback() {
        let data = DataResponse {
            dom_ipv4: Some(IpRecord {
                ip: "36.1.1.1".into(),
                details: None,
            }),
            dom_ipv6: Some(record("240e::1", "CN")),
            glob_ipv4: Some(record("203.0.113.9", "CN")),
            ..Default::default()
        };
        assert!(matches!(
            network_view(&data, &icons()),
            NetworkView::Merged { .. }
        ));
    }

    #[test]
    fn test_pair_country_skips_empty_and_missing() {
        let blank = record("198.51.100.1", "");
        let v6 = record("2001:db8::1", "de");
        assert_eq!(pair_country(Some(&blank), Some(&v6)), "DE");
        assert_eq!(pair_country(None, Some(&v6)), "DE");
        assert_eq!(pair_country(Some(&blank), None), "");
        assert_eq!(pair_country(None, None), "");
    }

    #[test]
    fn test_network_detecting() {
        assert_eq!(
            network_view(&DataResponse::default(), &icons()),
            NetworkView::Detecting
        );
    }

    #[test]
    fn test_site_placeholder() {
        let mut view = PopupView::from_data(&DataResponse::default(), &icons());
        assert_eq!(view.site, SiteView::NoSiteIp);
        assert!(view.site_card_mut().is_none());
    }

    #[test]
    fn test_cloudflare_site_card_is_probing() {
        let data = DataResponse {
            site_ip: Some("104.16.1.1".into()),
            site_details: Some(details(json!({ "org": "AS13335 Cloudflare", "anycast": true }))),
            ..Default::default()
        };
        let mut view = PopupView::from_data(&data, &icons());
        let card = view.site_card_mut().expect("site card");
        assert_eq!(card.ip, "104.16.1.1");
        assert_eq!(card.colo, Some(ColoView::Probing));
    }

    #[test]
    fn test_colo_view_uses_directory() {
        let dir = ColoDirectory::from_json(r#"{"SJC": {"name": "San Jose", "cca2": "US"}}"#)
            .expect("directory");
        assert_eq!(
            colo_view(ColoOutcome::Found("SJC".into()), Some(&dir), &icons()),
            ColoView::Found {
                code: "SJC".into(),
                name: Some("San Jose".into()),
                flag: None
            }
        );
        assert_eq!(
            colo_view(ColoOutcome::Found("LHR".into()), Some(&dir), &icons()),
            ColoView::Found {
                code: "LHR".into(),
                name: None,
                flag: None
            }
        );
        assert_eq!(
            colo_view(ColoOutcome::Unknown, None, &icons()),
            ColoView::Unknown
        );
    }

    #[test]
    fn test_protocol_labels() {
        assert_eq!(protocol_label("h3"), "HTTP/3");
        assert_eq!(protocol_label("h2"), "HTTP/2");
        assert_eq!(protocol_label("http/1.1"), "HTTP/1.1");
        assert_eq!(protocol_label("http/1.0"), "HTTP/1.0");
        assert_eq!(page_protocol("chrome://settings", Some("h2")), "LOCAL");
        assert_eq!(page_protocol("edge://flags", None), "LOCAL");
        assert_eq!(page_protocol("https://a.test/", None), "UNK");
        assert_eq!(page_protocol("https://a.test/", Some("h2")), "HTTP/2");
    }
}
