//! Host events, messages and their pure transition.

use serde::{Deserialize, Serialize};

use crate::config::NO_TAB_ID;
use crate::icon::ToolbarIcon;
use crate::lookup::{IpDetails, IpRecord};
use crate::tabs::{TabId, TabIpMap};

/// Type of a completed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    /// Top-level document
    MainFrame,
    /// Embedded document
    SubFrame,
    /// Any other resource
    #[serde(other)]
    Other,
}

/// A network request finished.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestCompleted {
    /// Tab the request belongs to, `-1` for none
    pub tab_id: TabId,
    /// What was requested
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    /// Remote address the response came from, if known
    #[serde(default)]
    pub ip: Option<String>,
    /// Final URL
    #[serde(default)]
    pub url: Option<String>,
}

/// Loading status reported with tab updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabStatus {
    /// Still loading
    Loading,
    /// Finished loading
    Complete,
}

/// Events delivered by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Event {
    /// The host started
    Startup,
    /// The extension was installed or updated
    Installed,
    /// A network request finished
    RequestCompleted(RequestCompleted),
    /// A tab became the active one
    TabActivated {
        /// The activated tab
        tab_id: TabId,
    },
    /// A tab changed in place
    TabUpdated {
        /// The updated tab
        tab_id: TabId,
        /// New loading status, if it changed
        status: Option<TabStatus>,
        /// Whether the tab is the active one
        active: bool,
    },
}

/// Page information sent by the content side. Accepted and logged only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Page URL
    #[serde(default)]
    pub url: String,
    /// Host name
    #[serde(default)]
    pub hostname: String,
    /// Origin
    #[serde(default)]
    pub origin: String,
    /// Document title
    #[serde(default)]
    pub title: Option<String>,
}

/// Requests sent to the background service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum Request {
    /// Everything the popup renders
    #[serde(rename = "getData")]
    GetData {
        /// Tab to report the site for; the last activated tab when absent
        #[serde(default, rename = "activeTab")]
        active_tab: Option<TabId>,
    },
    /// Page information from the content side
    #[serde(rename = "pageInfo")]
    PageInfo {
        /// The page
        #[serde(rename = "pageInfo", default)]
        page_info: PageInfo,
    },
}

/// Data returned for `getData`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataResponse {
    /// Stored token, if any
    pub token: Option<String>,
    /// Domestic IPv4 record
    pub dom_ipv4: Option<IpRecord>,
    /// Domestic IPv6 record
    pub dom_ipv6: Option<IpRecord>,
    /// Global IPv4 record
    pub glob_ipv4: Option<IpRecord>,
    /// Global IPv6 record
    pub glob_ipv6: Option<IpRecord>,
    /// IP of the active tab's site
    pub site_ip: Option<String>,
    /// Cached details of the site IP
    pub site_details: Option<IpDetails>,
}

/// Replies to requests.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    /// Reply to `getData`
    Data(Box<DataResponse>),
    /// The request failed
    Error {
        /// What went wrong
        error: String,
    },
    /// Notification accepted, nothing to return
    Ack {},
}

/// Side effects requested by the background service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    /// Show `icon` in the toolbar for `tab_id`
    SetIcon {
        /// Target tab
        tab_id: TabId,
        /// Icon to show
        icon: ToolbarIcon,
    },
}

/// Work derived from an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Re-resolve the four egress slots
    RefreshEgress,
    /// Look up `ip` (cache first) and show its flag on `tab_id`
    ShowFlag {
        /// Target tab
        tab_id: TabId,
        /// Tracked IP
        ip: String,
    },
    /// Show the generic icon on `tab_id`
    ShowDefault {
        /// Target tab
        tab_id: TabId,
    },
    /// Remember `tab_id` as the active tab
    MarkActive {
        /// The active tab
        tab_id: TabId,
    },
}

/// Result of applying an event to the tab map.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Transition {
    /// The new tab map, when the event changed it
    pub tabs: Option<TabIpMap>,
    /// Work to perform, in order
    pub commands: Vec<Command>,
}

/// Applies `event` to the current tab map.
///
/// This is a pure function: it only decides what changes and what to do next.
/// Fetching details and touching the toolbar happen when the commands run.
pub fn transition(event: &Event, tabs: &TabIpMap) -> Transition {
    match event {
        Event::Startup | Event::Installed => Transition {
            tabs: None,
            commands: vec![Command::RefreshEgress],
        },
        Event::RequestCompleted(done) => {
            let ip = match done.ip.as_deref().map(str::trim) {
                Some(ip) if !ip.is_empty() => ip,
                _ => return Transition::default(),
            };
            if done.tab_id == NO_TAB_ID || done.resource_type != ResourceType::MainFrame {
                return Transition::default();
            }
            let mut next = tabs.clone();
            let changed = next.observe(done.tab_id, ip);
            Transition {
                tabs: changed.then_some(next),
                commands: vec![Command::ShowFlag {
                    tab_id: done.tab_id,
                    ip: ip.to_string(),
                }],
            }
        }
        Event::TabActivated { tab_id } => Transition {
            tabs: None,
            commands: vec![Command::MarkActive { tab_id: *tab_id }, icon_command(*tab_id, tabs)],
        },
        Event::TabUpdated {
            tab_id,
            status: Some(TabStatus::Complete),
            active: true,
        } => Transition {
            tabs: None,
            commands: vec![Command::MarkActive { tab_id: *tab_id }, icon_command(*tab_id, tabs)],
        },
        Event::TabUpdated { .. } => Transition::default(),
    }
}

fn icon_command(tab_id: TabId, tabs: &TabIpMap) -> Command {
    match tabs.get(tab_id) {
        Some(ip) => Command::ShowFlag {
            tab_id,
            ip: ip.to_string(),
        },
        None => Command::ShowDefault { tab_id },
    }
}
