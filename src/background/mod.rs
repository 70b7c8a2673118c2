//! Background service.
//!
//! Owns the stores and clients, applies host events through [`transition`] and
//! answers popup requests. [`spawn`] runs it behind a channel.

mod events;
mod runner;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::{Config, EgressEndpoints, DETAIL_CACHE_PREFIX, EGRESS_TIMEOUT};
use crate::egress::{EgressResolver, EgressSlot};
use crate::error_handling::{FailureStats, StoreError};
use crate::icon::{resolve_icon_code, IconCode, IconResolver, ToolbarIcon};
use crate::initialization::Stores;
use crate::lookup::{DetailClient, IpDetails, IpRecord};
use crate::store::{read_token, StorageKey, Store, StoreExt};
use crate::tabs::{load_tab_ips, save_tab_ips, TabId};

pub use events::{
    transition, Command, DataResponse, Effect, Event, PageInfo, Request, RequestCompleted,
    ResourceType, Response, TabStatus, Transition,
};
pub use runner::{spawn, BackgroundHandle, IconSink, LogIconSink};

/// The background service.
pub struct Background {
    session: Arc<dyn Store>,
    durable: Arc<dyn Store>,
    client: Arc<reqwest::Client>,
    details: DetailClient,
    icons: IconResolver,
    endpoints: EgressEndpoints,
    egress_timeout: Duration,
    stats: Arc<FailureStats>,
    active_tab: Mutex<Option<TabId>>,
    // Serializes read-modify-write of the tab map.
    tabs_lock: tokio::sync::Mutex<()>,
}

impl Background {
    /// Builds the service from its configuration, stores and HTTP client.
    pub fn new(config: &Config, stores: Stores, client: Arc<reqwest::Client>) -> Self {
        let stats = Arc::new(FailureStats::new());
        Self {
            details: DetailClient::new(client.clone(), &config.detail_api_base, stats.clone()),
            session: stores.session,
            durable: stores.durable,
            client,
            icons: IconResolver::new(config.asset_dir.clone()),
            endpoints: config.endpoints.clone(),
            egress_timeout: EGRESS_TIMEOUT,
            stats,
            active_tab: Mutex::new(None),
            tabs_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Overrides the egress timeout.
    pub fn with_egress_timeout(mut self, timeout: Duration) -> Self {
        self.egress_timeout = timeout;
        self
    }

    /// Stored token, if any. An unreadable store counts as no token.
    pub fn token(&self) -> Option<String> {
        match read_token(self.durable.as_ref()) {
            Ok(token) => token,
            Err(e) => {
                log::warn!("Failed to read token: {}", e);
                None
            }
        }
    }

    /// Session store.
    pub fn session(&self) -> &dyn Store {
        self.session.as_ref()
    }

    /// Durable store.
    pub fn durable(&self) -> &dyn Store {
        self.durable.as_ref()
    }

    /// Shared HTTP client.
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Icon resolver.
    pub fn icons(&self) -> &IconResolver {
        &self.icons
    }

    /// Failure counters.
    pub fn stats(&self) -> &FailureStats {
        &self.stats
    }

    /// Last activated tab.
    pub fn active_tab(&self) -> Option<TabId> {
        *self.active_tab.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Number of tabs with a tracked IP.
    pub fn tracked_tabs(&self) -> usize {
        load_tab_ips(self.session()).len()
    }

    /// Number of cached detail records.
    pub fn cached_details(&self) -> usize {
        self.session
            .keys()
            .map(|keys| {
                keys.iter()
                    .filter(|k| k.starts_with(DETAIL_CACHE_PREFIX))
                    .count()
            })
            .unwrap_or(0)
    }

    /// Applies an event and returns the resulting side effects.
    pub async fn handle_event(&self, event: &Event) -> Vec<Effect> {
        log::debug!("Event: {:?}", event);
        let commands = {
            let _guard = self.tabs_lock.lock().await;
            let tabs = load_tab_ips(self.session());
            let step = transition(event, &tabs);
            if let Some(next) = &step.tabs {
                if let Err(e) = save_tab_ips(self.session(), next) {
                    log::warn!("Failed to save tab map: {}", e);
                }
            }
            step.commands
        };

        let mut effects = Vec::new();
        for command in commands {
            if let Some(effect) = self.run_command(command).await {
                effects.push(effect);
            }
        }
        effects
    }

    async fn run_command(&self, command: Command) -> Option<Effect> {
        match command {
            Command::RefreshEgress => {
                self.refresh_egress().await;
                None
            }
            Command::MarkActive { tab_id } => {
                *self.active_tab.lock().unwrap_or_else(|e| e.into_inner()) = Some(tab_id);
                None
            }
            Command::ShowDefault { tab_id } => Some(Effect::SetIcon {
                tab_id,
                icon: self.icons.toolbar_default(),
            }),
            Command::ShowFlag { tab_id, ip } => Some(Effect::SetIcon {
                tab_id,
                icon: self.flag_for(&ip).await,
            }),
        }
    }

    async fn flag_for(&self, ip: &str) -> ToolbarIcon {
        if self.token().is_none() {
            return self.icons.toolbar_flag(&IconCode::Unknown);
        }
        let details = self.lookup(ip).await;
        self.icons.toolbar_flag(&resolve_icon_code(details.as_ref()))
    }

    /// Cache-backed detail lookup for `ip`. `None` without a token.
    pub async fn lookup(&self, ip: &str) -> Option<IpDetails> {
        let token = self.token()?;
        self.details.lookup_cached(self.session(), ip, &token).await
    }

    /// Re-resolves the four egress slots with the current token.
    pub async fn refresh_egress(&self) -> Vec<EgressSlot> {
        let token = self.token();
        let resolver = EgressResolver {
            client: &self.client,
            details: &self.details,
            endpoints: &self.endpoints,
            timeout: self.egress_timeout,
            stats: &self.stats,
        };
        let written = resolver.refresh_all(self.session(), token.as_deref()).await;
        log::info!("Egress refresh wrote {} of 4 slots", written.len());
        written
    }

    /// Answers a popup request.
    pub fn handle_request(&self, request: &Request) -> Response {
        match request {
            Request::GetData { active_tab } => match self.data_for(*active_tab) {
                Ok(data) => Response::Data(Box::new(data)),
                Err(e) => {
                    log::error!("getData failed: {}", e);
                    Response::Error {
                        error: e.to_string(),
                    }
                }
            },
            Request::PageInfo { page_info } => {
                log::info!(
                    "Page info: {} ({})",
                    page_info.url,
                    page_info.title.as_deref().unwrap_or("untitled")
                );
                Response::Ack {}
            }
        }
    }

    /// Assembles the popup data for `active_tab`, or the last activated tab.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` when a stored record cannot be read.
    pub fn data_for(&self, active_tab: Option<TabId>) -> Result<DataResponse, StoreError> {
        let egress = |slot: EgressSlot| self.session.get::<IpRecord>(&StorageKey::Egress(slot));

        let site_ip = active_tab
            .or_else(|| self.active_tab())
            .and_then(|tab| load_tab_ips(self.session()).get(tab).map(str::to_string));
        let site_details = match &site_ip {
            Some(ip) => self
                .session
                .get::<IpDetails>(&StorageKey::DetailCache(ip.clone()))?,
            None => None,
        };

        Ok(DataResponse {
            token: read_token(self.durable())?,
            dom_ipv4: egress(EgressSlot::DomesticV4)?,
            dom_ipv6: egress(EgressSlot::DomesticV6)?,
            glob_ipv4: egress(EgressSlot::GlobalV4)?,
            glob_ipv6: egress(EgressSlot::GlobalV6)?,
            site_ip,
            site_details,
        })
    }
}
