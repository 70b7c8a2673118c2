//! Channel-driven dispatch loop for the background service.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use super::{Background, Effect, Event, Request, Response};
use crate::config::{
    EVENT_CHANNEL_CAPACITY, FALLBACK_BADGE_COLOR, FALLBACK_BADGE_SIZE, FALLBACK_BADGE_TEXT,
};
use crate::icon::ToolbarIcon;
use crate::tabs::TabId;

/// Receives toolbar icon changes.
pub trait IconSink: Send + Sync {
    /// Shows `icon` for `tab_id`.
    fn set_icon(&self, tab_id: TabId, icon: &ToolbarIcon);
}

/// Icon sink that only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogIconSink;

impl IconSink for LogIconSink {
    fn set_icon(&self, tab_id: TabId, icon: &ToolbarIcon) {
        match icon {
            ToolbarIcon::Asset(path) => log::info!("Tab {} icon: {}", tab_id, path.display()),
            ToolbarIcon::Badge => log::info!(
                "Tab {} icon: \"{}\" badge ({}, {}px)",
                tab_id,
                FALLBACK_BADGE_TEXT,
                FALLBACK_BADGE_COLOR,
                FALLBACK_BADGE_SIZE
            ),
        }
    }
}

enum Envelope {
    Event(Event),
    Request {
        request: Request,
        reply: oneshot::Sender<Response>,
    },
}

/// Sending side of a running background service.
#[derive(Clone)]
pub struct BackgroundHandle {
    tx: mpsc::Sender<Envelope>,
}

impl BackgroundHandle {
    /// Queues an event.
    pub async fn send_event(&self, event: Event) -> Result<()> {
        self.tx
            .send(Envelope::Event(event))
            .await
            .map_err(|_| anyhow!("Background service stopped"))
    }

    /// Sends a request and waits for its reply.
    pub async fn request(&self, request: Request) -> Result<Response> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Envelope::Request { request, reply })
            .await
            .map_err(|_| anyhow!("Background service stopped"))?;
        rx.await
            .map_err(|_| anyhow!("Background service dropped the request"))
    }
}

/// Runs `background` on its own task.
///
/// Events are handled one at a time in arrival order, except egress refreshes
/// (startup and install), which run on separate tasks. The loop ends when every
/// handle has been dropped.
pub fn spawn(background: Arc<Background>, sink: Arc<dyn IconSink>) -> (BackgroundHandle, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

    let task = tokio::spawn(async move {
        while let Some(envelope) = rx.recv().await {
            match envelope {
                Envelope::Event(event @ (Event::Startup | Event::Installed)) => {
                    let background = background.clone();
                    let sink = sink.clone();
                    tokio::spawn(async move {
                        let effects = background.handle_event(&event).await;
                        apply(sink.as_ref(), effects);
                    });
                }
                Envelope::Event(event) => {
                    let effects = background.handle_event(&event).await;
                    apply(sink.as_ref(), effects);
                }
                Envelope::Request { request, reply } => {
                    let response = background.handle_request(&request);
                    if reply.send(response).is_err() {
                        log::debug!("Requester went away before the reply");
                    }
                }
            }
        }
        log::debug!("Background loop finished");
    });

    (BackgroundHandle { tx }, task)
}

fn apply(sink: &dyn IconSink, effects: Vec<Effect>) {
    for effect in effects {
        match effect {
            Effect::SetIcon { tab_id, icon } => sink.set_icon(tab_id, &icon),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::{RequestCompleted, ResourceType};
    use crate::config::Config;
    use crate::initialization::Stores;
    use crate::store::MemoryStore;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink(Mutex<Vec<(TabId, ToolbarIcon)>>);

    impl IconSink for RecordingSink {
        fn set_icon(&self, tab_id: TabId, icon: &ToolbarIcon) {
            self.0
                .lock()
                .expect("sink lock")
                .push((tab_id, icon.clone()));
        }
    }

    fn background() -> Arc<Background> {
        let config = Config {
            asset_dir: "/nonexistent-assets".into(),
            ..Default::default()
        };
        let stores = Stores {
            session: Arc::new(MemoryStore::new()),
            durable: Arc::new(MemoryStore::new()),
        };
        Arc::new(Background::new(
            &config,
            stores,
            Arc::new(reqwest::Client::new()),
        ))
    }

    #[tokio::test]
    async fn test_events_reach_sink_and_requests_are_answered() {
        let sink = Arc::new(RecordingSink::default());
        let (handle, task) = spawn(background(), sink.clone());

        handle
            .send_event(Event::RequestCompleted(RequestCompleted {
                tab_id: 3,
                resource_type: ResourceType::MainFrame,
                ip: Some("1.1.1.1".into()),
                url: None,
            }))
            .await
            .expect("send");
        handle
            .send_event(Event::TabActivated { tab_id: 3 })
            .await
            .expect("send");

        let response = handle
            .request(Request::GetData { active_tab: None })
            .await
            .expect("reply");
        match response {
            Response::Data(data) => assert_eq!(data.site_ip.as_deref(), Some("1.1.1.1")),
            other => panic!("unexpected {:?}", other),
        }

        drop(handle);
        task.await.expect("loop ends");
        let icons = sink.0.lock().expect("sink lock");
        assert_eq!(icons.len(), 2);
        assert!(icons.iter().all(|(tab, _)| *tab == 3));
    }

    #[tokio::test]
    async fn test_handle_fails_after_loop_stops() {
        let (handle, task) = spawn(background(), Arc::new(LogIconSink));
        task.abort();
        let _ = task.await;
        assert!(handle.send_event(Event::Startup).await.is_err());
    }
}
