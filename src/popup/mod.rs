//! Popup presentation: card view models and their terminal rendering.

mod render;
mod view;

use std::time::Duration;

use crate::colo::{probe_colo, ColoDirectory};
use crate::icon::IconResolver;

pub use render::{render, render_card, render_toast};
pub use view::{
    card_view, colo_view, network_view, page_protocol, protocol_label, CardKind, CardView,
    ColoView, DetailRow, NetworkView, PopupView, SiteView,
};

/// Probes the colo of a Cloudflare site card whose row is still pending.
pub async fn fill_colo(
    card: &mut CardView,
    client: &reqwest::Client,
    timeout: Duration,
    directory: Option<&ColoDirectory>,
    icons: &IconResolver,
) {
    if card.colo != Some(ColoView::Probing) {
        return;
    }
    let outcome = probe_colo(client, &card.ip, timeout).await;
    log::debug!("Colo probe for {}: {:?}", card.ip, outcome);
    card.colo = Some(colo_view(outcome, directory, icons));
}
