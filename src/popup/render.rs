//! Terminal rendering of the popup view.

use std::fmt::Write;

use colored::Colorize;

use super::view::{CardView, ColoView, NetworkView, PopupView, SiteView};

/// Renders the popup as terminal text.
pub fn render(view: &PopupView) -> String {
    let mut out = String::new();

    let protocol = view.protocol.as_deref().unwrap_or("...");
    let _ = writeln!(out, "{} [{}]", "Current site".bold(), protocol.cyan());
    match &view.site {
        SiteView::NoSiteIp => {
            let _ = writeln!(out, "  {}", "No IP recorded for this site".dimmed());
            let _ = writeln!(out, "  {}", "Reload the page to detect it".dimmed());
        }
        SiteView::Card(card) => write_card(&mut out, card),
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", "My network".bold());
    match &view.network {
        NetworkView::Split { domestic, global } => {
            let _ = writeln!(out, "  {}", "Domestic".underline());
            for card in domestic {
                write_card(&mut out, card);
            }
            let _ = writeln!(out, "  {}", "Global".underline());
            for card in global {
                write_card(&mut out, card);
            }
        }
        NetworkView::Merged { cards } => {
            for card in cards {
                write_card(&mut out, card);
            }
        }
        NetworkView::Detecting => {
            let _ = writeln!(out, "  {}", "Detecting...".dimmed());
        }
    }
    out
}

/// Renders a single card.
pub fn render_card(card: &CardView) -> String {
    let mut out = String::new();
    write_card(&mut out, card);
    out
}

fn write_card(out: &mut String, card: &CardView) {
    let _ = writeln!(
        out,
        "  {} {} {}",
        format!("[{}]", card.kind.title()).bold(),
        card.ip.green(),
        format!("({})", card.flag).dimmed()
    );

    if card.no_info {
        let _ = writeln!(out, "    {}", "No details (set a token to enable lookups)".yellow());
        return;
    }
    if card.anycast {
        let _ = writeln!(out, "    {:<8} {}", "type:", "Anycast".magenta());
    }
    if let Some(colo) = &card.colo {
        let _ = writeln!(out, "    {:<8} {}", "colo:", colo_text(colo));
    }
    for row in &card.rows {
        let _ = writeln!(out, "    {:<8} {}", format!("{}:", row.label), row.value);
    }
}

fn colo_text(colo: &ColoView) -> String {
    match colo {
        ColoView::Probing => "probing...".dimmed().to_string(),
        ColoView::Found { code, name, .. } => match name {
            Some(name) => format!("{} ({})", code.bold(), name),
            None => code.bold().to_string(),
        },
        ColoView::Unknown => "unknown".dimmed().to_string(),
        ColoView::Failed => "failed".dimmed().to_string(),
    }
}

/// Single-line error notice shown when the background service cannot answer.
pub fn render_toast(message: &str) -> String {
    format!("{} {}", "error:".red().bold(), message)
}
