//! Command implementations behind the `ipscope` binary.

mod statistics;
mod url;

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::background::{self, Background, Event, LogIconSink, Request, Response};
use crate::colo::ColoDirectory;
use crate::config::{
    Command, Config, TokenAction, COLO_PROBE_TIMEOUT, DEFAULT_STATUS_PORT, TOKEN_ENV_VAR,
};
use crate::icon::resolve_icon_code;
use crate::initialization::{init_client, init_stores};
use crate::popup::{self, card_view, page_protocol, CardKind, PopupView};
use crate::status_server::{start_status_server, StatusState};
use crate::store::{read_token, write_token, Store};
use crate::tabs::{visit, TabId};

pub use statistics::print_failure_statistics;
pub use url::{is_browser_internal, normalize_site_url};

/// Runs `command` with the configuration built by [`Cli::to_config`](crate::config::Cli::to_config).
pub async fn run(command: &Command, config: Config) -> Result<()> {
    let stores = init_stores(&config).context("Failed to open stores")?;
    seed_token_from_env(stores.durable.as_ref())?;

    if let Command::Token { action } = command {
        return token_command(stores.durable.as_ref(), action);
    }

    let client = init_client(&config).context("Failed to initialize HTTP client")?;
    let background = Arc::new(Background::new(&config, stores, client));

    let result = match command {
        Command::Network => network_command(&background).await,
        Command::Site { urls } => site_command(&config, &background, urls).await,
        Command::Lookup { ip } => lookup_command(&config, &background, ip).await,
        Command::Serve { .. } => {
            let port = config.status_port.unwrap_or(DEFAULT_STATUS_PORT);
            serve_command(background.clone(), port).await
        }
        Command::Token { .. } => Ok(()),
    };
    print_failure_statistics(background.stats());
    result
}

/// Stores the token from `IPINFO_TOKEN` when none is stored yet.
fn seed_token_from_env(durable: &dyn Store) -> Result<()> {
    let Ok(token) = std::env::var(TOKEN_ENV_VAR) else {
        return Ok(());
    };
    if token.trim().is_empty() || read_token(durable)?.is_some() {
        return Ok(());
    }
    write_token(durable, &token).context("Failed to store token from environment")?;
    log::info!("Stored token from {}", TOKEN_ENV_VAR);
    Ok(())
}

fn token_command(durable: &dyn Store, action: &TokenAction) -> Result<()> {
    match action {
        TokenAction::Set { token } => {
            write_token(durable, token).context("Failed to store token")?;
            if token.trim().is_empty() {
                println!("Token cleared");
            } else {
                println!("Token saved");
            }
        }
        TokenAction::Show => match read_token(durable)? {
            Some(token) => println!("Token: {}", mask_token(&token)),
            None => println!("No token set; details lookups are disabled"),
        },
        TokenAction::Clear => {
            write_token(durable, "").context("Failed to clear token")?;
            println!("Token cleared");
        }
    }
    Ok(())
}

fn mask_token(token: &str) -> String {
    let visible: String = token.chars().take(4).collect();
    if token.chars().count() <= 4 {
        "*".repeat(token.chars().count())
    } else {
        format!("{}{}", visible, "*".repeat(8))
    }
}

fn load_colo_directory(config: &Config) -> Option<ColoDirectory> {
    let path = config.colo_directory.as_ref()?;
    match ColoDirectory::load(path) {
        Ok(directory) => {
            log::debug!("Loaded {} colos from {}", directory.len(), path.display());
            Some(directory)
        }
        Err(e) => {
            log::warn!("{:#}", e);
            None
        }
    }
}

async fn network_command(background: &Background) -> Result<()> {
    if background.token().is_none() {
        log::warn!("No token set; egress IPs are not stored without one");
    }
    background.refresh_egress().await;
    match background.handle_request(&Request::GetData { active_tab: None }) {
        Response::Data(data) => {
            let view = PopupView::from_data(&data, background.icons());
            println!("{}", popup::render(&view));
        }
        Response::Error { error } => eprintln!("{}", popup::render_toast(&error)),
        Response::Ack {} => {}
    }
    Ok(())
}

async fn site_command(config: &Config, background: &Arc<Background>, urls: &[String]) -> Result<()> {
    let directory = load_colo_directory(config);
    let (handle, task) = background::spawn(background.clone(), Arc::new(LogIconSink));

    for (index, raw) in urls.iter().enumerate() {
        let tab_id = index as TabId + 1;
        let Some(url) = normalize_site_url(raw) else {
            eprintln!("{}", popup::render_toast(&format!("Invalid URL: {}", raw)));
            continue;
        };

        let protocol = if is_browser_internal(&url) {
            page_protocol(&url, None)
        } else {
            match visit(background.client(), tab_id, &url).await {
                Ok(page) => {
                    handle
                        .send_event(Event::RequestCompleted(page.completed))
                        .await?;
                    page_protocol(&url, Some(&page.protocol))
                }
                Err(e) => {
                    eprintln!("{}", popup::render_toast(&format!("{}: {}", url, e)));
                    continue;
                }
            }
        };
        handle.send_event(Event::TabActivated { tab_id }).await?;

        match handle
            .request(Request::GetData {
                active_tab: Some(tab_id),
            })
            .await?
        {
            Response::Data(data) => {
                let mut view = PopupView::from_data(&data, background.icons());
                view.protocol = Some(protocol);
                if let Some(card) = view.site_card_mut() {
                    popup::fill_colo(
                        card,
                        background.client(),
                        COLO_PROBE_TIMEOUT,
                        directory.as_ref(),
                        background.icons(),
                    )
                    .await;
                }
                println!("{}", url);
                println!("{}", popup::render(&view));
            }
            Response::Error { error } => eprintln!("{}", popup::render_toast(&error)),
            Response::Ack {} => {}
        }
    }

    drop(handle);
    task.await.context("Background loop failed")?;
    Ok(())
}

async fn lookup_command(config: &Config, background: &Background, ip: &str) -> Result<()> {
    if background.token().is_none() {
        log::warn!("No token set; run `ipscope token set <TOKEN>` or set {}", TOKEN_ENV_VAR);
    }
    let details = background.lookup(ip).await;
    let directory = load_colo_directory(config);

    let mut card = card_view(CardKind::Site, ip, details.as_ref(), background.icons());
    popup::fill_colo(
        &mut card,
        background.client(),
        COLO_PROBE_TIMEOUT,
        directory.as_ref(),
        background.icons(),
    )
    .await;

    println!("{}", popup::render_card(&card));
    println!("icon: {}", resolve_icon_code(details.as_ref()));
    Ok(())
}

async fn serve_command(background: Arc<Background>, port: u16) -> Result<()> {
    let (handle, _task) = background::spawn(background.clone(), Arc::new(LogIconSink));
    handle.send_event(Event::Startup).await?;

    let server = start_status_server(port, StatusState::new(background, handle));
    tokio::select! {
        result = server => result,
        _ = tokio::signal::ctrl_c() => {
            log::info!("Shutting down");
            Ok(())
        }
    }
}
