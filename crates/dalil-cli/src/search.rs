//! `search` and `categories` handlers.
//!
//! Both boot a full session against the on-disk cache and the configured
//! endpoint, so a fresh snapshot answers without touching the network.
//! Fetch failures end up in the rendered view, never in the exit status.

use std::time::Duration;

use anyhow::Context;
use dalil_core::{AppConfig, Coordinates, SortMode};
use dalil_fetch::DirectoryClient;
use dalil_store::FileStore;
use dalil_sync::{SyncController, SyncOptions, SyncPhase};

use crate::render::TerminalRenderer;

type Session = SyncController<DirectoryClient, FileStore, TerminalRenderer>;

#[derive(Debug)]
pub(crate) struct SearchRequest {
    pub query: String,
    pub category: Option<String>,
    pub near: Option<Coordinates>,
    pub sort: SortMode,
    pub refresh: bool,
}

pub(crate) fn sync_options(config: &AppConfig, refresh: bool) -> SyncOptions {
    SyncOptions {
        country_code: config.country_code.clone(),
        debounce: Duration::from_millis(config.search_debounce_ms),
        force_refresh: refresh,
    }
}

fn open_session(config: &AppConfig, refresh: bool) -> anyhow::Result<Session> {
    let client =
        DirectoryClient::from_config(config).context("failed to build directory client")?;
    tracing::debug!(
        endpoint = %client.endpoint(),
        cache_dir = %config.cache_dir.display(),
        "opening session"
    );
    let store = FileStore::new(&config.cache_dir);
    Ok(SyncController::new(
        client,
        store,
        TerminalRenderer::default(),
        sync_options(config, refresh),
    ))
}

async fn booted_session(config: &AppConfig, refresh: bool) -> anyhow::Result<Session> {
    let mut session = open_session(config, refresh)?;
    let report = session.boot().await;
    tracing::debug!(
        cache = report.cache,
        rendered_from_cache = report.rendered_from_cache,
        phase = ?report.phase,
        "boot finished"
    );
    Ok(session)
}

/// Boots a session, applies the request and prints the resulting view.
///
/// # Errors
///
/// Returns an error only if the directory client cannot be built.
pub(crate) async fn run_search(config: &AppConfig, request: SearchRequest) -> anyhow::Result<()> {
    let mut session = booted_session(config, request.refresh).await?;

    if let Some(near) = request.near {
        session.set_user_location(near);
    }
    session.set_sort(request.sort);
    session.select_category(request.category);
    session.submit_search(request.query);

    print!("{}", session.renderer().output());
    Ok(())
}

/// Boots a session and prints one category per line.
///
/// # Errors
///
/// Returns an error only if the directory client cannot be built.
pub(crate) async fn run_categories(config: &AppConfig, refresh: bool) -> anyhow::Result<()> {
    let session = booted_session(config, refresh).await?;

    if session.phase() == SyncPhase::FetchFailed {
        print!("{}", session.renderer().output());
        return Ok(());
    }

    for category in dalil_core::categories(session.state().entries()) {
        println!("{category}");
    }
    Ok(())
}
