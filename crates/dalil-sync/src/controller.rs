//! Session controller.
//!
//! Owns [`DirectoryState`] and is the only place it changes. Every mutation
//! re-renders, so the renderer never sees state it was not told about.
//!
//! Boot order:
//!
//! 1. Read the snapshot cache. A hit is ingested and rendered at once as
//!    [`Freshness::Stale`].
//! 2. A hit is within TTL by construction, so the fetch is skipped unless
//!    [`SyncOptions::force_refresh`] is set. On a miss the loading view is
//!    shown and the fetch starts.
//! 3. A failed fetch is silent when cached entries are on screen; otherwise
//!    the view becomes [`ViewBody::NetworkError`].
//! 4. A successful fetch replaces the entries, rewrites the cache and always
//!    re-renders.

use std::time::Duration;

use chrono::Utc;
use dalil_core::{
    build, categories, query, rank, Coordinates, EntryActions, Language, RankedEntry, RawEntry,
    SortMode,
};
use dalil_fetch::FetchError;
use dalil_store::{CacheSnapshot, CacheStore, KeyValueStore, PreferenceStore};
use tokio::time::Instant;

use crate::pending::PendingQuery;
use crate::render::{RenderView, Renderer, ResultItem, ViewBody};
use crate::source::DirectorySource;
use crate::state::{DirectoryState, Freshness, SyncPhase};

#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub country_code: String,
    pub debounce: Duration,
    /// Fetch even when the cached snapshot is fresh.
    pub force_refresh: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            country_code: "20".to_string(),
            debounce: Duration::from_millis(200),
            force_refresh: false,
        }
    }
}

#[derive(Debug)]
pub enum FetchOutcome {
    /// The cached snapshot was fresh.
    Skipped,
    Fetched { count: usize },
    Failed(FetchError),
}

/// Which path a boot took.
#[derive(Debug)]
pub struct BootReport {
    /// Cache lookup label (`hit`, `miss`, `expired`, ...).
    pub cache: &'static str,
    pub rendered_from_cache: bool,
    pub fetch: FetchOutcome,
    pub phase: SyncPhase,
}

pub struct SyncController<S, K, R> {
    source: S,
    cache: CacheStore<K>,
    preferences: PreferenceStore<K>,
    renderer: R,
    state: DirectoryState,
    phase: SyncPhase,
    pending: PendingQuery,
    options: SyncOptions,
    rendered_from_cache: bool,
}

impl<S, K, R> SyncController<S, K, R>
where
    S: DirectorySource,
    K: KeyValueStore + Clone,
    R: Renderer,
{
    /// Creates an idle controller. The language comes from the persisted
    /// preference; entries stay empty until [`SyncController::boot`].
    pub fn new(source: S, backend: K, renderer: R, options: SyncOptions) -> Self {
        let preferences = PreferenceStore::new(backend.clone());
        let state = DirectoryState::new(preferences.load());
        Self {
            source,
            cache: CacheStore::new(backend),
            preferences,
            renderer,
            state,
            phase: SyncPhase::Idle,
            pending: PendingQuery::new(options.debounce),
            options,
            rendered_from_cache: false,
        }
    }

    pub async fn boot(&mut self) -> BootReport {
        self.phase = SyncPhase::LoadingFromCache;
        let lookup = self.cache.inspect(Utc::now());
        let cache = lookup.label();
        tracing::debug!(cache, "boot: snapshot lookup");

        if let Some(snapshot) = lookup.into_snapshot() {
            self.state.replace_entries(build(snapshot.entries));
            self.phase = SyncPhase::Ready(Freshness::Stale);
            self.rendered_from_cache = true;
            self.render();

            if !self.options.force_refresh {
                return self.report(cache, FetchOutcome::Skipped);
            }
        }

        self.phase = SyncPhase::Fetching;
        if !self.rendered_from_cache {
            self.render();
        }

        let result = self.source.fetch_entries().await;
        let fetch = match result {
            Ok(raw) => {
                let count = raw.len();
                self.accept_fetched(raw);
                tracing::info!(count, "directory refreshed from network");
                FetchOutcome::Fetched { count }
            }
            Err(err) => {
                if self.rendered_from_cache {
                    tracing::warn!(error = %err, "refresh failed; keeping cached entries");
                    self.phase = SyncPhase::Ready(Freshness::Stale);
                } else {
                    tracing::warn!(error = %err, "directory fetch failed with nothing cached");
                    self.phase = SyncPhase::FetchFailed;
                    self.render();
                }
                FetchOutcome::Failed(err)
            }
        };

        self.report(cache, fetch)
    }

    fn accept_fetched(&mut self, raw: Vec<RawEntry>) {
        let snapshot = CacheSnapshot::capture(raw, Utc::now());
        self.cache.write(&snapshot);
        self.state.replace_entries(build(snapshot.entries));
        self.phase = SyncPhase::Ready(Freshness::Fresh);
        self.render();
    }

    fn report(&self, cache: &'static str, fetch: FetchOutcome) -> BootReport {
        BootReport {
            cache,
            rendered_from_cache: self.rendered_from_cache,
            fetch,
            phase: self.phase,
        }
    }

    /// Records a keystroke; the query runs once the debounce delay passes.
    pub fn on_search_input(&mut self, text: impl Into<String>) {
        self.on_search_input_at(text, Instant::now());
    }

    pub fn on_search_input_at(&mut self, text: impl Into<String>, now: Instant) {
        self.pending.schedule(text.into(), now);
    }

    /// Runs the pending query if its deadline has passed. Returns whether a
    /// query ran.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.pending.take_due(now) {
            Some(text) => {
                self.state.set_search_text(text);
                self.render();
                true
            }
            None => false,
        }
    }

    /// Waits out the debounce delay and runs the pending query, if any.
    pub async fn settle(&mut self) {
        while let Some(deadline) = self.pending.deadline() {
            tokio::time::sleep_until(deadline).await;
            self.tick(Instant::now());
        }
    }

    /// Applies search text immediately, dropping any pending input.
    pub fn submit_search(&mut self, text: impl Into<String>) {
        self.pending.cancel();
        self.state.set_search_text(text.into());
        self.render();
    }

    /// `None` or `""` selects all categories.
    pub fn select_category(&mut self, category: Option<String>) {
        self.state.set_category(category);
        self.render();
    }

    pub fn set_sort(&mut self, sort: SortMode) {
        self.state.set_sort(sort);
        self.render();
    }

    /// Sets the user's location once per session; later calls are ignored.
    pub fn set_user_location(&mut self, location: Coordinates) -> bool {
        let accepted = self.state.set_user_location(location);
        if accepted {
            self.render();
        } else {
            tracing::debug!("user location already set; ignoring update");
        }
        accepted
    }

    pub fn toggle_language(&mut self) -> Language {
        let next = self.state.language().toggle();
        self.set_language(next);
        next
    }

    /// Persists and applies `language`. Never fetches.
    pub fn set_language(&mut self, language: Language) {
        self.state.set_language(language);
        self.preferences.save(language);
        self.render();
    }

    /// Current matches for the active search, category and sort.
    pub fn results(&self) -> Vec<RankedEntry<'_>> {
        current_results(&self.state)
    }

    pub fn state(&self) -> &DirectoryState {
        &self.state
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn render(&mut self) {
        let view = compose_view(
            &self.state,
            self.phase,
            self.rendered_from_cache,
            &self.options.country_code,
        );
        self.renderer.render(&view);
    }
}

fn current_results(state: &DirectoryState) -> Vec<RankedEntry<'_>> {
    let matches = query(state.entries(), state.search_text(), state.category());
    rank(matches, state.user_location(), state.sort())
}

fn compose_view<'a>(
    state: &'a DirectoryState,
    phase: SyncPhase,
    rendered_from_cache: bool,
    country_code: &str,
) -> RenderView<'a> {
    let freshness = match phase {
        SyncPhase::Ready(freshness) => Some(freshness),
        SyncPhase::Fetching if rendered_from_cache => Some(Freshness::Stale),
        _ => None,
    };

    let body = match phase {
        SyncPhase::FetchFailed => ViewBody::NetworkError,
        SyncPhase::Idle | SyncPhase::LoadingFromCache | SyncPhase::Fetching
            if !rendered_from_cache =>
        {
            ViewBody::Loading
        }
        _ => {
            let items: Vec<ResultItem<'a>> = current_results(state)
                .into_iter()
                .map(|ranked| ResultItem {
                    actions: EntryActions::for_entry(ranked.entry, country_code),
                    entry: ranked.entry,
                    distance_km: ranked.distance_km,
                })
                .collect();
            if items.is_empty() {
                ViewBody::NoResults
            } else {
                ViewBody::Results(items)
            }
        }
    };

    RenderView {
        language: state.language(),
        freshness,
        categories: categories(state.entries()),
        selected_category: state.category(),
        body,
    }
}
