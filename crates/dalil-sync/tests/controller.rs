use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{TimeDelta, Utc};
use dalil_core::{Coordinates, Language, RawEntry, SortMode};
use dalil_fetch::{DirectoryClient, FetchError};
use dalil_store::{
    CacheSnapshot, CacheStore, KeyValueStore, MemoryStore, PreferenceStore, CACHE_TTL_SECS,
    SNAPSHOT_KEY,
};
use dalil_sync::{
    DirectorySource, FetchOutcome, Freshness, RenderView, Renderer, SyncController, SyncOptions,
    SyncPhase, ViewBody,
};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

/// Replays queued responses; an empty queue answers with an empty list.
#[derive(Clone, Default)]
struct FakeSource {
    responses: Arc<Mutex<VecDeque<Result<Vec<RawEntry>, FetchError>>>>,
    calls: Arc<AtomicUsize>,
}

impl FakeSource {
    fn replying(responses: Vec<Result<Vec<RawEntry>, FetchError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
            calls: Arc::default(),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DirectorySource for FakeSource {
    async fn fetch_entries(&self) -> Result<Vec<RawEntry>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Frame {
    body: &'static str,
    names: Vec<String>,
    categories: Vec<String>,
    language: Language,
    freshness: Option<Freshness>,
}

#[derive(Default)]
struct RecordingRenderer {
    frames: Vec<Frame>,
}

impl RecordingRenderer {
    fn last(&self) -> &Frame {
        self.frames.last().expect("at least one frame")
    }

    fn bodies(&self) -> Vec<&'static str> {
        self.frames.iter().map(|f| f.body).collect()
    }
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, view: &RenderView<'_>) {
        let (body, names) = match &view.body {
            ViewBody::Loading => ("loading", Vec::new()),
            ViewBody::NetworkError => ("network_error", Vec::new()),
            ViewBody::NoResults => ("no_results", Vec::new()),
            ViewBody::Results(items) => (
                "results",
                items.iter().map(|i| i.entry.name.clone()).collect(),
            ),
        };
        self.frames.push(Frame {
            body,
            names,
            categories: view.categories.iter().map(|c| (*c).to_owned()).collect(),
            language: view.language,
            freshness: view.freshness,
        });
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn entry(name: &str, category: &str, lat: f64, lng: f64) -> RawEntry {
    RawEntry {
        name: Some(name.to_owned()),
        category: Some(category.to_owned()),
        phone: Some("0223456789".to_owned()),
        lat: Some(lat),
        lng: Some(lng),
        ..RawEntry::default()
    }
}

fn sample() -> Vec<RawEntry> {
    vec![
        entry("صيدلية النور", "pharmacy", 30.05, 31.24),
        entry("Cairo Bakery", "bakery", 30.10, 31.30),
        entry("صيدلية الشفاء", "pharmacy", 31.20, 29.92),
    ]
}

fn seed_cache(store: &MemoryStore, entries: Vec<RawEntry>, age: TimeDelta) {
    let snapshot = CacheSnapshot::capture(entries, Utc::now() - age);
    assert!(CacheStore::new(store.clone()).write(&snapshot));
}

fn controller(
    source: FakeSource,
    store: &MemoryStore,
    options: SyncOptions,
) -> SyncController<FakeSource, MemoryStore, RecordingRenderer> {
    SyncController::new(source, store.clone(), RecordingRenderer::default(), options)
}

fn bad_status() -> FetchError {
    FetchError::BadStatus {
        status: 503,
        url: "https://directory.test/".to_owned(),
    }
}

// ---------------------------------------------------------------------------
// Boot
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fresh_cache_renders_immediately_and_skips_fetch() {
    let store = MemoryStore::new();
    seed_cache(&store, sample(), TimeDelta::minutes(5));
    let source = FakeSource::default();

    let mut ctl = controller(source.clone(), &store, SyncOptions::default());
    let report = ctl.boot().await;

    assert_eq!(report.cache, "hit");
    assert!(report.rendered_from_cache);
    assert!(matches!(report.fetch, FetchOutcome::Skipped));
    assert_eq!(source.calls(), 0);
    assert_eq!(ctl.phase(), SyncPhase::Ready(Freshness::Stale));
    assert_eq!(ctl.renderer().bodies(), vec!["results"]);
    assert_eq!(ctl.renderer().last().names.len(), 3);
}

#[tokio::test]
async fn expired_cache_triggers_fetch_and_rewrites_snapshot() {
    let store = MemoryStore::new();
    seed_cache(
        &store,
        vec![entry("Old Shop", "misc", 30.0, 31.0)],
        TimeDelta::seconds(CACHE_TTL_SECS + 60),
    );
    let source = FakeSource::replying(vec![Ok(sample())]);

    let mut ctl = controller(source.clone(), &store, SyncOptions::default());
    let report = ctl.boot().await;

    assert_eq!(report.cache, "expired");
    assert!(!report.rendered_from_cache);
    assert!(matches!(report.fetch, FetchOutcome::Fetched { count: 3 }));
    assert_eq!(source.calls(), 1);
    assert_eq!(ctl.renderer().bodies(), vec!["loading", "results"]);
    assert_eq!(ctl.renderer().last().freshness, Some(Freshness::Fresh));

    let cached = CacheStore::new(store.clone()).read().expect("snapshot rewritten");
    assert_eq!(cached.entries, sample());
}

#[tokio::test]
async fn cold_start_loads_then_shows_results() {
    let store = MemoryStore::new();
    let source = FakeSource::replying(vec![Ok(sample())]);

    let mut ctl = controller(source, &store, SyncOptions::default());
    let report = ctl.boot().await;

    assert_eq!(report.cache, "miss");
    assert_eq!(report.phase, SyncPhase::Ready(Freshness::Fresh));
    assert_eq!(ctl.renderer().bodies(), vec!["loading", "results"]);
    assert!(store.get(SNAPSHOT_KEY).unwrap().is_some());
}

#[tokio::test]
async fn failed_fetch_without_cache_shows_network_error() {
    let store = MemoryStore::new();
    let source = FakeSource::replying(vec![Err(bad_status())]);

    let mut ctl = controller(source, &store, SyncOptions::default());
    let report = ctl.boot().await;

    assert!(matches!(report.fetch, FetchOutcome::Failed(_)));
    assert_eq!(ctl.phase(), SyncPhase::FetchFailed);
    assert_eq!(ctl.renderer().bodies(), vec!["loading", "network_error"]);
    assert!(store.get(SNAPSHOT_KEY).unwrap().is_none());
}

#[tokio::test]
async fn refresh_failure_after_cache_render_is_silent() {
    let store = MemoryStore::new();
    seed_cache(&store, sample(), TimeDelta::minutes(1));
    let source = FakeSource::replying(vec![Err(bad_status())]);
    let options = SyncOptions {
        force_refresh: true,
        ..SyncOptions::default()
    };

    let mut ctl = controller(source.clone(), &store, options);
    let report = ctl.boot().await;

    assert_eq!(source.calls(), 1);
    assert!(matches!(report.fetch, FetchOutcome::Failed(_)));
    assert_eq!(report.phase, SyncPhase::Ready(Freshness::Stale));
    assert!(!ctl.renderer().bodies().contains(&"network_error"));
    assert_eq!(ctl.renderer().last().names.len(), 3);
}

#[tokio::test]
async fn forced_refresh_success_rerenders_even_when_unchanged() {
    let store = MemoryStore::new();
    seed_cache(&store, sample(), TimeDelta::minutes(1));
    let source = FakeSource::replying(vec![Ok(sample())]);
    let options = SyncOptions {
        force_refresh: true,
        ..SyncOptions::default()
    };

    let mut ctl = controller(source, &store, options);
    ctl.boot().await;

    let frames = &ctl.renderer().frames;
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].freshness, Some(Freshness::Stale));
    assert_eq!(frames[1].freshness, Some(Freshness::Fresh));
    assert_eq!(frames[0].names, frames[1].names);
}

#[tokio::test]
async fn empty_directory_is_no_results_not_an_error() {
    let store = MemoryStore::new();
    let source = FakeSource::replying(vec![Ok(Vec::new())]);

    let mut ctl = controller(source, &store, SyncOptions::default());
    ctl.boot().await;

    assert_eq!(ctl.phase(), SyncPhase::Ready(Freshness::Fresh));
    assert_eq!(ctl.renderer().last().body, "no_results");
}

#[tokio::test]
async fn corrupt_snapshot_is_treated_as_a_miss() {
    let store = MemoryStore::new();
    store.set(SNAPSHOT_KEY, "{not json").unwrap();
    let source = FakeSource::replying(vec![Ok(sample())]);

    let mut ctl = controller(source.clone(), &store, SyncOptions::default());
    let report = ctl.boot().await;

    assert_eq!(report.cache, "corrupt");
    assert_eq!(source.calls(), 1);
    assert_eq!(ctl.renderer().bodies(), vec!["loading", "results"]);
}

#[tokio::test]
async fn old_schema_snapshot_is_ignored() {
    let store = MemoryStore::new();
    let old = serde_json::json!({
        "timestamp": Utc::now().to_rfc3339(),
        "schema_version": 1,
        "entries": [{ "name": "Legacy" }],
    });
    store.set(SNAPSHOT_KEY, &old.to_string()).unwrap();
    let source = FakeSource::replying(vec![Ok(sample())]);

    let mut ctl = controller(source.clone(), &store, SyncOptions::default());
    let report = ctl.boot().await;

    assert_eq!(report.cache, "schema_mismatch");
    assert_eq!(source.calls(), 1);
    assert!(!ctl.renderer().last().names.contains(&"Legacy".to_owned()));
}

#[tokio::test]
async fn cache_write_failure_does_not_block_results() {
    let store = MemoryStore::new();
    store.reject_writes(true);
    let source = FakeSource::replying(vec![Ok(sample())]);

    let mut ctl = controller(source, &store, SyncOptions::default());
    ctl.boot().await;

    assert_eq!(ctl.renderer().last().body, "results");
    assert!(store.get(SNAPSHOT_KEY).unwrap().is_none());
}

#[tokio::test]
async fn retried_network_failure_through_real_client_shows_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let client = DirectoryClient::new(&server.uri(), Duration::from_secs(5), "dalil-test")
        .unwrap()
        .with_retry(1, 0);
    let store = MemoryStore::new();
    let mut ctl = SyncController::new(
        client,
        store.clone(),
        RecordingRenderer::default(),
        SyncOptions::default(),
    );
    let report = ctl.boot().await;

    assert!(matches!(
        report.fetch,
        FetchOutcome::Failed(FetchError::BadStatus { status: 500, .. })
    ));
    assert_eq!(ctl.renderer().bodies(), vec!["loading", "network_error"]);
}

// ---------------------------------------------------------------------------
// Interaction
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_and_category_filter_results() {
    let store = MemoryStore::new();
    seed_cache(&store, sample(), TimeDelta::minutes(1));
    let mut ctl = controller(FakeSource::default(), &store, SyncOptions::default());
    ctl.boot().await;

    // hamza-less, ta-marbuta-folded spelling still matches
    ctl.submit_search("صيدليه");
    assert_eq!(ctl.renderer().last().names.len(), 2);

    ctl.select_category(Some("bakery".to_owned()));
    assert_eq!(ctl.renderer().last().body, "no_results");

    ctl.submit_search("");
    assert_eq!(ctl.renderer().last().names, vec!["Cairo Bakery".to_owned()]);

    ctl.select_category(Some(String::new()));
    assert_eq!(ctl.state().category(), None);
    assert_eq!(ctl.renderer().last().names.len(), 3);
}

#[tokio::test]
async fn facets_follow_first_appearance_and_survive_filtering() {
    let store = MemoryStore::new();
    seed_cache(&store, sample(), TimeDelta::minutes(1));
    let mut ctl = controller(FakeSource::default(), &store, SyncOptions::default());
    ctl.boot().await;

    let expected = vec!["pharmacy".to_owned(), "bakery".to_owned()];
    assert_eq!(ctl.renderer().last().categories, expected);

    ctl.select_category(Some("bakery".to_owned()));
    assert_eq!(ctl.renderer().last().categories, expected);
}

#[tokio::test]
async fn distance_sort_orders_nearest_first() {
    let store = MemoryStore::new();
    seed_cache(&store, sample(), TimeDelta::minutes(1));
    let mut ctl = controller(FakeSource::default(), &store, SyncOptions::default());
    ctl.boot().await;

    // Alexandria
    let here = Coordinates::new(31.2, 29.9).unwrap();
    assert!(ctl.set_user_location(here));
    ctl.set_sort(SortMode::Distance);

    let names = &ctl.renderer().last().names;
    assert_eq!(names[0], "صيدلية الشفاء");

    let results = ctl.results();
    assert!(results[0].distance_km.unwrap() < results[1].distance_km.unwrap());
}

#[tokio::test]
async fn user_location_is_set_once() {
    let store = MemoryStore::new();
    let mut ctl = controller(FakeSource::default(), &store, SyncOptions::default());

    let first = Coordinates::new(30.0, 31.0).unwrap();
    let second = Coordinates::new(10.0, 10.0).unwrap();
    assert!(ctl.set_user_location(first));
    assert!(!ctl.set_user_location(second));
    assert_eq!(ctl.state().user_location(), Some(first));
}

#[tokio::test]
async fn language_toggle_persists_without_fetching() {
    let store = MemoryStore::new();
    seed_cache(&store, sample(), TimeDelta::minutes(1));
    let source = FakeSource::default();
    let mut ctl = controller(source.clone(), &store, SyncOptions::default());
    ctl.boot().await;

    assert_eq!(ctl.toggle_language(), Language::Secondary);
    assert_eq!(ctl.renderer().last().language, Language::Secondary);
    assert_eq!(source.calls(), 0);
    assert_eq!(
        PreferenceStore::new(store.clone()).load(),
        Language::Secondary
    );

    let reopened = controller(source, &store, SyncOptions::default());
    assert_eq!(reopened.state().language(), Language::Secondary);
}

#[tokio::test]
async fn debounce_runs_only_the_latest_input() {
    let store = MemoryStore::new();
    seed_cache(&store, sample(), TimeDelta::minutes(1));
    let mut ctl = controller(FakeSource::default(), &store, SyncOptions::default());
    ctl.boot().await;
    let frames_after_boot = ctl.renderer().frames.len();

    let t0 = tokio::time::Instant::now();
    ctl.on_search_input_at("c", t0);
    ctl.on_search_input_at("cairo", t0 + Duration::from_millis(100));

    assert!(!ctl.tick(t0 + Duration::from_millis(250)));
    assert_eq!(ctl.renderer().frames.len(), frames_after_boot);

    assert!(ctl.tick(t0 + Duration::from_millis(300)));
    assert_eq!(ctl.state().search_text(), "cairo");
    assert_eq!(ctl.renderer().frames.len(), frames_after_boot + 1);
    assert_eq!(ctl.renderer().last().names, vec!["Cairo Bakery".to_owned()]);
}

#[tokio::test(start_paused = true)]
async fn settle_waits_out_the_debounce_delay() {
    let store = MemoryStore::new();
    seed_cache(&store, sample(), TimeDelta::minutes(1));
    let mut ctl = controller(FakeSource::default(), &store, SyncOptions::default());
    ctl.boot().await;

    let started = tokio::time::Instant::now();
    ctl.on_search_input("bakery");
    ctl.settle().await;

    assert!(started.elapsed() >= Duration::from_millis(200));
    assert_eq!(ctl.state().search_text(), "bakery");
    assert_eq!(ctl.renderer().last().names, vec!["Cairo Bakery".to_owned()]);
}
