use std::collections::HashMap;
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use pretty_assertions::assert_eq;
use scrape_core::{
    AppViewModel, Status, EMPTY_URL_MESSAGE, MANIFEST_FAILED_MESSAGE, SCRAPE_FAILED_MESSAGE,
};
use scrape_engine::{FailureKind, FetchError, FetchOutput, Fetcher, Orchestrator};
use tokio::sync::{watch, Notify};

const BASE: &str = "http://scraper.test";
const MANIFEST: &str = "https://host/manifest.json";

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(scrape_logging::initialize_for_tests);
}

fn scrape_url(page: &str) -> String {
    format!("{BASE}/api/scrape/images?url={page}")
}

fn json(body: &str) -> Result<FetchOutput, FetchError> {
    Ok(FetchOutput {
        bytes: body.as_bytes().to_vec(),
    })
}

fn status(code: u16) -> Result<FetchOutput, FetchError> {
    Err(FetchError::new(
        FailureKind::HttpStatus(code),
        format!("{code}"),
    ))
}

fn location_body(location: &str) -> String {
    format!(r#"{{"Images are available for download at": "{location}"}}"#)
}

/// Canned responses keyed by URL; records every call and, once an observer is
/// attached, the view model visible at the time of each call.
#[derive(Default)]
struct FakeFetcher {
    routes: Mutex<HashMap<String, Result<FetchOutput, FetchError>>>,
    calls: Mutex<Vec<String>>,
    observer: Mutex<Option<watch::Receiver<AppViewModel>>>,
    observed: Mutex<Vec<AppViewModel>>,
    gate: Option<(String, Arc<Notify>)>,
}

impl FakeFetcher {
    fn new() -> Self {
        Self::default()
    }

    fn gated(url: &str, gate: Arc<Notify>) -> Self {
        Self {
            gate: Some((url.to_string(), gate)),
            ..Self::default()
        }
    }

    fn route(self, url: &str, response: Result<FetchOutput, FetchError>) -> Self {
        self.routes.lock().unwrap().insert(url.to_string(), response);
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Fetcher for FakeFetcher {
    async fn get(&self, url: &str) -> Result<FetchOutput, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());
        let snapshot = self
            .observer
            .lock()
            .unwrap()
            .as_ref()
            .map(|observer| observer.borrow().clone());
        if let Some(view) = snapshot {
            self.observed.lock().unwrap().push(view);
        }
        if let Some((gated_url, gate)) = &self.gate {
            if gated_url == url {
                gate.notified().await;
            }
        }
        self.routes
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or_else(|| status(404))
    }
}

fn orchestrator(fetcher: FakeFetcher) -> (Orchestrator, Arc<FakeFetcher>) {
    let fetcher = Arc::new(fetcher);
    let orchestrator = Orchestrator::with_fetcher(BASE, fetcher.clone());
    (orchestrator, fetcher)
}

#[tokio::test]
async fn empty_url_is_rejected_without_network() {
    init_logging();
    let (orchestrator, fetcher) = orchestrator(FakeFetcher::new());

    orchestrator.run("").await;

    let view = orchestrator.view();
    assert_eq!(view.status, Status::Error);
    assert_eq!(view.error_message.as_deref(), Some(EMPTY_URL_MESSAGE));
    assert!(!view.is_loading);
    assert!(fetcher.calls().is_empty());
}

#[tokio::test]
async fn two_phases_settle_into_success() {
    init_logging();
    let page = "https://example.com/gallery";
    let (orchestrator, fetcher) = orchestrator(
        FakeFetcher::new()
            .route(&scrape_url(page), json(&location_body(MANIFEST)))
            .route(MANIFEST, json(r#"{"images": ["a.png", "b.png"]}"#)),
    );

    orchestrator.run(page).await;

    let view = orchestrator.view();
    assert_eq!(view.status, Status::Success);
    assert_eq!(view.download_location.as_deref(), Some(MANIFEST));
    assert_eq!(view.images, vec!["a.png".to_string(), "b.png".to_string()]);
    assert_eq!(view.error_message, None);
    assert_eq!(fetcher.calls(), vec![scrape_url(page), MANIFEST.to_string()]);
}

#[tokio::test]
async fn scrape_status_failure_stops_before_manifest() {
    init_logging();
    let page = "https://example.com";
    let (orchestrator, fetcher) =
        orchestrator(FakeFetcher::new().route(&scrape_url(page), status(404)));

    orchestrator.run(page).await;

    let view = orchestrator.view();
    assert_eq!(view.status, Status::Error);
    assert_eq!(view.error_message.as_deref(), Some(SCRAPE_FAILED_MESSAGE));
    assert_eq!(view.download_location, None);
    assert_eq!(fetcher.calls().len(), 1);
}

#[tokio::test]
async fn manifest_status_failure_keeps_location() {
    init_logging();
    let page = "https://example.com";
    let (orchestrator, _fetcher) = orchestrator(
        FakeFetcher::new()
            .route(&scrape_url(page), json(&location_body(MANIFEST)))
            .route(MANIFEST, status(500)),
    );

    orchestrator.run(page).await;

    let view = orchestrator.view();
    assert_eq!(view.status, Status::Error);
    assert_eq!(view.error_message.as_deref(), Some(MANIFEST_FAILED_MESSAGE));
    assert_eq!(view.download_location.as_deref(), Some(MANIFEST));
    assert!(!view.is_loading);
}

#[tokio::test]
async fn manifest_without_images_is_empty_success() {
    init_logging();
    let page = "https://example.com";
    let (orchestrator, _fetcher) = orchestrator(
        FakeFetcher::new()
            .route(&scrape_url(page), json(&location_body(MANIFEST)))
            .route(MANIFEST, json("{}")),
    );

    orchestrator.run(page).await;

    let view = orchestrator.view();
    assert_eq!(view.status, Status::Success);
    assert!(view.images.is_empty());
    assert_eq!(view.download_location.as_deref(), Some(MANIFEST));
}

#[tokio::test]
async fn missing_location_key_surfaces_decode_message() {
    init_logging();
    let page = "https://example.com";
    let (orchestrator, fetcher) =
        orchestrator(FakeFetcher::new().route(&scrape_url(page), json("{}")));

    orchestrator.run(page).await;

    let view = orchestrator.view();
    assert_eq!(view.status, Status::Error);
    let message = view.error_message.unwrap();
    assert!(message.contains("missing field"), "unexpected: {message}");
    assert_eq!(view.download_location, None);
    assert_eq!(fetcher.calls().len(), 1);
}

#[tokio::test]
async fn malformed_manifest_drops_partial_location() {
    init_logging();
    let page = "https://example.com";
    let (orchestrator, _fetcher) = orchestrator(
        FakeFetcher::new()
            .route(&scrape_url(page), json(&location_body(MANIFEST)))
            .route(MANIFEST, json("<html>oops</html>")),
    );

    orchestrator.run(page).await;

    let view = orchestrator.view();
    assert_eq!(view.status, Status::Error);
    assert!(view.error_message.is_some());
    assert_eq!(view.download_location, None);
}

#[tokio::test]
async fn unparsable_location_fails_without_manifest_call() {
    init_logging();
    let page = "https://example.com";
    let (orchestrator, fetcher) = orchestrator(
        FakeFetcher::new().route(&scrape_url(page), json(&location_body("http://[::1"))),
    );

    orchestrator.run(page).await;

    let view = orchestrator.view();
    assert_eq!(view.status, Status::Error);
    assert_eq!(view.error_message.as_deref(), Some("invalid IPv6 address"));
    assert_eq!(view.download_location, None);
    assert!(!view.is_loading);
    assert_eq!(fetcher.calls(), vec![scrape_url(page)]);
}

#[tokio::test]
async fn transport_failure_message_is_passed_through() {
    init_logging();
    let page = "https://example.com";
    let (orchestrator, _fetcher) = orchestrator(FakeFetcher::new().route(
        &scrape_url(page),
        Err(FetchError::new(FailureKind::Network, "connection refused")),
    ));

    orchestrator.run(page).await;

    assert_eq!(
        orchestrator.view().error_message.as_deref(),
        Some("connection refused")
    );
}

#[tokio::test]
async fn relative_location_is_fetched_from_service_origin() {
    init_logging();
    let page = "https://example.com";
    let (orchestrator, fetcher) = orchestrator(
        FakeFetcher::new()
            .route(&scrape_url(page), json(&location_body("/api/downloads/abc")))
            .route(
                "http://scraper.test/api/downloads/abc",
                json(r#"{"images": ["/downloads/abc/a.png"]}"#),
            ),
    );

    orchestrator.run(page).await;

    let view = orchestrator.view();
    assert_eq!(view.status, Status::Success);
    assert_eq!(view.download_location.as_deref(), Some("/api/downloads/abc"));
    assert_eq!(
        fetcher.calls()[1],
        "http://scraper.test/api/downloads/abc".to_string()
    );
}

#[tokio::test]
async fn resubmit_replaces_previous_outcome() {
    init_logging();
    let (orchestrator, _fetcher) = orchestrator(
        FakeFetcher::new()
            .route(&scrape_url("https://a.example"), json(&location_body(MANIFEST)))
            .route(MANIFEST, json(r#"{"images": ["a.png"]}"#))
            .route(&scrape_url("https://b.example"), status(500)),
    );

    orchestrator.run("https://a.example").await;
    assert_eq!(orchestrator.view().images.len(), 1);

    orchestrator.run("https://b.example").await;
    let view = orchestrator.view();
    assert_eq!(view.status, Status::Error);
    assert!(view.images.is_empty());
    assert_eq!(view.download_location, None);

    orchestrator.run("https://a.example").await;
    let view = orchestrator.view();
    assert_eq!(view.status, Status::Success);
    assert_eq!(view.error_message, None);
    assert_eq!(view.images, vec!["a.png".to_string()]);
}

#[tokio::test]
async fn loading_is_set_only_while_calls_are_in_flight() {
    init_logging();
    let page = "https://example.com";
    let fetcher = Arc::new(
        FakeFetcher::new()
            .route(&scrape_url(page), json(&location_body(MANIFEST)))
            .route(MANIFEST, json(r#"{"images": ["a.png"]}"#)),
    );
    let orchestrator = Orchestrator::with_fetcher(BASE, fetcher.clone());
    *fetcher.observer.lock().unwrap() = Some(orchestrator.subscribe());
    assert!(!orchestrator.view().is_loading);

    orchestrator.run(page).await;

    let observed = fetcher.observed.lock().unwrap().clone();
    assert_eq!(observed.len(), 2);
    assert!(observed.iter().all(|view| view.is_loading));
    assert_eq!(observed[0].download_location, None);
    assert_eq!(observed[1].download_location.as_deref(), Some(MANIFEST));
    assert!(!orchestrator.view().is_loading);
}

#[tokio::test]
async fn submit_publishes_changes_to_subscribers() {
    init_logging();
    let page = "https://example.com";
    let (orchestrator, _fetcher) = orchestrator(
        FakeFetcher::new()
            .route(&scrape_url(page), json(&location_body(MANIFEST)))
            .route(MANIFEST, json(r#"{"images": ["a.png"]}"#)),
    );
    let mut updates = orchestrator.subscribe();

    orchestrator.submit(page).await.expect("task");

    assert!(updates.has_changed().unwrap());
    let view = updates.borrow_and_update().clone();
    assert_eq!(view.status, Status::Success);
}

#[tokio::test]
async fn stale_request_cannot_overwrite_newer_result() {
    init_logging();
    let slow_page = "https://slow.example";
    let fast_page = "https://fast.example";
    let gate = Arc::new(Notify::new());
    let fetcher = Arc::new(
        FakeFetcher::gated(&scrape_url(slow_page), gate.clone())
            .route(
                &scrape_url(slow_page),
                json(&location_body("https://host/slow.json")),
            )
            .route(&scrape_url(fast_page), json(&location_body(MANIFEST)))
            .route(MANIFEST, json(r#"{"images": ["fast.png"]}"#)),
    );
    let orchestrator = Orchestrator::with_fetcher(BASE, fetcher.clone());

    let slow = orchestrator.submit(slow_page);
    while fetcher.calls().is_empty() {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    orchestrator.run(fast_page).await;
    assert_eq!(orchestrator.view().status, Status::Success);

    gate.notify_one();
    slow.await.expect("slow task");

    let view = orchestrator.view();
    assert_eq!(view.status, Status::Success);
    assert_eq!(view.images, vec!["fast.png".to_string()]);
    assert_eq!(view.download_location.as_deref(), Some(MANIFEST));
    assert!(!fetcher
        .calls()
        .contains(&"https://host/slow.json".to_string()));
}

#[tokio::test]
async fn change_stream_keeps_every_intermediate_view() {
    init_logging();
    let page = "https://example.com";
    let (orchestrator, _fetcher) = orchestrator(
        FakeFetcher::new()
            .route(&scrape_url(page), json(&location_body(MANIFEST)))
            .route(MANIFEST, json(r#"{"images": ["a.png"]}"#)),
    );
    let mut changes = orchestrator.changes();

    orchestrator.run(page).await;

    let mut seen = Vec::new();
    while let Ok(view) = changes.try_recv() {
        seen.push((view.status, view.download_location));
    }
    assert_eq!(
        seen,
        vec![
            (Status::Loading, None),
            (Status::Loading, Some(MANIFEST.to_string())),
            (Status::Success, Some(MANIFEST.to_string())),
        ]
    );
}

#[tokio::test]
async fn change_stream_ends_when_orchestrator_is_dropped() {
    init_logging();
    let (orchestrator, _fetcher) = orchestrator(FakeFetcher::new());
    let mut changes = orchestrator.changes();

    orchestrator.run("").await;
    drop(orchestrator);

    assert_eq!(changes.recv().await.map(|view| view.status), Some(Status::Error));
    assert!(changes.recv().await.is_none());
}
