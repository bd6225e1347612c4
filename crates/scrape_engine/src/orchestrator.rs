use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use scrape_core::{update, AppState, AppViewModel, Effect, Msg, RequestId};
use scrape_logging::{scrape_debug, scrape_info, scrape_warn};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::service::{decode_manifest, decode_scrape_result, manifest_url, scrape_request_url};
use crate::{EngineConfig, FailureKind, FetchError, Fetcher, ReqwestFetcher};

/// Drives submitted URLs through the scrape and manifest phases.
///
/// The orchestrator is the only writer of the [`AppState`]. Every state change
/// is published as an [`AppViewModel`]: [`Orchestrator::subscribe`] yields only
/// the latest view, [`Orchestrator::changes`] yields every one in order.
/// Cloning is cheap and every clone shares the same state.
#[derive(Clone)]
pub struct Orchestrator {
    inner: Arc<Inner>,
}

struct Inner {
    fetcher: Arc<dyn Fetcher>,
    service_base_url: String,
    state: Mutex<AppState>,
    view_tx: watch::Sender<AppViewModel>,
    listeners: Mutex<Vec<mpsc::UnboundedSender<AppViewModel>>>,
}

impl Orchestrator {
    pub fn new(config: &EngineConfig) -> Result<Self, FetchError> {
        let fetcher = ReqwestFetcher::new(config.fetch.clone())?;
        Ok(Self::with_fetcher(
            config.service_base_url.clone(),
            Arc::new(fetcher),
        ))
    }

    pub fn with_fetcher(service_base_url: impl Into<String>, fetcher: Arc<dyn Fetcher>) -> Self {
        let state = AppState::new();
        let (view_tx, _) = watch::channel(state.view());
        Self {
            inner: Arc::new(Inner {
                fetcher,
                service_base_url: service_base_url.into(),
                state: Mutex::new(state),
                view_tx,
                listeners: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn service_base_url(&self) -> &str {
        &self.inner.service_base_url
    }

    /// Fire-and-forget submit. Must be called from within a tokio runtime.
    ///
    /// The outcome is observed through [`Orchestrator::view`] or
    /// [`Orchestrator::subscribe`]; the handle only reports completion.
    pub fn submit(&self, url: impl Into<String>) -> JoinHandle<()> {
        let this = self.clone();
        let url = url.into();
        tokio::spawn(async move { this.run(url).await })
    }

    /// Runs one submit to settlement.
    pub async fn run(&self, url: impl Into<String>) {
        let mut pending: VecDeque<Effect> = self.dispatch(Msg::UrlSubmitted(url.into())).into();
        while let Some(effect) = pending.pop_front() {
            let msg = self.execute(effect).await;
            pending.extend(self.dispatch(msg));
        }
    }

    pub fn view(&self) -> AppViewModel {
        self.inner.view_tx.borrow().clone()
    }

    /// Latest-value subscription; intermediate views may be skipped.
    pub fn subscribe(&self) -> watch::Receiver<AppViewModel> {
        self.inner.view_tx.subscribe()
    }

    /// Every view published from now on, in state order. The stream ends once
    /// the last clone of the orchestrator is dropped.
    pub fn changes(&self) -> mpsc::UnboundedReceiver<AppViewModel> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    fn dispatch(&self, msg: Msg) -> Vec<Effect> {
        let mut guard = self
            .inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let state = std::mem::take(&mut *guard);
        let (mut state, effects) = update(state, msg);
        let view = state.view();
        let was_dirty = state.consume_dirty();
        *guard = state;
        // Publish under the lock so observers see changes in state order.
        if was_dirty {
            self.inner
                .listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .retain(|tx| tx.send(view.clone()).is_ok());
            self.inner.view_tx.send_replace(view);
        }
        effects
    }

    async fn execute(&self, effect: Effect) -> Msg {
        match effect {
            Effect::RequestScrape { request_id, url } => self.request_scrape(request_id, &url).await,
            Effect::FetchManifest {
                request_id,
                location,
            } => self.fetch_manifest(request_id, &location).await,
        }
    }

    async fn request_scrape(&self, request_id: RequestId, url: &str) -> Msg {
        let target = scrape_request_url(&self.inner.service_base_url, url);
        scrape_info!(req = request_id; "requesting scrape: {}", target);

        let result = self.inner.fetcher.get(&target).await;
        match result.and_then(|output| decode_scrape_result(&output.bytes)) {
            Ok(scrape) => {
                scrape_info!(req = request_id; "images available at {}", scrape.download_location);
                Msg::ScrapeResolved {
                    request_id,
                    download_location: scrape.download_location,
                }
            }
            Err(err) => failure_msg(request_id, err, |status| Msg::ScrapeRejected {
                request_id,
                status,
            }),
        }
    }

    async fn fetch_manifest(&self, request_id: RequestId, location: &str) -> Msg {
        let result = match manifest_url(&self.inner.service_base_url, location) {
            Ok(target) => {
                scrape_debug!(req = request_id; "fetching manifest: {}", target);
                let fetched = self.inner.fetcher.get(&target).await;
                fetched.and_then(|output| decode_manifest(&output.bytes))
            }
            Err(err) => Err(err),
        };
        match result {
            Ok(manifest) => {
                scrape_info!(req = request_id; "manifest lists {} images", manifest.images.len());
                Msg::ManifestLoaded {
                    request_id,
                    images: manifest.images,
                }
            }
            Err(err) => failure_msg(request_id, err, |status| Msg::ManifestRejected {
                request_id,
                status,
            }),
        }
    }
}

/// Status rejections get the phase's own message; everything else carries the
/// failure text through.
fn failure_msg(request_id: RequestId, err: FetchError, rejected: impl FnOnce(u16) -> Msg) -> Msg {
    scrape_warn!(req = request_id; "{} ({})", err.message, err.kind);
    match err.kind {
        FailureKind::HttpStatus(status) => rejected(status),
        _ => Msg::RequestFailed {
            request_id,
            message: err.message,
        },
    }
}
