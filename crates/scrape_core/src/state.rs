use crate::view_model::{AppViewModel, Status};

/// Sequence number allocated per non-empty submit.
pub type RequestId = u64;

pub const EMPTY_URL_MESSAGE: &str = "Please enter a URL.";
pub const SCRAPE_FAILED_MESSAGE: &str = "Failed to scrape the URL.";
pub const MANIFEST_FAILED_MESSAGE: &str = "Failed to retrieve images.";

/// The single source of truth for what the user sees.
///
/// Exactly one variant is active, so combinations such as "loading with stale
/// images" cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScrapeState {
    #[default]
    Idle,
    /// Waiting on phase 1 (`None`) or phase 2 (`Some(location)`).
    Loading { download_location: Option<String> },
    /// `download_location` survives only a phase 2 status rejection.
    Error {
        message: String,
        download_location: Option<String>,
    },
    Success {
        download_location: String,
        images: Vec<String>,
    },
}

impl ScrapeState {
    pub fn status(&self) -> Status {
        match self {
            ScrapeState::Idle => Status::Idle,
            ScrapeState::Loading { .. } => Status::Loading,
            ScrapeState::Error { .. } => Status::Error,
            ScrapeState::Success { .. } => Status::Success,
        }
    }

    pub fn download_location(&self) -> Option<&str> {
        match self {
            ScrapeState::Idle => None,
            ScrapeState::Loading { download_location }
            | ScrapeState::Error {
                download_location, ..
            } => download_location.as_deref(),
            ScrapeState::Success {
                download_location, ..
            } => Some(download_location),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    scrape: ScrapeState,
    last_request_id: RequestId,
    active_request: Option<RequestId>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let (error_message, images) = match &self.scrape {
            ScrapeState::Error { message, .. } => (Some(message.clone()), Vec::new()),
            ScrapeState::Success { images, .. } => (None, images.clone()),
            ScrapeState::Idle | ScrapeState::Loading { .. } => (None, Vec::new()),
        };
        AppViewModel {
            status: self.scrape.status(),
            error_message,
            download_location: self.scrape.download_location().map(ToOwned::to_owned),
            images,
            is_loading: self.is_loading(),
            dirty: self.dirty,
        }
    }

    pub fn scrape(&self) -> &ScrapeState {
        &self.scrape
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.scrape, ScrapeState::Loading { .. })
    }

    /// The request whose results are currently accepted, if any.
    pub fn active_request(&self) -> Option<RequestId> {
        self.active_request
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn is_current(&self, request_id: RequestId) -> bool {
        self.active_request == Some(request_id)
    }

    /// Allocates a fresh request id and replaces any previous outcome with `Loading`.
    pub(crate) fn begin_request(&mut self) -> RequestId {
        self.last_request_id += 1;
        let request_id = self.last_request_id;
        self.active_request = Some(request_id);
        self.set(ScrapeState::Loading {
            download_location: None,
        });
        request_id
    }

    pub(crate) fn reject_input(&mut self, message: &str) {
        self.active_request = None;
        self.set(ScrapeState::Error {
            message: message.to_string(),
            download_location: None,
        });
    }

    pub(crate) fn resolve_location(&mut self, download_location: String) {
        self.set(ScrapeState::Loading {
            download_location: Some(download_location),
        });
    }

    /// Terminal transition; the active request stops accepting results.
    pub(crate) fn settle(&mut self, outcome: ScrapeState) {
        self.active_request = None;
        self.set(outcome);
    }

    fn set(&mut self, scrape: ScrapeState) {
        self.scrape = scrape;
        self.dirty = true;
    }
}
