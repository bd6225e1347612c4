use crate::RequestId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User submitted a URL. Not trimmed; only emptiness is checked.
    UrlSubmitted(String),
    /// Phase 1 returned the manifest location.
    ScrapeResolved {
        request_id: RequestId,
        download_location: String,
    },
    /// Phase 1 answered with a non-2xx status.
    ScrapeRejected { request_id: RequestId, status: u16 },
    /// Phase 2 returned the manifest; a missing `images` field arrives as empty.
    ManifestLoaded {
        request_id: RequestId,
        images: Vec<String>,
    },
    /// Phase 2 answered with a non-2xx status.
    ManifestRejected { request_id: RequestId, status: u16 },
    /// Transport, decode or any other failure in either phase.
    RequestFailed {
        request_id: RequestId,
        message: String,
    },
}

impl Msg {
    /// The request a result message belongs to; `None` for user input.
    pub fn request_id(&self) -> Option<RequestId> {
        match self {
            Msg::ScrapeResolved { request_id, .. }
            | Msg::ScrapeRejected { request_id, .. }
            | Msg::ManifestLoaded { request_id, .. }
            | Msg::ManifestRejected { request_id, .. }
            | Msg::RequestFailed { request_id, .. } => Some(*request_id),
            Msg::UrlSubmitted(_) => None,
        }
    }
}
