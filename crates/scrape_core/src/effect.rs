use crate::RequestId;

/// Side effects requested by [`crate::update`]; the engine executes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Phase 1: ask the scraping service to scrape `url`.
    RequestScrape { request_id: RequestId, url: String },
    /// Phase 2: fetch the image manifest published at `location`.
    FetchManifest {
        request_id: RequestId,
        location: String,
    },
}

impl Effect {
    pub fn request_id(&self) -> RequestId {
        match self {
            Effect::RequestScrape { request_id, .. } | Effect::FetchManifest { request_id, .. } => {
                *request_id
            }
        }
    }
}
