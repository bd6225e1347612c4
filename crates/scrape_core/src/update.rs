use crate::{
    AppState, Effect, Msg, ScrapeState, EMPTY_URL_MESSAGE, MANIFEST_FAILED_MESSAGE,
    SCRAPE_FAILED_MESSAGE,
};

/// Pure update function: applies a message to state and returns any effects.
///
/// Result messages whose request id is not the active request are stale and
/// leave the state untouched.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    if let Some(request_id) = msg.request_id() {
        if !state.is_current(request_id) {
            return (state, Vec::new());
        }
    }

    let effects = match msg {
        Msg::UrlSubmitted(url) => {
            if url.is_empty() {
                state.reject_input(EMPTY_URL_MESSAGE);
                Vec::new()
            } else {
                let request_id = state.begin_request();
                vec![Effect::RequestScrape { request_id, url }]
            }
        }
        Msg::ScrapeResolved {
            request_id,
            download_location,
        } => {
            state.resolve_location(download_location.clone());
            vec![Effect::FetchManifest {
                request_id,
                location: download_location,
            }]
        }
        Msg::ScrapeRejected { .. } => {
            state.settle(ScrapeState::Error {
                message: SCRAPE_FAILED_MESSAGE.to_string(),
                download_location: None,
            });
            Vec::new()
        }
        Msg::ManifestLoaded { images, .. } => {
            // A manifest without a resolved location is out of order; settle
            // rather than leave the request loading.
            let outcome = match state.scrape().download_location() {
                Some(download_location) => ScrapeState::Success {
                    download_location: download_location.to_string(),
                    images,
                },
                None => ScrapeState::Error {
                    message: MANIFEST_FAILED_MESSAGE.to_string(),
                    download_location: None,
                },
            };
            state.settle(outcome);
            Vec::new()
        }
        Msg::ManifestRejected { .. } => {
            let download_location = state.scrape().download_location().map(ToOwned::to_owned);
            state.settle(ScrapeState::Error {
                message: MANIFEST_FAILED_MESSAGE.to_string(),
                download_location,
            });
            Vec::new()
        }
        Msg::RequestFailed { message, .. } => {
            state.settle(ScrapeState::Error {
                message,
                download_location: None,
            });
            Vec::new()
        }
    };

    (state, effects)
}
