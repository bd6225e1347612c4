//! Wire contract of the scraping service.

use url::Url;

use crate::{FailureKind, FetchError, ImageManifest, ScrapeResult};

const SCRAPE_IMAGES_PATH: &str = "/api/scrape/images";

/// Builds the phase 1 request URL.
///
/// The user's URL is appended as-is, without percent-encoding, matching what
/// the scraping service has always received.
pub fn scrape_request_url(service_base_url: &str, page_url: &str) -> String {
    format!(
        "{}{}?url={}",
        service_base_url.trim_end_matches('/'),
        SCRAPE_IMAGES_PATH,
        page_url
    )
}

/// Resolves a manifest location against the service origin. Absolute
/// locations come back unchanged.
pub fn manifest_url(service_base_url: &str, location: &str) -> Result<String, FetchError> {
    let base = Url::parse(service_base_url)
        .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
    base.join(location)
        .map(String::from)
        .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))
}

pub fn decode_scrape_result(body: &[u8]) -> Result<ScrapeResult, FetchError> {
    serde_json::from_slice(body).map_err(decode_error)
}

pub fn decode_manifest(body: &[u8]) -> Result<ImageManifest, FetchError> {
    serde_json::from_slice(body).map_err(decode_error)
}

fn decode_error(err: serde_json::Error) -> FetchError {
    FetchError::new(FailureKind::Decode, err.to_string())
}
