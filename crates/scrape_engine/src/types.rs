use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// JSON key under which the scraping service publishes the manifest location.
///
/// This human-readable label is the actual wire key, not a typo.
pub const DOWNLOAD_LOCATION_KEY: &str = "Images are available for download at";

/// Phase 1 response body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScrapeResult {
    #[serde(rename = "Images are available for download at")]
    pub download_location: String,
}

/// Phase 2 response body. A missing `images` field decodes as empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ImageManifest {
    #[serde(default)]
    pub images: Vec<String>,
}

/// Body of a successful (2xx) response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub bytes: Vec<u8>,
}

/// A failed fetch or decode. `message` is what ends up in front of the user
/// for everything except [`FailureKind::HttpStatus`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Decode,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Decode => write!(f, "malformed response body"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
