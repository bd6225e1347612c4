//! Scrape engine: HTTP access and effect execution for the scrape core.
mod config;
mod fetch;
mod orchestrator;
pub mod service;
mod types;

pub use config::{EngineConfig, DEFAULT_SERVICE_BASE_URL};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use orchestrator::Orchestrator;
pub use types::{
    FailureKind, FetchError, FetchOutput, ImageManifest, ScrapeResult, DOWNLOAD_LOCATION_KEY,
};
