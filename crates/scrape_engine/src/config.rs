use crate::FetchSettings;

pub const DEFAULT_SERVICE_BASE_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Origin of the scraping service, e.g. `http://127.0.0.1:8000`.
    pub service_base_url: String,
    pub fetch: FetchSettings,
}

impl EngineConfig {
    pub fn with_service(service_base_url: impl Into<String>) -> Self {
        Self {
            service_base_url: service_base_url.into(),
            fetch: FetchSettings::default(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::with_service(DEFAULT_SERVICE_BASE_URL)
    }
}
