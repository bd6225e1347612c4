use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Error,
    Success,
}

/// Render-relevant snapshot of [`crate::AppState`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub status: Status,
    pub error_message: Option<String>,
    pub download_location: Option<String>,
    pub images: Vec<String>,
    pub is_loading: bool,
    pub dirty: bool,
}

impl AppViewModel {
    /// Resolves image references against `base` the way a browser resolves
    /// `<img src>`. References that cannot be joined are returned verbatim.
    pub fn image_links(&self, base: &Url) -> Vec<String> {
        self.images
            .iter()
            .map(|image| match base.join(image) {
                Ok(resolved) => resolved.to_string(),
                Err(_) => image.clone(),
            })
            .collect()
    }
}
