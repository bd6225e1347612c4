use scrape_core::{AppViewModel, Status};
use url::Url;

/// Turns a view model into the lines printed for it.
///
/// `base` resolves origin-relative image paths into clickable links; without
/// it the references are printed as received.
pub fn render(view: &AppViewModel, base: Option<&Url>) -> Vec<String> {
    let mut lines = Vec::new();
    match view.status {
        Status::Idle => lines.push("Enter a page URL to scrape its images.".to_string()),
        Status::Loading => lines.push("Scraping...".to_string()),
        Status::Error => {
            let message = view.error_message.as_deref().unwrap_or_default();
            lines.push(format!("Error: {message}"));
        }
        Status::Success => {}
    }

    if let Some(location) = &view.download_location {
        lines.push(format!("Images are available for download at: {location}"));
    }

    if view.status == Status::Success {
        if view.images.is_empty() {
            lines.push("No images found.".to_string());
        } else {
            let links = match base {
                Some(base) => view.image_links(base),
                None => view.images.clone(),
            };
            lines.push(format!("{} images:", links.len()));
            lines.extend(links.into_iter().map(|link| format!("  {link}")));
        }
    }
    lines
}
