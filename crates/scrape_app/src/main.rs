mod app;
mod logging;
mod render;
mod settings;

use std::path::Path;

use anyhow::Context;
use scrape_logging::scrape_warn;

use crate::settings::{Settings, SETTINGS_FILENAME};

fn main() -> anyhow::Result<()> {
    let settings = match Settings::load(Path::new(SETTINGS_FILENAME)) {
        Ok(settings) => {
            logging::initialize(settings.log_destination);
            settings
        }
        Err(err) => {
            let settings = Settings::default();
            logging::initialize(settings.log_destination);
            scrape_warn!("{}; falling back to default settings", err);
            settings
        }
    };

    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    runtime.block_on(app::run(settings))
}
