use anyhow::Context;
use scrape_engine::Orchestrator;
use scrape_logging::{scrape_info, scrape_warn};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::{JoinError, JoinSet};
use url::Url;

use crate::render::render;
use crate::settings::Settings;

/// Reads one URL per stdin line, submits each, and prints every state change
/// until stdin closes and in-flight submits have settled.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let orchestrator = Orchestrator::new(&settings.engine_config())
        .context("failed to build HTTP client")?;
    let base = match Url::parse(orchestrator.service_base_url()) {
        Ok(base) => Some(base),
        Err(err) => {
            scrape_warn!("service base url is not a valid URL: {}", err);
            None
        }
    };
    scrape_info!("using scrape service at {}", orchestrator.service_base_url());

    print_lines(&render(&orchestrator.view(), base.as_ref()));
    let mut changes = orchestrator.changes();
    let renderer = tokio::spawn(async move {
        while let Some(view) = changes.recv().await {
            print_lines(&render(&view, base.as_ref()));
        }
    });

    let mut in_flight = InFlight::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        in_flight.reap_finished();
        let orchestrator = orchestrator.clone();
        in_flight.spawn(async move { orchestrator.run(line).await });
    }

    in_flight.settle().await;
    // Dropping the last orchestrator ends the change stream after the final view.
    drop(orchestrator);
    renderer.await.context("render task failed")?;
    Ok(())
}

/// Submits still running. Finished ones are reaped as new lines arrive so the
/// set stays bounded by what is actually in flight.
#[derive(Default)]
struct InFlight {
    tasks: JoinSet<()>,
}

impl InFlight {
    fn spawn<F>(&mut self, submit: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        self.tasks.spawn(submit);
    }

    fn reap_finished(&mut self) {
        while let Some(joined) = self.tasks.try_join_next() {
            log_abnormal(joined);
        }
    }

    async fn settle(&mut self) {
        while let Some(joined) = self.tasks.join_next().await {
            log_abnormal(joined);
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.tasks.len()
    }
}

fn log_abnormal(joined: Result<(), JoinError>) {
    if let Err(err) = joined {
        scrape_warn!("submit task ended abnormally: {}", err);
    }
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}
