#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Entry point for a single outage-map ingestion run.
//!
//! Takes no arguments. Exits `0` when a snapshot was archived or there was
//! no new data, and `1` on any fatal error.

use std::process::ExitCode;
use std::time::Instant;

use pse_outages_archive::Archive;
use pse_outages_ingest::{RunError, RunOutcome, run};
use pse_outages_source::http::HttpSource;
use pse_outages_source::source_def;

#[tokio::main]
async fn main() -> ExitCode {
    pretty_env_logger::init();

    let start = Instant::now();
    match run_from_env().await {
        Ok(RunOutcome::Unchanged { last_updated }) => {
            log::info!("No new data since {last_updated}");
            ExitCode::SUCCESS
        }
        Ok(RunOutcome::Persisted(persisted)) => {
            log::info!(
                "Archived snapshot {}: {} feature(s), {} skipped, in {:.1}s",
                persisted.last_updated,
                persisted.feature_count,
                persisted.rejected_count,
                start.elapsed().as_secs_f64()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run_from_env() -> Result<RunOutcome, RunError> {
    let source = HttpSource::new(source_def::pse()?)?;
    let archive = Archive::from_env();
    log::debug!("Data directory: {}", archive.data_dir().display());

    run(&source, &archive).await
}
