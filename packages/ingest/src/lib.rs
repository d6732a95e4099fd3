#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Run orchestration for outage-map ingestion.
//!
//! A run moves through `START → FETCHED → {UNCHANGED | TRANSFORMED →
//! PERSISTED}`, or exits early with a fetch failure:
//!
//! 1. [`run`] loads the previous [`RunMetadata`] from the [`Archive`] and
//!    fetches the current snapshot.
//! 2. [`prepare`] compares timestamps and, if they differ, transforms the
//!    snapshot and produces the next metadata. It performs no I/O.
//! 3. [`persist`] writes the raw snapshot, then the feature collection,
//!    then the metadata. Metadata goes last so that a crash part-way
//!    through causes the next run to redo (and overwrite) the same
//!    artifacts.

use std::path::PathBuf;

use pse_outages_archive::{Archive, ArchiveError};
use pse_outages_snapshot_models::RunMetadata;
use pse_outages_source::{FetchedSnapshot, OutageSource, SourceError};
use pse_outages_transform::{TransformOutput, transform};

/// Fatal run errors. Each one terminates the process with a non-zero exit
/// code.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// The snapshot could not be fetched or parsed. Nothing was written.
    #[error("Error fetching outage data: {0}")]
    Fetch(#[from] SourceError),

    /// Metadata could not be read, or an artifact could not be written.
    /// Files written before the failure are left in place.
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),
}

/// Everything [`persist`] needs to write for a changed snapshot.
#[derive(Debug)]
pub struct PendingWrite {
    /// Upstream body, archived verbatim.
    pub body: String,
    /// Transformed collection and rejected areas.
    pub output: TransformOutput,
    /// Metadata to persist once the artifacts are written.
    pub metadata: RunMetadata,
}

/// Outcome of the timestamp gate.
#[derive(Debug)]
pub enum Prepared {
    /// The snapshot matches the last ingested one.
    Unchanged {
        /// The shared timestamp.
        last_updated: String,
    },
    /// The snapshot is new and has been transformed.
    Changed(Box<PendingWrite>),
}

/// Summary of a persisted run.
#[derive(Debug, Clone)]
pub struct PersistedRun {
    /// Timestamp of the ingested snapshot.
    pub last_updated: String,
    /// Raw snapshot archive file.
    pub source_path: PathBuf,
    /// Processed `GeoJSON` file.
    pub processed_path: PathBuf,
    /// Number of features written.
    pub feature_count: usize,
    /// Number of outage areas skipped as malformed.
    pub rejected_count: usize,
}

/// How a successful run ended.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// No new data; nothing was written.
    Unchanged {
        /// The unchanged upstream timestamp.
        last_updated: String,
    },
    /// A new snapshot was archived and metadata updated.
    Persisted(PersistedRun),
}

/// Applies the change-detection gate and, on change, transforms the
/// snapshot.
///
/// Takes the previous metadata by value and hands back the next metadata
/// inside [`PendingWrite`]; nothing is persisted here.
#[must_use]
pub fn prepare(previous: RunMetadata, fetched: FetchedSnapshot) -> Prepared {
    let FetchedSnapshot { body, snapshot } = fetched;

    if !previous.is_stale_for(&snapshot) {
        return Prepared::Unchanged {
            last_updated: snapshot.last_updated,
        };
    }

    log::info!(
        "New snapshot {} (previous {}): {} outage area(s)",
        snapshot.last_updated,
        previous.last_updated,
        snapshot.pse_map.len()
    );

    let output = transform(&snapshot);
    if !output.rejected.is_empty() {
        log::warn!(
            "{} of {} outage area(s) skipped as malformed",
            output.rejected.len(),
            snapshot.pse_map.len()
        );
    }

    let mut metadata = previous;
    metadata.last_updated = snapshot.last_updated;

    Prepared::Changed(Box::new(PendingWrite {
        body,
        output,
        metadata,
    }))
}

/// Writes the raw snapshot, the processed collection and the metadata, in
/// that order.
///
/// # Errors
///
/// Returns [`ArchiveError`] on the first failed write. Earlier writes are
/// not rolled back.
pub fn persist(archive: &Archive, pending: PendingWrite) -> Result<PersistedRun, ArchiveError> {
    let PendingWrite {
        body,
        output,
        metadata,
    } = pending;
    let last_updated = metadata.last_updated.as_str();

    let source_path = archive.write_source(last_updated, &body)?;
    let processed_path = archive.write_processed(last_updated, &output.collection)?;
    archive.save_metadata(&metadata)?;

    Ok(PersistedRun {
        last_updated: metadata.last_updated,
        source_path,
        processed_path,
        feature_count: output.collection.features.len(),
        rejected_count: output.rejected.len(),
    })
}

/// Runs one full ingestion pass.
///
/// # Errors
///
/// Returns [`RunError::Archive`] if the metadata cannot be loaded or an
/// artifact cannot be written, and [`RunError::Fetch`] if the snapshot
/// cannot be retrieved.
pub async fn run(source: &dyn OutageSource, archive: &Archive) -> Result<RunOutcome, RunError> {
    let previous = archive.load_metadata()?;
    log::debug!("Previous snapshot: {}", previous.last_updated);

    let fetched = source.fetch().await?;

    match prepare(previous, fetched) {
        Prepared::Unchanged { last_updated } => Ok(RunOutcome::Unchanged { last_updated }),
        Prepared::Changed(pending) => Ok(RunOutcome::Persisted(persist(archive, *pending)?)),
    }
}
