#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! On-disk state for outage ingestion.
//!
//! An [`Archive`] is rooted at a data directory and owns the three
//! artifacts a run touches: the run metadata file, the raw snapshot archive
//! and the processed `GeoJSON` archive. Writes are plain overwrites with no
//! locking; a single writer is assumed.
//!
//! # Environment Variables
//!
//! | Variable | Required | Description |
//! |---|---|---|
//! | `PSE_OUTAGES_DATA_DIR` | No | Data directory (defaults to `<project root>/data`) |

pub mod metadata;
pub mod paths;

use std::path::{Path, PathBuf};

use geojson::FeatureCollection;

/// Errors that can occur while reading or writing archive files.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// The metadata file has not been seeded.
    #[error("Metadata file not found: {}", path.display())]
    MetadataMissing {
        /// Expected metadata location.
        path: PathBuf,
    },

    /// A file could not be read or written.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// A file's contents were not valid JSON of the expected shape.
    #[error("Invalid JSON in {}: {source}", path.display())]
    InvalidJson {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },

    /// A value could not be serialized.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Handle to the data directory.
#[derive(Debug, Clone)]
pub struct Archive {
    data_dir: PathBuf,
}

impl Archive {
    /// Creates an archive rooted at `data_dir`.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Creates an archive rooted at [`paths::data_dir`].
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(paths::data_dir())
    }

    /// Returns the root data directory.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns the metadata file path.
    #[must_use]
    pub fn metadata_path(&self) -> PathBuf {
        paths::metadata_path(&self.data_dir)
    }

    /// Returns the raw snapshot path for a timestamp.
    #[must_use]
    pub fn source_path(&self, last_updated: &str) -> PathBuf {
        paths::source_dir(&self.data_dir).join(format!("{}.json", paths::file_stem(last_updated)))
    }

    /// Returns the processed collection path for a timestamp.
    #[must_use]
    pub fn processed_path(&self, last_updated: &str) -> PathBuf {
        paths::processed_dir(&self.data_dir)
            .join(format!("{}.geojson", paths::file_stem(last_updated)))
    }

    /// Writes the upstream response body verbatim to the raw archive.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Io`] if the directory or file cannot be
    /// written.
    pub fn write_source(&self, last_updated: &str, body: &str) -> Result<PathBuf, ArchiveError> {
        let path = self.source_path(last_updated);
        write_file(&path, body)?;
        log::info!("Wrote raw snapshot to {}", path.display());
        Ok(path)
    }

    /// Writes a feature collection as pretty-printed `GeoJSON` to the
    /// processed archive.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError`] if serialization or the write fails.
    pub fn write_processed(
        &self,
        last_updated: &str,
        collection: &FeatureCollection,
    ) -> Result<PathBuf, ArchiveError> {
        let path = self.processed_path(last_updated);
        let json = serde_json::to_string_pretty(collection)?;
        write_file(&path, &json)?;
        log::info!(
            "Wrote {} feature(s) to {}",
            collection.features.len(),
            path.display()
        );
        Ok(path)
    }
}

/// Creates the parent directory if needed and overwrites `path`.
fn write_file(path: &Path, contents: &str) -> Result<(), ArchiveError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ArchiveError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, contents).map_err(|source| ArchiveError::Io {
        path: path.to_path_buf(),
        source,
    })
}
