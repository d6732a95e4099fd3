//! Canonical file paths for the outage data directory.
//!
//! Layout under the data directory:
//!
//! | Path | Contents |
//! |---|---|
//! | `metadata.json` | `{ "last_updated": ... }` of the last ingested snapshot |
//! | `source/power_outages_<slug>.json` | Raw upstream documents |
//! | `processed/power_outages_<slug>.geojson` | Derived feature collections |

use std::path::{Path, PathBuf};

use pse_outages_transform::slug::slugify;

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "PSE_OUTAGES_DATA_DIR";

/// Filename prefix shared by both archives.
const FILE_PREFIX: &str = "power_outages";

/// Returns the workspace root directory.
///
/// Resolved at compile time from `CARGO_MANIFEST_DIR`.
///
/// # Panics
///
/// Panics if the project root cannot be resolved.
#[must_use]
pub fn project_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .expect("Failed to find project root from CARGO_MANIFEST_DIR")
        .to_path_buf()
}

/// Returns the data directory: `PSE_OUTAGES_DATA_DIR` if set, otherwise
/// the project root's `data/` directory.
#[must_use]
pub fn data_dir() -> PathBuf {
    std::env::var(DATA_DIR_ENV)
        .ok()
        .filter(|dir| !dir.trim().is_empty())
        .map_or_else(|| project_root().join("data"), PathBuf::from)
}

/// Returns the `source/` directory under `data_dir`.
#[must_use]
pub fn source_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("source")
}

/// Returns the `processed/` directory under `data_dir`.
#[must_use]
pub fn processed_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("processed")
}

/// Returns the metadata file path under `data_dir`.
#[must_use]
pub fn metadata_path(data_dir: &Path) -> PathBuf {
    data_dir.join("metadata.json")
}

/// Returns the archive file stem for a snapshot timestamp
/// (e.g., `power_outages_2024-01-01t00-00z`).
#[must_use]
pub fn file_stem(last_updated: &str) -> String {
    format!("{FILE_PREFIX}_{}", slugify(last_updated))
}
