//! Persistent run metadata.
//!
//! The metadata file is expected to exist before the first run (seeded out
//! of band with the timestamp to compare against). A missing file is an
//! error, not an implicit "never ingested" state.

use pse_outages_snapshot_models::RunMetadata;

use crate::{Archive, ArchiveError, write_file};

impl Archive {
    /// Reads the run metadata.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::MetadataMissing`] if the file does not exist,
    /// [`ArchiveError::Io`] if it cannot be read, and
    /// [`ArchiveError::InvalidJson`] if it is not `{ "last_updated": ... }`.
    pub fn load_metadata(&self) -> Result<RunMetadata, ArchiveError> {
        let path = self.metadata_path();
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ArchiveError::MetadataMissing { path });
            }
            Err(source) => return Err(ArchiveError::Io { path, source }),
        };

        serde_json::from_str(&contents).map_err(|source| ArchiveError::InvalidJson { path, source })
    }

    /// Overwrites the run metadata.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError`] if serialization or the write fails.
    pub fn save_metadata(&self, metadata: &RunMetadata) -> Result<(), ArchiveError> {
        let path = self.metadata_path();
        let json = serde_json::to_string_pretty(metadata)?;
        write_file(&path, &json)?;
        log::info!(
            "Updated {} to last_updated={}",
            path.display(),
            metadata.last_updated
        );
        Ok(())
    }
}
