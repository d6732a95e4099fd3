#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Outage-map snapshot fetcher.
//!
//! Each upstream provider implements the [`OutageSource`] trait. The only
//! production implementation is [`http::HttpSource`], configured from the
//! TOML definition embedded in [`source_def`].

pub mod http;
pub mod source_def;

use async_trait::async_trait;
use pse_outages_snapshot_models::Snapshot;

/// Errors that can occur while fetching a snapshot.
///
/// Every variant is fatal to the run: nothing has been written yet when
/// one of these is returned.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed (transport error or non-2xx status).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not a valid outage-map document.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The embedded source definition could not be parsed.
    #[error("Invalid source definition: {0}")]
    Definition(#[from] toml::de::Error),
}

/// A fetched snapshot: the exact upstream bytes plus the typed view.
#[derive(Debug, Clone)]
pub struct FetchedSnapshot {
    /// Response body exactly as received. Archived verbatim.
    pub body: String,
    /// Parsed document.
    pub snapshot: Snapshot,
}

impl FetchedSnapshot {
    /// Parses a raw response body, keeping the original text.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Json`] if the body is not a valid outage-map
    /// document.
    pub fn parse(body: String) -> Result<Self, SourceError> {
        let snapshot = serde_json::from_str(&body)?;
        Ok(Self { body, snapshot })
    }
}

/// Trait that all outage-map sources must implement.
#[async_trait]
pub trait OutageSource: Send + Sync {
    /// Returns a unique identifier for this source (e.g., `"pse"`).
    fn id(&self) -> &str;

    /// Returns the human-readable name of this source.
    fn name(&self) -> &str;

    /// Retrieves the current snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] on network failure, a non-2xx status, or a
    /// malformed document.
    async fn fetch(&self) -> Result<FetchedSnapshot, SourceError>;
}
