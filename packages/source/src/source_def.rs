//! Upstream source definition, loaded from embedded TOML.
//!
//! The definition is baked into the binary via [`include_str!`]. The URL
//! can be overridden at runtime with the `PSE_OUTAGES_URL` environment
//! variable (useful for pointing a run at a local fixture server).

use serde::Deserialize;

use crate::SourceError;

/// Environment variable that overrides [`SourceDefinition::url`].
pub const URL_ENV: &str = "PSE_OUTAGES_URL";

/// Embedded definition for the Puget Sound Energy outage map.
const PSE_TOML: &str = include_str!("../sources/pse.toml");

/// Everything needed to reach an outage-map endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceDefinition {
    /// Unique identifier (e.g., `"pse"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Fixed GET endpoint returning the snapshot document.
    pub url: String,
    /// `User-Agent` header sent with the request.
    pub user_agent: String,
}

/// Parses a source definition from TOML text.
///
/// # Errors
///
/// Returns [`SourceError::Definition`] if the TOML is malformed or missing
/// a field.
pub fn parse_source_toml(toml_str: &str) -> Result<SourceDefinition, SourceError> {
    Ok(toml::de::from_str(toml_str)?)
}

/// Returns the PSE source definition, applying the `PSE_OUTAGES_URL`
/// override when set.
///
/// # Errors
///
/// Returns [`SourceError::Definition`] if the embedded TOML is invalid.
pub fn pse() -> Result<SourceDefinition, SourceError> {
    let mut def = parse_source_toml(PSE_TOML)?;
    if let Ok(url) = std::env::var(URL_ENV)
        && !url.trim().is_empty()
    {
        log::debug!("{}: using {URL_ENV} override {url}", def.id);
        def.url = url;
    }
    Ok(def)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_embedded_pse_toml() {
        let def = parse_source_toml(PSE_TOML).unwrap();
        assert_eq!(def.id, "pse");
        assert_eq!(
            def.url,
            "https://www.pse.com/api/sitecore/OutageMap/AnonymoussMapListView"
        );
        assert!(!def.user_agent.is_empty());
    }

    #[test]
    fn rejects_incomplete_definition() {
        let err = parse_source_toml(r#"id = "pse""#).unwrap_err();
        assert!(matches!(err, SourceError::Definition(_)));
    }
}
