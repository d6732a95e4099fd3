#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Record types for the PSE outage-map API and the persisted run metadata.
//!
//! The upstream document uses `PascalCase` keys (with a few quirks such as
//! `CustomerAfftectedCount` and a lowercase `planned_outage`). These types
//! mirror that shape at the deserialization boundary.
//!
//! Only the document envelope (`LastUpdated`, `Common`, the `PseMap` list)
//! is strict. Everything inside an outage area is read through the
//! [`lenient`] helpers, so a missing record or a value of the wrong type
//! shows up as `None` and the transformer can reject that one area without
//! failing the whole snapshot.

pub mod lenient;

use serde::{Deserialize, Serialize};

/// One upstream outage-map document at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Snapshot {
    /// Provider-formatted timestamp of the snapshot. Compared verbatim
    /// against [`RunMetadata::last_updated`].
    pub last_updated: String,
    /// Global outage summary.
    pub common: Common,
    /// Outage areas in provider order. An entry that is not an object
    /// becomes an empty [`OutageArea`].
    #[serde(default, deserialize_with = "lenient::list")]
    pub pse_map: Vec<OutageArea>,
}

/// The snapshot's global summary block. Counts are passed through as raw
/// JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Common {
    /// Total customers affected. The upstream key is misspelled.
    #[serde(rename = "CustomerAfftectedCount", default)]
    pub customers_affected: serde_json::Value,
    /// Number of distinct outages.
    #[serde(rename = "OutageCount", default)]
    pub outage_count: serde_json::Value,
}

/// One polygon region with its point of interest and attributes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OutageArea {
    /// Ring vertices in provider order. Not closed or validated. `None`
    /// when absent, `null`, or not a list.
    #[serde(default, deserialize_with = "lenient::elements")]
    pub polygon: Option<Vec<Vertex>>,
    /// Point of interest and display attributes for this area.
    #[serde(default, deserialize_with = "lenient::option")]
    pub data_provider: Option<DataProvider>,
}

/// A single polygon vertex. A vertex that is not an object has neither
/// coordinate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Vertex {
    /// Longitude, as text or a number.
    #[serde(default)]
    pub longitude: Option<CoordinateValue>,
    /// Latitude, as text or a number.
    #[serde(default)]
    pub latitude: Option<CoordinateValue>,
}

/// The `DataProvider` block attached to every outage area.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DataProvider {
    /// Marker location and identity of the outage.
    #[serde(default, deserialize_with = "lenient::option")]
    pub point_of_interest: Option<PointOfInterest>,
    /// Display attributes in provider order. `None` when absent, `null`, or
    /// not a list.
    #[serde(default, deserialize_with = "lenient::elements")]
    pub attributes: Option<Vec<Attribute>>,
}

/// Marker record for an outage area.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PointOfInterest {
    /// Outage identifier. Passed through untouched (string or number).
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    /// Human-readable outage title. Passed through untouched.
    #[serde(default)]
    pub title: Option<serde_json::Value>,
    /// Marker longitude.
    #[serde(default)]
    pub longitude: Option<CoordinateValue>,
    /// Marker latitude.
    #[serde(default)]
    pub latitude: Option<CoordinateValue>,
    /// Whether the outage was scheduled. Lowercase upstream.
    #[serde(
        rename = "planned_outage",
        default,
        deserialize_with = "lenient::option"
    )]
    pub planned_outage: Option<bool>,
}

/// A named display attribute of an outage area.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Attribute {
    /// Display name (e.g. `"Cause"`). Slugified into a property key.
    #[serde(default, deserialize_with = "lenient::option")]
    pub name: Option<String>,
    /// Display value, passed through as raw JSON.
    #[serde(default)]
    pub value: serde_json::Value,
    /// Whether the provider hides this attribute in its own UI. `None` when
    /// absent or not a boolean.
    #[serde(default, deserialize_with = "lenient::option")]
    pub no_display: Option<bool>,
}

/// A coordinate that the provider may send either as a JSON number or as
/// numeric text. Anything else is kept as [`CoordinateValue::Other`] and
/// never coerces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CoordinateValue {
    /// A JSON number.
    Number(f64),
    /// Numeric text such as `"-122.1"`.
    Text(String),
    /// Any other JSON value (boolean, object, list).
    Other(serde_json::Value),
}

impl CoordinateValue {
    /// Coerces the value to a finite `f64`.
    ///
    /// Text is trimmed before parsing. Returns `None` for empty or
    /// non-numeric text, non-finite numbers, and [`Self::Other`].
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
            Self::Other(_) => return None,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for CoordinateValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for CoordinateValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Collection-level properties derived from a snapshot's summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotSummary {
    /// Copied from `Common.CustomerAfftectedCount`.
    pub customers_affected: serde_json::Value,
    /// Copied from `Common.OutageCount`.
    pub outage_count: serde_json::Value,
    /// Copied from `LastUpdated`.
    pub last_updated: String,
}

impl From<&Snapshot> for SnapshotSummary {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            customers_affected: snapshot.common.customers_affected.clone(),
            outage_count: snapshot.common.outage_count.clone(),
            last_updated: snapshot.last_updated.clone(),
        }
    }
}

/// The only state carried between runs: the timestamp of the most recently
/// ingested snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMetadata {
    /// `LastUpdated` of the last persisted snapshot.
    pub last_updated: String,
}

impl RunMetadata {
    /// Returns `true` if `snapshot` carries a different timestamp than the
    /// last ingested one.
    #[must_use]
    pub fn is_stale_for(&self, snapshot: &Snapshot) -> bool {
        self.last_updated != snapshot.last_updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SNAPSHOT_JSON: &str = r#"{
        "LastUpdated": "2024-01-01T00:00Z",
        "Common": { "CustomerAfftectedCount": 5, "OutageCount": 1 },
        "PseMap": [{
            "Polygon": [
                { "Longitude": "-122.1", "Latitude": "47.6" },
                { "Longitude": -122.2, "Latitude": 47.7 }
            ],
            "DataProvider": {
                "PointOfInterest": {
                    "Id": "a1",
                    "Title": "Main St",
                    "Longitude": -122.15,
                    "Latitude": 47.65,
                    "planned_outage": false
                },
                "Attributes": [
                    { "Name": "Cause", "Value": "Wind", "NoDisplay": false }
                ]
            }
        }]
    }"#;

    fn area(value: serde_json::Value) -> OutageArea {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn deserializes_upstream_document() {
        let snapshot: Snapshot = serde_json::from_str(SNAPSHOT_JSON).unwrap();
        assert_eq!(snapshot.last_updated, "2024-01-01T00:00Z");
        assert_eq!(snapshot.common.customers_affected, json!(5));
        assert_eq!(snapshot.common.outage_count, json!(1));
        assert_eq!(snapshot.pse_map.len(), 1);

        let area = &snapshot.pse_map[0];
        let polygon = area.polygon.as_ref().unwrap();
        assert_eq!(polygon.len(), 2);
        assert_eq!(polygon[0].longitude, Some(CoordinateValue::from("-122.1")));
        assert_eq!(polygon[1].latitude, Some(CoordinateValue::from(47.7)));

        let provider = area.data_provider.as_ref().unwrap();
        let poi = provider.point_of_interest.as_ref().unwrap();
        assert_eq!(poi.id, Some(json!("a1")));
        assert_eq!(poi.title, Some(json!("Main St")));
        assert_eq!(poi.planned_outage, Some(false));

        let attr = &provider.attributes.as_ref().unwrap()[0];
        assert_eq!(attr.name.as_deref(), Some("Cause"));
        assert_eq!(attr.value, json!("Wind"));
        assert_eq!(attr.no_display, Some(false));
    }

    #[test]
    fn missing_point_of_interest_fields_are_none() {
        let area = area(json!({
            "Polygon": [],
            "DataProvider": { "PointOfInterest": { "Id": 7 } }
        }));
        let provider = area.data_provider.unwrap();
        let poi = provider.point_of_interest.unwrap();
        assert_eq!(poi.id, Some(json!(7)));
        assert!(poi.title.is_none());
        assert!(poi.longitude.is_none());
        assert!(poi.planned_outage.is_none());
        assert!(provider.attributes.is_none());
    }

    #[test]
    fn missing_or_mistyped_records_are_none() {
        assert!(area(json!({ "Polygon": [] })).data_provider.is_none());
        assert!(area(json!({ "DataProvider": "n/a" })).data_provider.is_none());
        assert!(area(json!({ "Polygon": null })).polygon.is_none());
        assert!(area(json!({ "Polygon": "none" })).polygon.is_none());

        let provider = area(json!({
            "DataProvider": { "PointOfInterest": null, "Attributes": null }
        }))
        .data_provider
        .unwrap();
        assert!(provider.point_of_interest.is_none());
        assert!(provider.attributes.is_none());
    }

    #[test]
    fn mistyped_scalars_are_none() {
        let provider = area(json!({
            "DataProvider": {
                "PointOfInterest": { "Title": 42, "planned_outage": "no" },
                "Attributes": [
                    { "Name": null, "Value": "x", "NoDisplay": null },
                    "not an attribute"
                ]
            }
        }))
        .data_provider
        .unwrap();

        let poi = provider.point_of_interest.unwrap();
        assert_eq!(poi.title, Some(json!(42)));
        assert!(poi.planned_outage.is_none());

        let attributes = provider.attributes.unwrap();
        assert_eq!(attributes.len(), 2);
        assert!(attributes[0].name.is_none());
        assert!(attributes[0].no_display.is_none());
        assert!(attributes[1].name.is_none());
    }

    #[test]
    fn non_object_vertex_has_no_coordinates() {
        let polygon = area(json!({
            "Polygon": [
                { "Longitude": true, "Latitude": { "deg": 47 } },
                "-122.1,47.6"
            ]
        }))
        .polygon
        .unwrap();

        assert_eq!(polygon.len(), 2);
        assert_eq!(
            polygon[0].longitude,
            Some(CoordinateValue::Other(json!(true)))
        );
        assert!(polygon[0].latitude.as_ref().unwrap().as_f64().is_none());
        assert!(polygon[1].longitude.is_none());
        assert!(polygon[1].latitude.is_none());
    }

    #[test]
    fn non_object_area_becomes_empty() {
        let snapshot: Snapshot = serde_json::from_value(json!({
            "LastUpdated": "t",
            "Common": {},
            "PseMap": [null, 3]
        }))
        .unwrap();
        assert_eq!(snapshot.pse_map.len(), 2);
        assert!(snapshot.pse_map[0].data_provider.is_none());
        assert!(snapshot.pse_map[1].polygon.is_none());
    }

    #[test]
    fn document_envelope_stays_strict() {
        let not_a_list = json!({ "LastUpdated": "t", "Common": {}, "PseMap": {} });
        assert!(serde_json::from_value::<Snapshot>(not_a_list).is_err());

        let no_common = json!({ "LastUpdated": "t", "PseMap": [] });
        assert!(serde_json::from_value::<Snapshot>(no_common).is_err());
    }

    #[test]
    fn coerces_text_coordinates() {
        assert_eq!(CoordinateValue::from(" 47.6 ").as_f64(), Some(47.6));
        assert_eq!(CoordinateValue::from("-122.1").as_f64(), Some(-122.1));
        assert_eq!(CoordinateValue::from(12.5).as_f64(), Some(12.5));
    }

    #[test]
    fn rejects_non_numeric_coordinates() {
        assert!(CoordinateValue::from("").as_f64().is_none());
        assert!(CoordinateValue::from("north").as_f64().is_none());
        assert!(CoordinateValue::from("NaN").as_f64().is_none());
        assert!(CoordinateValue::from(f64::INFINITY).as_f64().is_none());
        assert!(CoordinateValue::Other(json!(false)).as_f64().is_none());
    }

    #[test]
    fn summary_copies_common_block() {
        let snapshot: Snapshot = serde_json::from_str(SNAPSHOT_JSON).unwrap();
        let summary = SnapshotSummary::from(&snapshot);
        assert_eq!(
            summary,
            SnapshotSummary {
                customers_affected: json!(5),
                outage_count: json!(1),
                last_updated: "2024-01-01T00:00Z".to_string(),
            }
        );
    }

    #[test]
    fn summary_passes_through_non_integer_counts() {
        let snapshot: Snapshot = serde_json::from_value(json!({
            "LastUpdated": "t",
            "Common": { "CustomerAfftectedCount": 5.0, "OutageCount": null },
            "PseMap": []
        }))
        .unwrap();
        let summary = SnapshotSummary::from(&snapshot);
        assert_eq!(summary.customers_affected, json!(5.0));
        assert_eq!(summary.outage_count, serde_json::Value::Null);
    }

    #[test]
    fn metadata_detects_changed_timestamp() {
        let snapshot: Snapshot = serde_json::from_str(SNAPSHOT_JSON).unwrap();
        let old = RunMetadata {
            last_updated: "2023-12-31T00:00Z".to_string(),
        };
        let same = RunMetadata {
            last_updated: "2024-01-01T00:00Z".to_string(),
        };
        assert!(old.is_stale_for(&snapshot));
        assert!(!same.is_stale_for(&snapshot));
    }

    #[test]
    fn metadata_uses_snake_case_key() {
        let metadata: RunMetadata =
            serde_json::from_str(r#"{ "last_updated": "2023-12-31T00:00Z" }"#).unwrap();
        assert_eq!(metadata.last_updated, "2023-12-31T00:00Z");
        assert_eq!(
            serde_json::to_value(&metadata).unwrap(),
            json!({ "last_updated": "2023-12-31T00:00Z" })
        );
    }
}
