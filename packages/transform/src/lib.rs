#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Converts an outage-map [`Snapshot`] into a `GeoJSON` [`FeatureCollection`].
//!
//! Each outage area becomes one `Polygon` feature whose properties carry the
//! area's point of interest (as a nested `Point` feature), title, planned
//! flag, and one entry per display attribute keyed by the attribute's
//! [`slug`]. The snapshot summary is attached as the collection's top-level
//! `properties` foreign member.
//!
//! Areas with a bad vertex, a missing record or an incomplete point of
//! interest are skipped and reported in [`TransformOutput::rejected`]; the
//! remaining features keep their input order.

pub mod slug;

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Position};
use pse_outages_snapshot_models::{
    CoordinateValue, OutageArea, PointOfInterest, Snapshot, SnapshotSummary, Vertex,
};

use crate::slug::slugify;

/// Errors scoped to a single outage area.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// A polygon vertex could not be turned into a numeric coordinate, or
    /// the polygon has no vertices.
    #[error("Malformed geometry: {reason}")]
    MalformedGeometry {
        /// Description of the offending vertex.
        reason: String,
    },

    /// A required record or field is absent or of the wrong type.
    #[error("Missing field: {field}")]
    MissingField {
        /// Upstream field path (e.g. `"PointOfInterest.Title"`).
        field: &'static str,
    },

    /// The point-of-interest feature could not be serialized.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// An outage area that was left out of the collection.
#[derive(Debug)]
pub struct RejectedArea {
    /// Position of the area in the snapshot's `PseMap` list.
    pub index: usize,
    /// Why it was rejected.
    pub error: TransformError,
}

/// Result of converting one snapshot.
#[derive(Debug)]
pub struct TransformOutput {
    /// Collection-level properties.
    pub summary: SnapshotSummary,
    /// One feature per accepted outage area, in input order.
    pub collection: FeatureCollection,
    /// Areas skipped because of malformed data.
    pub rejected: Vec<RejectedArea>,
}

/// Converts a snapshot into a feature collection.
///
/// Pure: performs no I/O. Rejected areas are logged at `warn` level.
#[must_use]
pub fn transform(snapshot: &Snapshot) -> TransformOutput {
    let summary = SnapshotSummary::from(snapshot);

    let mut features = Vec::with_capacity(snapshot.pse_map.len());
    let mut rejected = Vec::new();

    for (index, area) in snapshot.pse_map.iter().enumerate() {
        match area_to_feature(area) {
            Ok(feature) => features.push(feature),
            Err(error) => {
                log::warn!("Skipping outage area {index}: {error}");
                rejected.push(RejectedArea { index, error });
            }
        }
    }

    let collection = FeatureCollection {
        bbox: None,
        features,
        foreign_members: Some(summary_foreign_members(&summary)),
    };

    TransformOutput {
        summary,
        collection,
        rejected,
    }
}

/// Converts one outage area into a `Polygon` feature.
///
/// Attribute keys are slugified names. When two attributes share a slug
/// the later one wins, including over the fixed `id`, `title`,
/// `point_of_interest` and `planned_outage` keys.
///
/// A missing or non-list `Attributes` is treated as no attributes, and a
/// missing or non-boolean `NoDisplay` as `false`.
///
/// # Errors
///
/// Returns [`TransformError::MissingField`] for a missing `DataProvider`,
/// an incomplete point of interest or an unnamed attribute, and
/// [`TransformError::MalformedGeometry`] for a missing or empty polygon or
/// a non-numeric vertex.
pub fn area_to_feature(area: &OutageArea) -> Result<Feature, TransformError> {
    let provider = area
        .data_provider
        .as_ref()
        .ok_or(TransformError::MissingField {
            field: "DataProvider",
        })?;
    let poi = provider
        .point_of_interest
        .as_ref()
        .ok_or(TransformError::MissingField {
            field: "DataProvider.PointOfInterest",
        })?;
    let mut properties = point_of_interest_properties(poi)?;

    for attribute in provider.attributes.iter().flatten() {
        let name = attribute
            .name
            .as_ref()
            .ok_or(TransformError::MissingField {
                field: "Attributes.Name",
            })?;
        let slug = slugify(name);
        let mut entry = JsonObject::new();
        entry.insert("id".to_string(), JsonValue::String(slug.clone()));
        entry.insert("name".to_string(), JsonValue::String(name.clone()));
        entry.insert("value".to_string(), attribute.value.clone());
        entry.insert(
            "no_display".to_string(),
            JsonValue::Bool(attribute.no_display.unwrap_or(false)),
        );
        properties.insert(slug, JsonValue::Object(entry));
    }

    let polygon = area
        .polygon
        .as_deref()
        .ok_or_else(|| TransformError::MalformedGeometry {
            reason: "polygon is missing or not a list".to_string(),
        })?;
    let ring = build_ring(polygon)?;

    Ok(Feature {
        bbox: None,
        geometry: Some(Geometry::new(geojson::Value::Polygon(vec![ring]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    })
}

/// Builds the fixed `id`, `point_of_interest`, `title` and
/// `planned_outage` properties.
fn point_of_interest_properties(poi: &PointOfInterest) -> Result<JsonObject, TransformError> {
    let id = poi
        .id
        .clone()
        .ok_or(TransformError::MissingField {
            field: "PointOfInterest.Id",
        })?;
    let title = poi
        .title
        .clone()
        .ok_or(TransformError::MissingField {
            field: "PointOfInterest.Title",
        })?;
    let longitude = poi
        .longitude
        .as_ref()
        .and_then(CoordinateValue::as_f64)
        .ok_or(TransformError::MissingField {
            field: "PointOfInterest.Longitude",
        })?;
    let latitude = poi
        .latitude
        .as_ref()
        .and_then(CoordinateValue::as_f64)
        .ok_or(TransformError::MissingField {
            field: "PointOfInterest.Latitude",
        })?;
    let planned_outage = poi.planned_outage.ok_or(TransformError::MissingField {
        field: "PointOfInterest.planned_outage",
    })?;

    let mut properties = JsonObject::new();
    properties.insert("id".to_string(), id);
    properties.insert(
        "point_of_interest".to_string(),
        serde_json::to_value(point_feature(longitude, latitude))?,
    );
    properties.insert("title".to_string(), title);
    properties.insert(
        "planned_outage".to_string(),
        JsonValue::Bool(planned_outage),
    );
    Ok(properties)
}

/// A bare `Point` feature with empty properties, longitude first.
fn point_feature(longitude: f64, latitude: f64) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(geojson::Value::Point(vec![
            longitude, latitude,
        ]))),
        id: None,
        properties: Some(JsonObject::new()),
        foreign_members: None,
    }
}

/// Maps every vertex to `[longitude, latitude]`. The ring is passed through
/// as-is: it is neither closed nor checked for winding.
fn build_ring(polygon: &[Vertex]) -> Result<Vec<Position>, TransformError> {
    if polygon.is_empty() {
        return Err(TransformError::MalformedGeometry {
            reason: "polygon has no vertices".to_string(),
        });
    }

    polygon
        .iter()
        .enumerate()
        .map(|(i, vertex)| {
            let longitude = coordinate(vertex.longitude.as_ref(), i, "longitude")?;
            let latitude = coordinate(vertex.latitude.as_ref(), i, "latitude")?;
            Ok(vec![longitude, latitude])
        })
        .collect()
}

fn coordinate(
    value: Option<&CoordinateValue>,
    vertex: usize,
    axis: &str,
) -> Result<f64, TransformError> {
    let Some(value) = value else {
        return Err(TransformError::MalformedGeometry {
            reason: format!("vertex {vertex} has no {axis}"),
        });
    };
    value
        .as_f64()
        .ok_or_else(|| TransformError::MalformedGeometry {
            reason: format!("vertex {vertex} {axis} {value:?} is not a number"),
        })
}

fn summary_foreign_members(summary: &SnapshotSummary) -> JsonObject {
    let mut properties = JsonObject::new();
    properties.insert(
        "customers_affected".to_string(),
        summary.customers_affected.clone(),
    );
    properties.insert(
        "outage_count".to_string(),
        summary.outage_count.clone(),
    );
    properties.insert(
        "last_updated".to_string(),
        JsonValue::String(summary.last_updated.clone()),
    );

    let mut members = JsonObject::new();
    members.insert("properties".to_string(), JsonValue::Object(properties));
    members
}
