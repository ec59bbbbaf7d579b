//! GeoJSON reading and writing for features exchanged with the service.

use crate::model::{Feature, FeatureId, Geometry};
use anyhow::{Context as _, bail};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

#[derive(Debug, Deserialize)]
struct RawFeature {
    #[serde(default)]
    id: Option<FeatureId>,
    #[serde(default)]
    geometry: Option<Value>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
}

#[derive(Debug, Serialize)]
struct OutFeature<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a FeatureId>,
    geometry: &'a Geometry,
    properties: Option<&'a Map<String, Value>>,
}

/// Decode a FeatureCollection or a single Feature.
///
/// Features without a supported geometry are skipped with a warning; a
/// document that is not GeoJSON at all is an error.
pub fn read_features(text: &str) -> anyhow::Result<Vec<Feature>> {
    let doc: Value = serde_json::from_str(text).context("Response body is not JSON")?;
    let kind = doc.get("type").and_then(Value::as_str).unwrap_or_default();
    let raw: Vec<RawFeature> = match kind {
        "FeatureCollection" => {
            let features = doc
                .get("features")
                .cloned()
                .context("FeatureCollection without a `features` member")?;
            serde_json::from_value(features).context("Malformed `features` array")?
        }
        "Feature" => vec![serde_json::from_value(doc).context("Malformed Feature")?],
        other => bail!("Expected a FeatureCollection or Feature, got type {other:?}"),
    };
    Ok(raw.into_iter().filter_map(into_feature).collect())
}

fn into_feature(raw: RawFeature) -> Option<Feature> {
    let Some(geometry_value) = raw.geometry.filter(|g| !g.is_null()) else {
        warn!(id = ?raw.id, "skipping feature without geometry");
        return None;
    };
    match serde_json::from_value::<Geometry>(geometry_value) {
        Ok(geometry) => Some(Feature {
            id: raw.id,
            geometry,
            properties: raw.properties.unwrap_or_default(),
        }),
        Err(err) => {
            warn!(id = ?raw.id, %err, "skipping feature with unsupported geometry");
            None
        }
    }
}

/// Encode one feature as a GeoJSON Feature object.
pub fn write_feature(feature: &Feature) -> String {
    let out = OutFeature {
        kind: "Feature",
        id: feature.id.as_ref(),
        geometry: &feature.geometry,
        properties: (!feature.properties.is_empty()).then_some(&feature.properties),
    };
    // Every field is plain data with string keys, so encoding cannot fail.
    serde_json::to_string(&out).unwrap_or_default()
}
