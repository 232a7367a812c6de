//! Lecture des trails (GeoJSON NPS)

use geojson::{Feature, Value};
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use super::{feature_label, parse_feature_collection, to_line_string, value_kind};
use crate::types::{ParseResult, TrailRecord};
use crate::TrailGeoError;

/// Propriété portant l'identifiant des trails NPS
pub const DEFAULT_ID_PROPERTY: &str = "GEOMETRYID";

/// Parse une FeatureCollection de trails.
///
/// Les features sans identifiant, sans géométrie ou de géométrie non linéaire
/// sont ignorées et rapportées dans `errors`. Seul un document illisible est fatal.
pub fn parse(content: &str, id_property: &str) -> Result<ParseResult<TrailRecord>, TrailGeoError> {
    let collection = parse_feature_collection(content)?;
    let mut result = ParseResult::default();

    for (index, feature) in collection.features.iter().enumerate() {
        match parse_feature(index, feature, id_property) {
            Ok(record) => result.items.push(record),
            Err(e) => {
                warn!(error = %e, "Skipping trail feature");
                result.errors.push(e);
            }
        }
    }

    debug!(
        trails = result.items.len(),
        skipped = result.errors.len(),
        "Parsed trail collection"
    );

    Ok(result)
}

fn parse_feature(
    index: usize,
    feature: &Feature,
    id_property: &str,
) -> Result<TrailRecord, TrailGeoError> {
    let label = feature_label(index, feature);

    let id = feature
        .properties
        .as_ref()
        .and_then(|props| props.get(id_property))
        .and_then(identifier_text)
        .ok_or_else(|| TrailGeoError::MissingIdentifier {
            feature: label.clone(),
            property: id_property.to_string(),
        })?;

    let geometry = feature
        .geometry
        .as_ref()
        .ok_or_else(|| TrailGeoError::MissingGeometry(label.clone()))?;

    let paths = match &geometry.value {
        Value::LineString(positions) => vec![to_line_string(positions, &label)?],
        Value::MultiLineString(parts) => parts
            .iter()
            .map(|positions| to_line_string(positions, &label))
            .collect::<Result<Vec<_>, _>>()?,
        other => {
            return Err(TrailGeoError::unsupported_geometry(
                label,
                value_kind(other),
            ))
        }
    };

    Ok(TrailRecord { id, paths })
}

/// Texte de l'identifiant : chaîne telle quelle, nombre en texte JSON, null absent
fn identifier_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
