//! Lecture du réseau hydrographique (GeoJSON ARC)

use geojson::{Geometry, Value};
use tracing::{debug, warn};

use super::{feature_label, parse_feature_collection, to_line_string, value_kind};
use crate::flatten::LineNode;
use crate::TrailGeoError;

/// Parse une FeatureCollection de lignes en nœuds, dans l'ordre des features.
///
/// Contrairement aux trails, une géométrie non linéaire est fatale.
/// Les features sans géométrie sont ignorées.
pub fn parse(content: &str) -> Result<Vec<LineNode>, TrailGeoError> {
    let collection = parse_feature_collection(content)?;
    let mut nodes = Vec::with_capacity(collection.features.len());

    for (index, feature) in collection.features.iter().enumerate() {
        let label = feature_label(index, feature);
        match &feature.geometry {
            Some(geometry) => nodes.push(to_node(geometry, &label)?),
            None => warn!(feature = %label, "River feature without geometry, skipped"),
        }
    }

    debug!(features = nodes.len(), "Parsed river collection");
    Ok(nodes)
}

// serde_json limite déjà l'imbrication à 128 niveaux
fn to_node(geometry: &Geometry, label: &str) -> Result<LineNode, TrailGeoError> {
    match &geometry.value {
        Value::LineString(positions) => Ok(LineNode::Line(to_line_string(positions, label)?)),
        Value::MultiLineString(parts) => parts
            .iter()
            .map(|positions| to_line_string(positions, label).map(LineNode::Line))
            .collect::<Result<Vec<_>, _>>()
            .map(LineNode::Multi),
        Value::GeometryCollection(children) => children
            .iter()
            .map(|child| to_node(child, label))
            .collect::<Result<Vec<_>, _>>()
            .map(LineNode::Multi),
        other => Err(TrailGeoError::unsupported_geometry(label, value_kind(other))),
    }
}
