//! Lecture des FeatureCollections GeoJSON (trails, rivière)

pub mod river;
pub mod trails;

use geo::{Coord, LineString};
use geojson::{Feature, FeatureCollection, GeoJson, Value};

use crate::TrailGeoError;

/// Parse un document GeoJSON qui doit être une FeatureCollection
pub fn parse_feature_collection(content: &str) -> Result<FeatureCollection, TrailGeoError> {
    match content.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => Ok(collection),
        GeoJson::Feature(_) => Err(TrailGeoError::NotAFeatureCollection("Feature".into())),
        GeoJson::Geometry(geometry) => Err(TrailGeoError::NotAFeatureCollection(
            value_kind(&geometry.value).into(),
        )),
    }
}

/// Libellé d'une feature pour les messages : son `id` si présent, sinon son rang
pub(crate) fn feature_label(index: usize, feature: &Feature) -> String {
    match &feature.id {
        Some(geojson::feature::Id::String(s)) => s.clone(),
        Some(geojson::feature::Id::Number(n)) => n.to_string(),
        None => format!("#{}", index),
    }
}

/// Nom GeoJSON du type de géométrie
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}

/// Convertit une position GeoJSON `[x, y, (z)]` en coordonnée 2D
pub(crate) fn to_coord(position: &[f64], feature: &str) -> Result<Coord<f64>, TrailGeoError> {
    match position {
        [x, y, ..] if x.is_finite() && y.is_finite() => Ok(Coord { x: *x, y: *y }),
        [_, _, ..] => Err(TrailGeoError::invalid_coordinate(
            feature,
            "non-finite value",
        )),
        _ => Err(TrailGeoError::invalid_coordinate(
            feature,
            format!("expected at least 2 values, found {}", position.len()),
        )),
    }
}

/// Convertit une suite de positions en LineString, ordre conservé
pub(crate) fn to_line_string(
    positions: &[Vec<f64>],
    feature: &str,
) -> Result<LineString<f64>, TrailGeoError> {
    positions
        .iter()
        .map(|p| to_coord(p, feature))
        .collect::<Result<Vec<_>, _>>()
        .map(LineString::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_feature_collection() {
        let fc = parse_feature_collection(r#"{"type":"FeatureCollection","features":[]}"#).unwrap();
        assert!(fc.features.is_empty());
    }

    #[test]
    fn test_rejects_single_geometry() {
        let err = parse_feature_collection(r#"{"type":"Point","coordinates":[1.0,2.0]}"#)
            .unwrap_err();
        assert!(matches!(err, TrailGeoError::NotAFeatureCollection(ref k) if k == "Point"));
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(parse_feature_collection("not json").is_err());
    }

    #[test]
    fn test_to_coord() {
        assert_eq!(
            to_coord(&[1.0, 2.0, 300.0], "f").unwrap(),
            Coord { x: 1.0, y: 2.0 }
        );
        assert!(to_coord(&[1.0], "f").is_err());
    }
}
