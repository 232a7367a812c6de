//! Types d'erreurs pour le crate trailgeo

use thiserror::Error;

/// Erreurs pouvant survenir lors de la lecture des fichiers GeoJSON
#[derive(Debug, Error)]
pub enum TrailGeoError {
    /// Erreur d'I/O lors de la lecture du fichier
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON mal formé
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Document GeoJSON invalide
    #[error("Invalid GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),

    /// Le document n'est pas une FeatureCollection
    #[error("Expected a FeatureCollection, found {0}")]
    NotAFeatureCollection(String),

    /// Type de géométrie non géré
    #[error("Unsupported geometry for feature {feature}: {kind}")]
    UnsupportedGeometry { feature: String, kind: String },

    /// Coordonnée invalide (moins de deux composantes, NaN, ...)
    #[error("Invalid coordinate in feature {feature}: {reason}")]
    InvalidCoordinate { feature: String, reason: String },

    /// Identifiant de trail absent des propriétés
    #[error("Feature {feature} has no '{property}' property")]
    MissingIdentifier { feature: String, property: String },

    /// Géométrie absente
    #[error("Feature {0} has no geometry")]
    MissingGeometry(String),

    /// Système de coordonnées non supporté
    #[error("Unsupported CRS: EPSG:{0}")]
    UnsupportedCrs(u32),
}

impl TrailGeoError {
    /// Crée une erreur de géométrie non gérée
    pub fn unsupported_geometry(feature: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::UnsupportedGeometry {
            feature: feature.into(),
            kind: kind.into(),
        }
    }

    /// Crée une erreur de coordonnée invalide
    pub fn invalid_coordinate(feature: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidCoordinate {
            feature: feature.into(),
            reason: reason.into(),
        }
    }
}
