//! # trailgeo
//!
//! Préparation des données spatiales du tableau de bord #CRNRAgoal
//! (Chattahoochee River National Recreation Area).
//!
//! ## Features
//!
//! - Lecture des trails NPS et du réseau hydrographique en GeoJSON
//! - Aplatissement des MultiLineString imbriqués en une seule géométrie
//! - Distance grand cercle (Haversine) par segment, somme par GEOMETRYID
//! - Types `geo` pour l'interopérabilité avec l'écosystème Rust géospatial
//!
//! ## Usage
//!
//! ```rust,ignore
//! use trailgeo::{read_trails, trail_distances, DistanceOptions};
//! use std::path::Path;
//!
//! let trails = read_trails(Path::new("nps_trails_web_mercator.geojson"), "GEOMETRYID")?;
//! for row in trail_distances(&trails.items, DistanceOptions::default()) {
//!     println!("{}: {:.3} mi", row.id, row.distance_mi);
//! }
//! ```

pub mod distance;
pub mod error;
pub mod flatten;
pub mod haversine;
pub mod parser;
pub mod projection;
pub mod types;

pub use distance::{segments, trail_distances, DistanceOptions};
pub use error::TrailGeoError;
pub use flatten::{flatten_lines, merge_lines, LineNode};
pub use haversine::{haversine, EARTH_RADIUS_MI};
pub use parser::trails::DEFAULT_ID_PROPERTY;
pub use projection::SourceCrs;
pub use types::{ParseResult, Segment, TrailDistance, TrailRecord};

use std::path::Path;

use geo::MultiLineString;

/// Lit un fichier de trails GeoJSON.
///
/// # Arguments
///
/// * `path` - Fichier GeoJSON (FeatureCollection de LineString / MultiLineString)
/// * `id_property` - Propriété portant l'identifiant (`GEOMETRYID` pour les données NPS)
///
/// # Errors
///
/// Retourne `TrailGeoError` si le fichier est illisible ou n'est pas une FeatureCollection.
/// Les features inexploitables sont rapportées dans `ParseResult::errors`.
pub fn read_trails(path: &Path, id_property: &str) -> Result<ParseResult<TrailRecord>, TrailGeoError> {
    let content = std::fs::read_to_string(path)?;
    parser::trails::parse(&content, id_property)
}

/// Lit un fichier de rivière GeoJSON et fusionne toutes ses lignes en un MultiLineString.
///
/// # Errors
///
/// Retourne `TrailGeoError` si le fichier est illisible, n'est pas une FeatureCollection,
/// ou contient une géométrie non linéaire.
pub fn read_river_merged(path: &Path) -> Result<MultiLineString<f64>, TrailGeoError> {
    let content = std::fs::read_to_string(path)?;
    let nodes = parser::river::parse(&content)?;
    Ok(merge_lines(nodes))
}
