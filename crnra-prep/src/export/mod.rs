//! Modules d'export (GeoJSON, CSV)

pub mod csv;
pub mod geojson;

pub use self::csv::{export_distances, export_segments};
pub use self::geojson::export_merged_river;
