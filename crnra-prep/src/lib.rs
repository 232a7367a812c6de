//! # crnra-prep
//!
//! Préparation des données spatiales du tableau de bord #CRNRAgoal.
//!
//! ## Features
//!
//! - Téléchargement des trails NPS (unit CHAT) et de la Chattahoochee River
//! - Fusion de la rivière en une seule géométrie MultiLineString
//! - Distance Haversine de chaque trail, export CSV `GEOMETRYID,distance_mi`
//! - Rapport d'exécution (console, JSON)
//!
//! ## Usage CLI
//!
//! ```bash
//! # Tout le traitement (téléchargement, rivière, distances)
//! crnra-prep --out-dir ./data
//!
//! # Une seule étape, sur des fichiers déjà présents
//! crnra-prep merge-river --input rivers.geojson --output rivers_merged.geojson
//! crnra-prep trail-distances --input trails.geojson --output distances.csv --keep-empty
//! ```

pub mod config;
pub mod export;
pub mod fetch;
pub mod report;
pub mod stages;

pub use config::Config;
pub use fetch::FetchOutcome;
pub use report::{RunReport, RunStatus};
