//! Système de coordonnées des trails
//!
//! Les distances sont calculées en degrés WGS84 (EPSG:4326). Un export en
//! Web Mercator (EPSG:3857) est ramené en degrés avant le calcul.

use geo::{Coord, MapCoordsInPlace};

use crate::types::TrailRecord;
use crate::TrailGeoError;

/// Demi-grand axe WGS84, rayon de la sphère Web Mercator (mètres)
pub const WEB_MERCATOR_RADIUS_M: f64 = 6378137.0;

/// CRS source supportés
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceCrs {
    /// WGS84 en degrés
    #[default]
    Wgs84,
    /// Web Mercator / Pseudo-Mercator en mètres
    WebMercator,
}

impl SourceCrs {
    /// Résout un code EPSG
    pub fn from_epsg(epsg: u32) -> Result<Self, TrailGeoError> {
        match epsg {
            4326 => Ok(Self::Wgs84),
            3857 | 900913 => Ok(Self::WebMercator),
            other => Err(TrailGeoError::UnsupportedCrs(other)),
        }
    }

    pub fn epsg(self) -> u32 {
        match self {
            Self::Wgs84 => 4326,
            Self::WebMercator => 3857,
        }
    }

    /// Convertit une coordonnée vers (lon, lat) en degrés
    pub fn to_wgs84(self, coord: Coord<f64>) -> Coord<f64> {
        match self {
            Self::Wgs84 => coord,
            Self::WebMercator => web_mercator_to_wgs84(coord),
        }
    }
}

/// Web Mercator (mètres) vers WGS84 (degrés)
pub fn web_mercator_to_wgs84(coord: Coord<f64>) -> Coord<f64> {
    let lon = coord.x / WEB_MERCATOR_RADIUS_M;
    let lat = 2.0 * (coord.y / WEB_MERCATOR_RADIUS_M).exp().atan() - std::f64::consts::FRAC_PI_2;

    Coord {
        x: lon.to_degrees(),
        y: lat.to_degrees(),
    }
}

/// Ramène tous les tracés en degrés WGS84
pub fn reproject_in_place(records: &mut [TrailRecord], crs: SourceCrs) {
    if crs == SourceCrs::Wgs84 {
        return;
    }
    for record in records.iter_mut() {
        for path in record.paths.iter_mut() {
            path.map_coords_in_place(|c| crs.to_wgs84(c));
        }
    }
}
