//! Distance grand cercle (formule de Haversine)
//!
//! <https://en.wikipedia.org/wiki/Haversine_formula>

use geo::Coord;

/// Rayon moyen de la Terre, en miles
pub const EARTH_RADIUS_MI: f64 = 3958.756;

/// Distance en miles entre une origine et une destination (degrés).
///
/// L'ordre des opérations est figé : les totaux publiés en dépendent au bit près.
pub fn haversine(o_lat: f64, o_lon: f64, d_lat: f64, d_lon: f64) -> f64 {
    let o_lat = o_lat.to_radians();
    let o_lon = o_lon.to_radians();
    let d_lat = d_lat.to_radians();
    let d_lon = d_lon.to_radians();

    let lat_diff = d_lat - o_lat;
    let lon_diff = d_lon - o_lon;

    let a = (lat_diff / 2.0).sin().powi(2)
        + o_lat.cos() * d_lat.cos() * (lon_diff / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_MI * c
}

/// Haversine sur des coordonnées GeoJSON (x = longitude, y = latitude)
#[inline]
pub fn haversine_coords(start: Coord<f64>, end: Coord<f64>) -> f64 {
    haversine(start.y, start.x, end.y, end.x)
}
