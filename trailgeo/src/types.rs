//! Types de données pour le crate trailgeo

use geo::{Coord, LineString};

use crate::haversine::haversine_coords;
use crate::TrailGeoError;

/// Résultat de lecture d'une collection : éléments valides + erreurs non fatales
#[derive(Debug)]
pub struct ParseResult<T> {
    /// Éléments extraits, dans l'ordre du fichier
    pub items: Vec<T>,

    /// Features ignorées (identifiant absent, géométrie non gérée, ...)
    pub errors: Vec<TrailGeoError>,
}

impl<T> Default for ParseResult<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            errors: Vec::new(),
        }
    }
}

/// Un trail : identifiant GEOMETRYID et ses tracés (lon, lat)
#[derive(Debug, Clone, PartialEq)]
pub struct TrailRecord {
    /// Identifiant opaque (chaîne telle quelle, nombre en texte JSON)
    pub id: String,

    /// Tracés ordonnés. Un LineString donne un tracé, un MultiLineString un par partie.
    pub paths: Vec<LineString<f64>>,
}

impl TrailRecord {
    /// Crée un trail à un seul tracé depuis des paires (lon, lat)
    pub fn from_lon_lat(id: impl Into<String>, coords: &[(f64, f64)]) -> Self {
        Self {
            id: id.into(),
            paths: vec![LineString::from(coords.to_vec())],
        }
    }

    /// Nombre total de points
    pub fn point_count(&self) -> usize {
        self.paths.iter().map(|p| p.0.len()).sum()
    }

    /// Segments du trail : paires consécutives à l'intérieur de chaque tracé.
    ///
    /// Un tracé de N points produit N-1 segments, jamais de segment entre deux tracés.
    pub fn segments(&self) -> impl Iterator<Item = Segment<'_>> + '_ {
        self.paths.iter().flat_map(move |path| {
            path.lines().map(move |line| Segment {
                id: &self.id,
                start: line.start,
                end: line.end,
                distance_mi: haversine_coords(line.start, line.end),
            })
        })
    }
}

/// Paire de points consécutifs d'un même tracé
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment<'a> {
    /// GEOMETRYID du trail propriétaire
    pub id: &'a str,

    /// Origine (x = longitude, y = latitude)
    pub start: Coord<f64>,

    /// Destination
    pub end: Coord<f64>,

    /// Distance grand cercle en miles
    pub distance_mi: f64,
}

/// Longueur totale d'un trail
#[derive(Debug, Clone, PartialEq)]
pub struct TrailDistance {
    /// GEOMETRYID
    pub id: String,

    /// Somme des segments, en miles
    pub distance_mi: f64,
}
