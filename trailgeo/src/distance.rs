//! Longueur des trails : segments consécutifs, Haversine, somme par GEOMETRYID

use std::collections::BTreeMap;

use tracing::debug;

use crate::types::{Segment, TrailDistance, TrailRecord};

/// Options d'agrégation
#[derive(Debug, Clone, Copy, Default)]
pub struct DistanceOptions {
    /// Émettre les trails sans segment (un seul point) avec 0.0.
    /// Par défaut ils sont absents du résultat.
    pub keep_empty: bool,
}

/// Tous les segments, trail par trail, dans l'ordre d'entrée
pub fn segments(records: &[TrailRecord]) -> impl Iterator<Item = Segment<'_>> + '_ {
    records.iter().flat_map(|record| record.segments())
}

/// Somme des segments par identifiant, triée par identifiant.
///
/// Plusieurs features partageant un GEOMETRYID sont additionnées, sans segment entre elles.
/// Si tous les identifiants sont numériques, l'ordre est numérique ("9" avant "10").
pub fn trail_distances(records: &[TrailRecord], options: DistanceOptions) -> Vec<TrailDistance> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    let mut segment_count = 0usize;

    for record in records {
        for segment in record.segments() {
            *totals.entry(segment.id).or_insert(0.0) += segment.distance_mi;
            segment_count += 1;
        }
        if options.keep_empty {
            totals.entry(record.id.as_str()).or_insert(0.0);
        }
    }

    debug!(
        trails = records.len(),
        segments = segment_count,
        rows = totals.len(),
        "Computed trail distances"
    );

    let mut rows: Vec<TrailDistance> = totals
        .into_iter()
        .map(|(id, distance_mi)| TrailDistance {
            id: id.to_string(),
            distance_mi,
        })
        .collect();

    if rows.iter().all(|row| numeric_key(&row.id).is_some()) {
        rows.sort_by(|a, b| {
            let (a, b) = (numeric_key(&a.id), numeric_key(&b.id));
            a.unwrap_or(0.0).total_cmp(&b.unwrap_or(0.0))
        });
    }

    rows
}

fn numeric_key(id: &str) -> Option<f64> {
    id.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haversine::haversine;

    fn distance_of<'a>(rows: &'a [TrailDistance], id: &str) -> Option<&'a TrailDistance> {
        rows.iter().find(|r| r.id == id)
    }

    #[test]
    fn test_segment_count_is_n_minus_one() {
        let record = TrailRecord::from_lon_lat("A", &[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 2.0)]);
        assert_eq!(record.segments().count(), 3);
    }

    #[test]
    fn test_no_segment_across_trails() {
        // A (3 points) puis B (2 points) : 2 + 1 segments
        let records = vec![
            TrailRecord::from_lon_lat("A", &[(0.0, 0.0), (0.0, 1.0), (0.0, 2.0)]),
            TrailRecord::from_lon_lat("B", &[(50.0, 50.0), (50.0, 51.0)]),
        ];

        let all: Vec<_> = segments(&records).collect();
        assert_eq!(all.len(), 3);
        assert_eq!(all.iter().filter(|s| s.id == "A").count(), 2);
        assert_eq!(all.iter().filter(|s| s.id == "B").count(), 1);
        // Aucun segment ne relie le dernier point de A au premier de B
        assert!(all
            .iter()
            .all(|s| !(s.start.y == 2.0 && s.end.y == 50.0)));
    }

    #[test]
    fn test_interleaved_identifiers() {
        // A, B, A : les features de même identifiant s'additionnent sans segment entre elles
        let records = vec![
            TrailRecord::from_lon_lat("A", &[(0.0, 0.0), (0.0, 1.0)]),
            TrailRecord::from_lon_lat("B", &[(10.0, 0.0), (10.0, 1.0)]),
            TrailRecord::from_lon_lat("A", &[(0.0, 1.0), (0.0, 2.0)]),
        ];

        let rows = trail_distances(&records, DistanceOptions::default());
        assert_eq!(rows.len(), 2);

        let a = distance_of(&rows, "A").unwrap().distance_mi;
        let expected = 2.0 * haversine(0.0, 0.0, 1.0, 0.0);
        assert!((a - expected).abs() < 1e-9);
    }

    #[test]
    fn test_duplicate_final_point_adds_nothing() {
        let records = vec![
            TrailRecord::from_lon_lat("D", &[(0.0, 0.0), (0.0, 1.0), (0.0, 1.0)]),
            TrailRecord::from_lon_lat("S", &[(0.0, 0.0), (0.0, 1.0)]),
        ];

        let rows = trail_distances(&records, DistanceOptions::default());
        let d = distance_of(&rows, "D").unwrap().distance_mi;
        let s = distance_of(&rows, "S").unwrap().distance_mi;
        assert_eq!(d, s);
    }

    #[test]
    fn test_three_point_trail_matches_manual_sum() {
        let points = [(-84.4530, 33.9970), (-84.4420, 33.9890), (-84.4290, 33.9810)];
        let records = vec![TrailRecord::from_lon_lat("{CRNRA}", &points)];

        let expected = haversine(points[0].1, points[0].0, points[1].1, points[1].0)
            + haversine(points[1].1, points[1].0, points[2].1, points[2].0);

        let rows = trail_distances(&records, DistanceOptions::default());
        assert_eq!(rows.len(), 1);
        assert!((rows[0].distance_mi - expected).abs() < 1e-6);
    }

    /// Comportement historique : un trail d'un seul point n'a aucune ligne.
    #[test]
    fn test_single_point_trail_is_omitted_by_default() {
        let records = vec![
            TrailRecord::from_lon_lat("LONE", &[(-84.4, 33.9)]),
            TrailRecord::from_lon_lat("PAIR", &[(-84.4, 33.9), (-84.5, 33.9)]),
        ];

        let rows = trail_distances(&records, DistanceOptions::default());
        assert!(distance_of(&rows, "LONE").is_none());
        assert!(distance_of(&rows, "PAIR").is_some());
    }

    #[test]
    fn test_single_point_trail_kept_when_requested() {
        let records = vec![TrailRecord::from_lon_lat("LONE", &[(-84.4, 33.9)])];

        let rows = trail_distances(&records, DistanceOptions { keep_empty: true });
        assert_eq!(
            rows,
            vec![TrailDistance {
                id: "LONE".to_string(),
                distance_mi: 0.0
            }]
        );
    }

    #[test]
    fn test_rows_sorted_by_identifier() {
        let records = vec![
            TrailRecord::from_lon_lat("c", &[(0.0, 0.0), (0.0, 1.0)]),
            TrailRecord::from_lon_lat("a", &[(0.0, 0.0), (0.0, 1.0)]),
            TrailRecord::from_lon_lat("b", &[(0.0, 0.0), (0.0, 1.0)]),
        ];

        let ids: Vec<_> = trail_distances(&records, DistanceOptions::default())
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_numeric_identifiers_sorted_numerically() {
        let records = vec![
            TrailRecord::from_lon_lat("10", &[(0.0, 0.0), (0.0, 1.0)]),
            TrailRecord::from_lon_lat("9", &[(0.0, 0.0), (0.0, 1.0)]),
            TrailRecord::from_lon_lat("100", &[(0.0, 0.0), (0.0, 1.0)]),
        ];

        let ids: Vec<_> = trail_distances(&records, DistanceOptions::default())
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["9", "10", "100"]);
    }

    #[test]
    fn test_mixed_identifiers_sorted_as_text() {
        let records = vec![
            TrailRecord::from_lon_lat("9", &[(0.0, 0.0), (0.0, 1.0)]),
            TrailRecord::from_lon_lat("10", &[(0.0, 0.0), (0.0, 1.0)]),
            TrailRecord::from_lon_lat("{A}", &[(0.0, 0.0), (0.0, 1.0)]),
        ];

        let ids: Vec<_> = trail_distances(&records, DistanceOptions::default())
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["10", "9", "{A}"]);
    }
}
