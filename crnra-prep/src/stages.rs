//! Étapes du traitement : téléchargement, fusion de la rivière, distances des trails
//!
//! Les étapes s'enchaînent sans retour. Un téléchargement raté n'arrête rien ;
//! un fichier local absent ou mal formé est fatal.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use trailgeo::projection::reproject_in_place;
use trailgeo::{read_river_merged, read_trails, segments, trail_distances, DistanceOptions, SourceCrs};

use crate::config::Config;
use crate::export;
use crate::fetch;
use crate::report::RunReport;

/// Paramètres du calcul des distances
#[derive(Debug, Clone)]
pub struct TrailOptions<'a> {
    /// Fichier GeoJSON des trails
    pub input: &'a Path,
    /// CSV `GEOMETRYID,distance_mi`
    pub output: &'a Path,
    /// CSV optionnel du détail par segment
    pub segments: Option<&'a Path>,
    /// Propriété identifiant
    pub id_property: &'a str,
    /// EPSG des coordonnées d'entrée
    pub source_epsg: u32,
    /// Émettre les trails d'un seul point
    pub keep_empty: bool,
}

impl<'a> TrailOptions<'a> {
    /// Options issues de la configuration
    pub fn from_config(config: &'a Config) -> Self {
        Self {
            input: &config.trails.output,
            output: &config.trail_distances,
            segments: None,
            id_property: &config.id_property,
            source_epsg: config.source_crs,
            keep_empty: config.keep_empty_trails,
        }
    }
}

/// Bilan du calcul des distances
#[derive(Debug, Clone, Default)]
pub struct TrailSummary {
    pub trails: usize,
    pub segments: usize,
    pub rows: usize,
    /// Features ignorées
    pub skipped: Vec<String>,
}

/// Fusionne la rivière en un seul MultiLineString et l'écrit. Retourne le nombre de lignes.
pub fn merge_river(input: &Path, output: &Path) -> Result<usize> {
    let merged = read_river_merged(input)
        .with_context(|| format!("Failed to read river file {}", input.display()))?;
    let lines = merged.0.len();

    export::export_merged_river(merged, output)?;

    info!(
        input = %input.display(),
        output = %output.display(),
        lines,
        "River merged"
    );
    Ok(lines)
}

/// Calcule et écrit la longueur de chaque trail
pub fn compute_trail_distances(options: &TrailOptions<'_>) -> Result<TrailSummary> {
    let crs = SourceCrs::from_epsg(options.source_epsg)?;

    let parsed = read_trails(options.input, options.id_property)
        .with_context(|| format!("Failed to read trails file {}", options.input.display()))?;
    let mut records = parsed.items;
    reproject_in_place(&mut records, crs);

    let rows = trail_distances(
        &records,
        DistanceOptions {
            keep_empty: options.keep_empty,
        },
    );
    export::export_distances(&rows, options.output)?;

    let segment_count = match options.segments {
        Some(path) => export::export_segments(segments(&records), path)?,
        None => segments(&records).count(),
    };

    info!(
        input = %options.input.display(),
        output = %options.output.display(),
        trails = records.len(),
        segments = segment_count,
        rows = rows.len(),
        skipped = parsed.errors.len(),
        "Trail distances written"
    );

    Ok(TrailSummary {
        trails: records.len(),
        segments: segment_count,
        rows: rows.len(),
        skipped: parsed.errors.iter().map(|e| e.to_string()).collect(),
    })
}

/// Exécute toutes les étapes dans l'ordre
pub async fn run_all(config: &Config, report: &mut RunReport) -> Result<()> {
    let outcomes = fetch::fetch_all(config).await?;
    report.record_downloads(outcomes);

    let lines = merge_river(&config.river.output, &config.river_merged)?;
    report.record_river(lines);

    let summary = compute_trail_distances(&TrailOptions::from_config(config))?;
    report.record_distances(summary.trails, summary.segments, summary.rows);
    for skipped in summary.skipped {
        report.record_error(skipped);
    }

    Ok(())
}
