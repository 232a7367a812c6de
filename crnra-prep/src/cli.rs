//! Définition et implémentation des commandes CLI
//!
//! - sans sous-commande / `run` : téléchargement, rivière, distances
//! - `fetch` : téléchargement seul
//! - `merge-river`, `trail-distances` : étapes locales sur des fichiers existants

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use clap::Subcommand;
use tracing::{info, warn};

use crnra_prep::config::Config;
use crnra_prep::stages::{self, TrailOptions};
use crnra_prep::{fetch, RunReport};

#[derive(Subcommand)]
pub enum Commands {
    /// Download both datasets, merge the river and compute trail distances (default)
    Run,

    /// Download the trail and river GeoJSON files only
    Fetch,

    /// Merge every river line into a single MultiLineString feature
    MergeRiver {
        /// River GeoJSON file (default: river output of the config)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Merged GeoJSON file (default: river_merged of the config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compute the great-circle length of each trail (GEOMETRYID,distance_mi)
    TrailDistances {
        /// Trails GeoJSON file (default: trails output of the config)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Distance CSV file (default: trail_distances of the config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write one row per segment to this CSV file
        #[arg(long)]
        segments: Option<PathBuf>,

        /// Emit single-point trails with a distance of 0 instead of omitting them
        #[arg(long)]
        keep_empty: bool,

        /// Property holding the trail identifier
        #[arg(long)]
        id_property: Option<String>,

        /// EPSG code of the trail coordinates (4326 or 3857)
        #[arg(long)]
        source_crs: Option<u32>,
    },
}

/// Charge la configuration : preset ou fichier, puis `.env`, puis `--out-dir`
pub fn load_config(spec: &str, out_dir: Option<&Path>) -> Result<Config> {
    let mut config = Config::from_spec(spec)?;
    config.apply_env();
    if let Some(dir) = out_dir {
        config.rebase(dir);
    }
    Ok(config)
}

/// Exécute toutes les étapes
pub async fn cmd_run(config: &Config, report_path: Option<&Path>) -> Result<()> {
    let start = Instant::now();

    println!("=== CRNRA data prep ===");
    println!("Trails: {}", config.trails.url);
    println!("River: {}", config.river.url);
    println!("Trails file: {}", config.trails.output.display());
    println!("River file: {}", config.river.output.display());
    println!("Merged river: {}", config.river_merged.display());
    println!("Distances: {}", config.trail_distances.display());

    let mut report = RunReport::new();
    stages::run_all(config, &mut report).await?;

    finish_report(&mut report, start, report_path)
}

/// Télécharge les deux jeux de données
pub async fn cmd_fetch(config: &Config, report_path: Option<&Path>) -> Result<()> {
    let start = Instant::now();

    let mut report = RunReport::new();
    report.record_downloads(fetch::fetch_all(config).await?);

    finish_report(&mut report, start, report_path)
}

/// Fusionne la rivière
pub fn cmd_merge_river(config: &Config, input: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let input = input.unwrap_or_else(|| config.river.output.clone());
    let output = output.unwrap_or_else(|| config.river_merged.clone());

    info!(input = %input.display(), output = %output.display(), "Merging river");
    let lines = stages::merge_river(&input, &output)?;

    println!("River: {} lines merged into {}", lines, output.display());
    Ok(())
}

/// Calcule les distances des trails
#[allow(clippy::too_many_arguments)]
pub fn cmd_trail_distances(
    config: &Config,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    segments: Option<PathBuf>,
    keep_empty: bool,
    id_property: Option<String>,
    source_crs: Option<u32>,
) -> Result<()> {
    let input = input.unwrap_or_else(|| config.trails.output.clone());
    let output = output.unwrap_or_else(|| config.trail_distances.clone());
    let id_property = id_property.unwrap_or_else(|| config.id_property.clone());

    let options = TrailOptions {
        input: &input,
        output: &output,
        segments: segments.as_deref(),
        id_property: &id_property,
        source_epsg: source_crs.unwrap_or(config.source_crs),
        keep_empty: keep_empty || config.keep_empty_trails,
    };

    let summary = stages::compute_trail_distances(&options)?;

    println!(
        "Trails: {} read, {} segments, {} rows written to {}",
        summary.trails,
        summary.segments,
        summary.rows,
        output.display()
    );
    if !summary.skipped.is_empty() {
        warn!(skipped = summary.skipped.len(), "Some trail features were skipped");
    }
    Ok(())
}

fn finish_report(report: &mut RunReport, start: Instant, report_path: Option<&Path>) -> Result<()> {
    report.set_duration(start.elapsed());
    report.finalize();
    report.display();

    if let Some(path) = report_path {
        report.save_to_file(path)?;
        info!(path = %path.display(), "Report saved");
    }

    info!("{}", report.summary());
    Ok(())
}
