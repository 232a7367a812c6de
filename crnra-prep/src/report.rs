//! Rapport d'exécution
//!
//! Collecte le résultat de chaque étape (téléchargements, fusion de la rivière,
//! distances) pour l'affichage final et l'export JSON optionnel.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;

use crate::fetch::FetchOutcome;

/// Statut global de l'exécution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunStatus {
    /// Toutes les étapes réussies
    Success,
    /// Étapes locales réussies malgré des téléchargements ou features en échec
    PartialSuccess,
    /// Aucune sortie produite
    Failed,
}

/// Rapport complet d'une exécution
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Durée totale
    pub duration_secs: f64,
    /// Statut global
    pub status: RunStatus,

    /// Téléchargements
    pub downloads: Vec<FetchOutcome>,

    /// Nombre de lignes dans la rivière fusionnée
    pub river_lines: Option<usize>,

    /// Trails lus
    pub trails_read: usize,
    /// Segments calculés
    pub segments: usize,
    /// Lignes du CSV de distances
    pub distance_rows: Option<usize>,

    /// Erreurs non fatales (features ignorées)
    pub errors: Vec<String>,
}

impl Default for RunReport {
    fn default() -> Self {
        Self {
            duration_secs: 0.0,
            status: RunStatus::Success,
            downloads: Vec::new(),
            river_lines: None,
            trails_read: 0,
            segments: 0,
            distance_rows: None,
            errors: Vec::new(),
        }
    }
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enregistre les résultats de téléchargement
    pub fn record_downloads(&mut self, outcomes: Vec<FetchOutcome>) {
        self.downloads.extend(outcomes);
    }

    /// Enregistre la fusion de la rivière
    pub fn record_river(&mut self, lines: usize) {
        self.river_lines = Some(lines);
    }

    /// Enregistre le calcul des distances
    pub fn record_distances(&mut self, trails: usize, segments: usize, rows: usize) {
        self.trails_read = trails;
        self.segments = segments;
        self.distance_rows = Some(rows);
    }

    /// Enregistre une erreur non fatale
    pub fn record_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Définit la durée de l'exécution
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration_secs = duration.as_secs_f64();
    }

    /// Nombre de téléchargements en échec
    pub fn failed_downloads(&self) -> usize {
        self.downloads.iter().filter(|d| !d.is_success()).count()
    }

    /// Détermine le statut final
    pub fn finalize(&mut self) {
        let produced = self.river_lines.is_some() || self.distance_rows.is_some();
        let fetched = self.downloads.iter().any(FetchOutcome::is_success);
        let degraded = self.failed_downloads() > 0 || !self.errors.is_empty();

        self.status = if !produced && !fetched {
            RunStatus::Failed
        } else if degraded {
            RunStatus::PartialSuccess
        } else {
            RunStatus::Success
        };
    }

    /// Affiche le rapport sur la console
    pub fn display(&self) {
        println!("\n{}", "=".repeat(60));
        println!("CRNRA DATA PREP REPORT");
        println!("{}", "=".repeat(60));

        println!("\nStatus: {:?}", self.status);
        println!("Duration: {:.2}s", self.duration_secs);

        if !self.downloads.is_empty() {
            println!("\n--- DOWNLOADS ---");
            for d in &self.downloads {
                match &d.error {
                    None => println!(
                        "  {}: {} bytes (blake3 {})",
                        d.name,
                        d.bytes,
                        d.blake3.as_deref().unwrap_or("-")
                    ),
                    Some(e) => println!("  {}: FAILED {}", d.name, truncate(e, 120)),
                }
            }
        }

        println!("\n--- OUTPUTS ---");
        match self.river_lines {
            Some(n) => println!("  River: {} lines merged", n),
            None => println!("  River: not produced"),
        }
        match self.distance_rows {
            Some(n) => println!(
                "  Trails: {} read, {} segments, {} distance rows",
                self.trails_read, self.segments, n
            ),
            None => println!("  Trails: not produced"),
        }

        if !self.errors.is_empty() {
            println!("\n--- SKIPPED ({}) ---", self.errors.len());
            for e in self.errors.iter().take(20) {
                println!("  {}", e);
            }
            if self.errors.len() > 20 {
                println!("  ... and {} more", self.errors.len() - 20);
            }
        }

        println!("\n{}", "=".repeat(60));
    }

    /// Sauvegarde le rapport en JSON
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Affichage compact pour le résumé
    pub fn summary(&self) -> String {
        format!(
            "{:?}: {}/{} downloads, {} river lines, {} distance rows, {} skipped",
            self.status,
            self.downloads.len() - self.failed_downloads(),
            self.downloads.len(),
            self.river_lines.unwrap_or(0),
            self.distance_rows.unwrap_or(0),
            self.errors.len()
        )
    }
}

fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
