//! Configuration du système
//!
//! Sources : preset embarqué ou fichier JSON, puis variables d'environnement
//! (`CRNRA_TRAILS_URL`, `CRNRA_RIVER_URL`, `CRNRA_OUT_DIR`), puis options CLI.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Nom du preset par défaut
pub const DEFAULT_PRESET: &str = "crnra";

/// Presets embarqués : nom, JSON
const PRESETS: &[(&str, &str)] = &[("crnra", include_str!("presets/crnra.json"))];

fn embedded_preset(name: &str) -> Option<&'static str> {
    PRESETS
        .iter()
        .find(|(preset, _)| *preset == name)
        .map(|(_, json)| *json)
}

/// Configuration principale
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Trails NPS (unit CHAT)
    pub trails: SourceConfig,

    /// Réseau hydrographique (Chattahoochee River)
    pub river: SourceConfig,

    /// Fichier GeoJSON de la rivière fusionnée
    pub river_merged: PathBuf,

    /// Fichier CSV des distances par trail
    pub trail_distances: PathBuf,

    /// Propriété portant l'identifiant des trails
    #[serde(default = "default_id_property")]
    pub id_property: String,

    /// EPSG des coordonnées des trails (4326 ou 3857)
    #[serde(default = "default_source_crs")]
    pub source_crs: u32,

    /// Émettre les trails d'un seul point avec une distance de 0
    #[serde(default)]
    pub keep_empty_trails: bool,

    /// Timeout des requêtes HTTP, en secondes
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent des requêtes HTTP
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Un jeu de données distant
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    /// URL complète, filtre `where` inclus
    pub url: String,

    /// Fichier de destination du corps brut
    pub output: PathBuf,

    /// Taille minimale du JSON re-sérialisé pour accepter la réponse
    pub min_payload_len: usize,
}

fn default_id_property() -> String {
    trailgeo::DEFAULT_ID_PROPERTY.to_string()
}

fn default_source_crs() -> u32 {
    4326
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

impl Config {
    /// Charge une configuration depuis un fichier
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Charge une configuration depuis un preset embarqué
    pub fn from_preset(preset: &str) -> Result<Self> {
        match embedded_preset(preset) {
            Some(json) => Self::load_embedded(json),
            None => {
                let names: Vec<&str> = PRESETS.iter().map(|(name, _)| *name).collect();
                anyhow::bail!("Unknown preset: {}. Use: {}", preset, names.join(", "))
            }
        }
    }

    /// Preset si le nom est connu, sinon chemin de fichier JSON
    pub fn from_spec(spec: &str) -> Result<Self> {
        match embedded_preset(spec) {
            Some(json) => Self::load_embedded(json),
            None => Self::load(Path::new(spec)),
        }
    }

    fn load_embedded(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse embedded config")
    }

    /// Applique les variables d'environnement `CRNRA_*`
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applique des surcharges depuis une source clé -> valeur
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("CRNRA_TRAILS_URL") {
            self.trails.url = url;
        }
        if let Some(url) = lookup("CRNRA_RIVER_URL") {
            self.river.url = url;
        }
        if let Some(dir) = lookup("CRNRA_OUT_DIR") {
            self.rebase(Path::new(&dir));
        }
    }

    /// Résout les chemins relatifs de sortie par rapport à `dir`
    pub fn rebase(&mut self, dir: &Path) {
        for path in [
            &mut self.trails.output,
            &mut self.river.output,
            &mut self.river_merged,
            &mut self.trail_distances,
        ] {
            if path.is_relative() {
                *path = dir.join(&*path);
            }
        }
    }
}
