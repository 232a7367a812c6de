//! Téléchargement des jeux de données GeoJSON
//!
//! Une réponse est acceptée si le statut vaut 200 et si le JSON re-sérialisé,
//! séparateurs `", "` et `": "` compris, dépasse `min_payload_len` caractères. Un échec est journalisé, jamais fatal :
//! les étapes suivantes travaillent sur ce qui se trouve sur disque.

use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::ser::Formatter;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{Config, SourceConfig};

/// Motif de rejet d'une réponse
#[derive(Debug, Error)]
pub enum FetchError {
    /// Erreur réseau (DNS, TLS, timeout, ...)
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Statut HTTP différent de 200
    #[error("{status} ({body})")]
    Status { status: u16, body: String },

    /// Corps non JSON
    #[error("{status} (invalid JSON: {reason}: {body})")]
    NotJson {
        status: u16,
        reason: String,
        body: String,
    },

    /// Corps trop court pour être un vrai jeu de données
    #[error("{status} (payload too short: {len} <= {min}: {body})")]
    TooShort {
        status: u16,
        len: usize,
        min: usize,
        body: String,
    },

    /// Écriture du fichier impossible
    #[error("cannot write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// Résultat d'un téléchargement, pour le rapport
#[derive(Debug, Clone, Serialize)]
pub struct FetchOutcome {
    /// Nom du jeu de données ("trails", "river")
    pub name: String,
    /// URL interrogée
    pub url: String,
    /// Statut HTTP reçu (absent si erreur réseau)
    pub status: Option<u16>,
    /// Taille du corps écrit, en octets
    pub bytes: usize,
    /// Empreinte blake3 du corps écrit
    pub blake3: Option<String>,
    /// Message d'erreur si la réponse a été rejetée
    pub error: Option<String>,
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Crée le client HTTP
pub fn build_client(config: &Config) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(config.user_agent.clone())
        .build()
        .context("Failed to build HTTP client")
}

/// Valide une réponse : statut 200, JSON, et taille minimale
pub fn validate_payload(status: StatusCode, body: &str, min_len: usize) -> Result<(), FetchError> {
    let code = status.as_u16();
    if status != StatusCode::OK {
        return Err(FetchError::Status {
            status: code,
            body: body.to_string(),
        });
    }

    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| FetchError::NotJson {
            status: code,
            reason: e.to_string(),
            body: body.to_string(),
        })?;

    let len = spaced_len(&value);
    if len <= min_len {
        return Err(FetchError::TooShort {
            status: code,
            len,
            min: min_len,
            body: body.to_string(),
        });
    }

    Ok(())
}

/// Séparateurs suivis d'un espace : `{'a': 1, 'b': [1, 2]}`
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }
}

/// Longueur, en caractères, du JSON re-sérialisé avec séparateurs espacés
pub fn spaced_len(value: &serde_json::Value) -> usize {
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    // Écrire une Value dans un Vec ne peut pas échouer
    if value.serialize(&mut serializer).is_err() {
        return 0;
    }
    String::from_utf8_lossy(&buf).chars().count()
}

/// Télécharge une source et écrit le corps brut tel quel.
///
/// Ne retourne jamais d'erreur : un échec est journalisé et reporté dans `FetchOutcome`.
pub async fn fetch_source(client: &Client, name: &str, source: &SourceConfig) -> FetchOutcome {
    let mut outcome = FetchOutcome {
        name: name.to_string(),
        url: source.url.clone(),
        status: None,
        bytes: 0,
        blake3: None,
        error: None,
    };

    info!(dataset = name, url = %source.url, "Downloading");

    match download(client, source, &mut outcome).await {
        Ok(()) => {
            info!(
                dataset = name,
                output = %source.output.display(),
                bytes = outcome.bytes,
                blake3 = outcome.blake3.as_deref().unwrap_or(""),
                "Download saved"
            );
        }
        Err(e) => {
            warn!("An error occurred downloading {} data: {}", name, e);
            outcome.error = Some(e.to_string());
        }
    }

    outcome
}

async fn download(
    client: &Client,
    source: &SourceConfig,
    outcome: &mut FetchOutcome,
) -> Result<(), FetchError> {
    let response = client.get(&source.url).send().await?;
    let status = response.status();
    outcome.status = Some(status.as_u16());

    let body = response.text().await?;
    debug!(status = status.as_u16(), bytes = body.len(), "Response received");

    validate_payload(status, &body, source.min_payload_len)?;

    write_body(&source.output, &body).map_err(|e| FetchError::Write {
        path: source.output.display().to_string(),
        source: e,
    })?;

    outcome.bytes = body.len();
    outcome.blake3 = Some(hex::encode(blake3::hash(body.as_bytes()).as_bytes()));
    Ok(())
}

fn write_body(path: &Path, body: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, body)
}

/// Télécharge les trails puis la rivière, séquentiellement
pub async fn fetch_all(config: &Config) -> Result<Vec<FetchOutcome>> {
    let client = build_client(config)?;

    let mut outcomes = Vec::with_capacity(2);
    outcomes.push(fetch_source(&client, "trail", &config.trails).await);
    outcomes.push(fetch_source(&client, "river", &config.river).await);

    Ok(outcomes)
}
