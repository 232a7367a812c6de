//! Tests d'intégration du traitement complet
//!
//! Les jeux de données sont servis par un serveur HTTP local : aucun accès réseau.
//!
//! Exécution:
//! ```bash
//! cargo test -p crnra-prep --test pipeline
//! ```

use std::path::{Path, PathBuf};

use anyhow::Result;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use crnra_prep::config::{Config, DEFAULT_PRESET};
use crnra_prep::stages::{self, TrailOptions};
use crnra_prep::{RunReport, RunStatus};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn work_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(name);
    std::fs::remove_dir_all(&dir).ok();
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Serveur HTTP local : `/trails` et `/river` servent les fixtures, le reste répond 404
async fn serve_fixtures(connections: usize) -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let trails = std::fs::read_to_string(fixture("trails_sample.geojson"))?;
    let river = std::fs::read_to_string(fixture("river_sample.geojson"))?;

    tokio::spawn(async move {
        for _ in 0..connections {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let mut buf = vec![0u8; 8192];
            let n = socket.read(&mut buf).await.unwrap_or(0);
            let request = String::from_utf8_lossy(&buf[..n]);

            let (status, body) = if request.starts_with("GET /trails") {
                ("200 OK", trails.clone())
            } else if request.starts_with("GET /river") {
                ("200 OK", river.clone())
            } else {
                ("404 Not Found", r#"{"error":{"code":404}}"#.to_string())
            };

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    Ok(format!("http://{}", addr))
}

fn local_config(base_url: &str, dir: &Path) -> Config {
    let mut config = Config::from_preset(DEFAULT_PRESET).unwrap();
    config.trails.url = format!("{}/trails?where=UNITCODE%20%3D%20'chat'", base_url);
    config.river.url = format!("{}/river?where=NAME%20%3D%20%27Chattahoochee%20River%27", base_url);
    // Les fixtures sont plus petites que les vrais jeux de données
    config.trails.min_payload_len = 100;
    config.river.min_payload_len = 100;
    config.timeout_secs = 5;
    config.rebase(dir);
    config
}

#[tokio::test]
async fn test_run_all_stages() {
    let base_url = serve_fixtures(2).await.unwrap();
    let dir = work_dir("crnra_prep_pipeline_all");
    let config = local_config(&base_url, &dir);

    let mut report = RunReport::new();
    stages::run_all(&config, &mut report).await.unwrap();
    report.finalize();

    assert_eq!(report.failed_downloads(), 0);
    assert!(config.trails.output.exists());
    assert!(config.river.output.exists());

    // Corps écrits tels quels
    assert_eq!(
        std::fs::read_to_string(&config.river.output).unwrap(),
        std::fs::read_to_string(fixture("river_sample.geojson")).unwrap()
    );

    // Rivière : 1 + 2 + 1 lignes dans une seule feature
    assert_eq!(report.river_lines, Some(4));
    let merged: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&config.river_merged).unwrap()).unwrap();
    assert_eq!(merged["features"].as_array().unwrap().len(), 1);
    assert_eq!(merged["features"][0]["geometry"]["type"], "MultiLineString");

    // Distances : deux trails avec segments, le trail d'un point est absent
    let csv = std::fs::read_to_string(&config.trail_distances).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "GEOMETRYID,distance_mi");
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("{0A1B2C3D-0001},"));
    assert!(lines[2].starts_with("{0A1B2C3D-0002},"));
    assert!(!csv.contains("{0A1B2C3D-0003}"));

    // La feature sans GEOMETRYID est signalée
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.status, RunStatus::PartialSuccess);
}

#[tokio::test]
async fn test_failed_download_keeps_going() {
    let base_url = serve_fixtures(2).await.unwrap();
    let dir = work_dir("crnra_prep_pipeline_404");
    let mut config = local_config(&base_url, &dir);
    config.trails.url = format!("{}/missing", base_url);

    // Un fichier de trails d'une exécution précédente est encore sur disque
    std::fs::copy(fixture("trails_sample.geojson"), &config.trails.output).unwrap();

    let mut report = RunReport::new();
    stages::run_all(&config, &mut report).await.unwrap();
    report.finalize();

    assert_eq!(report.failed_downloads(), 1);
    let failed = &report.downloads[0];
    assert_eq!(failed.status, Some(404));
    assert!(failed.error.as_deref().unwrap().contains("404"));

    // Les étapes locales ont travaillé sur le fichier existant
    assert_eq!(report.distance_rows, Some(2));
    assert_eq!(report.status, RunStatus::PartialSuccess);
}

#[tokio::test]
async fn test_missing_file_after_failed_download_is_fatal() {
    let base_url = serve_fixtures(2).await.unwrap();
    let dir = work_dir("crnra_prep_pipeline_fatal");
    let mut config = local_config(&base_url, &dir);
    config.river.url = format!("{}/missing", base_url);

    let mut report = RunReport::new();
    let err = stages::run_all(&config, &mut report).await.unwrap_err();

    assert!(format!("{:#}", err).contains("Failed to read river file"));
    assert_eq!(report.failed_downloads(), 1);
}

#[test]
fn test_trail_distances_with_segments_and_keep_empty() {
    let dir = work_dir("crnra_prep_pipeline_segments");
    let output = dir.join("distances.csv");
    let segments = dir.join("segments.csv");
    let input = fixture("trails_sample.geojson");

    let options = TrailOptions {
        input: &input,
        output: &output,
        segments: Some(segments.as_path()),
        id_property: "GEOMETRYID",
        source_epsg: 4326,
        keep_empty: true,
    };
    let summary = stages::compute_trail_distances(&options).unwrap();

    assert_eq!(summary.trails, 4);
    assert_eq!(summary.segments, 4);
    assert_eq!(summary.rows, 3);
    assert_eq!(summary.skipped.len(), 1);

    let csv = std::fs::read_to_string(&output).unwrap();
    assert!(csv.contains("{0A1B2C3D-0003},0.0\n"));

    let segment_lines = std::fs::read_to_string(&segments).unwrap();
    assert_eq!(segment_lines.lines().count(), 5);
}
