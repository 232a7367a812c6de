//! Export GeoJSON avec geozero (streaming)

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use geo::{Geometry, MultiLineString};
use geozero::geojson::GeoJsonWriter;
use geozero::GeozeroGeometry;

/// Exporte la rivière fusionnée : une FeatureCollection d'une seule feature (id "0")
pub fn export_merged_river(lines: MultiLineString<f64>, output_path: &Path) -> Result<()> {
    let geometry = Geometry::MultiLineString(lines);
    export_single_feature(&geometry, "0", output_path)
}

/// Exporte une géométrie comme unique feature d'une FeatureCollection, sans propriétés
pub fn export_single_feature(geometry: &Geometry<f64>, id: &str, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .context(format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    let file = File::create(output_path)
        .context(format!("Failed to create file: {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);

    write!(writer, r#"{{"type":"FeatureCollection","features":["#)?;
    write_feature(&mut writer, id, geometry)?;
    write!(writer, "]}}")?;
    writer.flush()?;

    Ok(())
}

/// Écrit une feature en GeoJSON
fn write_feature<W: Write>(writer: &mut W, id: &str, geometry: &Geometry<f64>) -> Result<()> {
    write!(writer, r#"{{"type":"Feature","id":"{}","#, escape_json(id))?;

    // Géométrie via geozero
    write!(writer, r#""geometry":"#)?;
    let mut geom_buf = Vec::new();
    let mut geom_writer = GeoJsonWriter::new(&mut geom_buf);
    geometry.process_geom(&mut geom_writer)?;
    writer.write_all(&geom_buf)?;

    write!(writer, r#","properties":{{}}}}"#)?;

    Ok(())
}

/// Échappe une chaîne pour JSON
fn escape_json(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            c if c.is_control() => {
                result.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => result.push(c),
        }
    }
    result
}
