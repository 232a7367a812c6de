//! Export CSV des distances de trails

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use csv::Writer;

use trailgeo::{Segment, TrailDistance};

/// En-tête du fichier des distances
pub const DISTANCE_HEADER: [&str; 2] = ["GEOMETRYID", "distance_mi"];

/// En-tête du fichier des segments
pub const SEGMENT_HEADER: [&str; 6] = [
    "GEOMETRYID",
    "start_lon",
    "start_lat",
    "end_lon",
    "end_lat",
    "distance_mi",
];

/// Écrit `GEOMETRYID,distance_mi`, une ligne par trail
pub fn export_distances(rows: &[TrailDistance], output_path: &Path) -> Result<()> {
    let mut writer = create_writer(output_path)?;
    write_distances(&mut writer, rows)?;
    writer
        .flush()
        .context(format!("Failed to write {}", output_path.display()))
}

/// Écrit le détail par segment
pub fn export_segments<'a, I>(segments: I, output_path: &Path) -> Result<usize>
where
    I: IntoIterator<Item = Segment<'a>>,
{
    let mut writer = create_writer(output_path)?;
    writer.write_record(SEGMENT_HEADER)?;

    let mut count = 0;
    for segment in segments {
        writer.write_record([
            segment.id.to_string(),
            format_float(segment.start.x),
            format_float(segment.start.y),
            format_float(segment.end.x),
            format_float(segment.end.y),
            format_float(segment.distance_mi),
        ])?;
        count += 1;
    }

    writer
        .flush()
        .context(format!("Failed to write {}", output_path.display()))?;
    Ok(count)
}

fn create_writer(output_path: &Path) -> Result<Writer<std::fs::File>> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .context(format!("Failed to create directory: {}", parent.display()))?;
        }
    }
    Writer::from_path(output_path).context(format!("Failed to create file: {}", output_path.display()))
}

fn write_distances<W: Write>(writer: &mut Writer<W>, rows: &[TrailDistance]) -> Result<()> {
    writer.write_record(DISTANCE_HEADER)?;
    for row in rows {
        writer.write_record([row.id.as_str(), format_float(row.distance_mi).as_str()])?;
    }
    Ok(())
}

/// Texte aller-retour le plus court, avec `.0` pour les valeurs entières
fn format_float(value: f64) -> String {
    let text = value.to_string();
    if value.is_finite() && !text.contains('.') {
        format!("{}.0", text)
    } else {
        text
    }
}
