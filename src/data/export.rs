//! Export of annotation positions for copy-out.

use std::io::Write;
use std::path::Path;

use crate::data::annotations::AnnotationPosition;
use crate::error::Result;

/// Default file name for an export, stamped with the current local time.
pub fn default_file_name(stem: &str, extension: &str) -> String {
    format!("{stem}_{}.{extension}", chrono::Local::now().timestamp_millis())
}

fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Write positions as CSV with an `id,x,y` header.
pub fn write_positions_csv<W: Write>(mut w: W, positions: &[AnnotationPosition]) -> std::io::Result<()> {
    writeln!(w, "id,x,y")?;
    for p in positions {
        writeln!(w, "{},{},{}", csv_field(&p.id), p.x, p.y)?;
    }
    Ok(())
}

/// Positions as a pretty-printed JSON array of `{id, x, y}`.
pub fn positions_to_json(positions: &[AnnotationPosition]) -> Result<String> {
    Ok(serde_json::to_string_pretty(positions)?)
}

/// Save positions to `path`; `.json` writes JSON, anything else CSV.
pub fn save_positions<P: AsRef<Path>>(path: P, positions: &[AnnotationPosition]) -> Result<()> {
    let path = path.as_ref();
    match path.extension().and_then(|s| s.to_str()).unwrap_or("") {
        "json" => std::fs::write(path, positions_to_json(positions)?)?,
        _ => {
            let mut w = std::io::BufWriter::new(std::fs::File::create(path)?);
            write_positions_csv(&mut w, positions)?;
            w.flush()?;
        }
    }
    tracing::info!(path = %path.display(), count = positions.len(), "annotation positions exported");
    Ok(())
}
