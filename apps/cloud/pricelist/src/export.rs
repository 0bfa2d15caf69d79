//! CSV output for product and price rows

use serde::Serialize;
use std::path::Path;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Write `rows` to `path`, replacing any existing file.
///
/// Columns follow the field order of the row type. A header row with the
/// field names is written only when `headers` is set. Rows go to a temporary
/// file next to `path` that is renamed over it once complete, so a failed
/// write leaves any previous file untouched.
pub fn write_rows<T: Serialize>(
    path: &Path,
    rows: &[T],
    headers: bool,
) -> Result<usize, ExportError> {
    let csv_err = |source| ExportError::Csv {
        path: path.display().to_string(),
        source,
    };
    let io_err = |source| ExportError::Io {
        path: path.display().to_string(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file = NamedTempFile::new_in(dir).map_err(io_err)?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(headers)
        .from_writer(file);

    for row in rows {
        writer.serialize(row).map_err(csv_err)?;
    }

    let file = writer.into_inner().map_err(|err| io_err(err.into_error()))?;
    file.persist(path).map_err(|err| io_err(err.error))?;

    info!(path = %path.display(), rows = rows.len(), "Wrote CSV file");
    Ok(rows.len())
}
