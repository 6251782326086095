//! Locating and reading the worksheet markup inside the unpacked tree.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Sws2RstError;

/// Conventional name of the markup file inside the worksheet directory.
pub const WORKSHEET_FILE: &str = "worksheet.html";
/// Conventional name of the flat shared-data directory.
pub const SHARED_DATA_DIR: &str = "data";
/// Conventional name of the per-cell directory tree.
pub const CELLS_DIR: &str = "cells";

/// Find the worksheet directory inside the unpacked scratch tree.
///
/// The archive is expected to contain one top-level directory holding
/// [`WORKSHEET_FILE`]; the scratch root itself is accepted as a fallback
/// for archives packed without the wrapper directory.
pub fn locate(scratch: &Path) -> Result<PathBuf, Sws2RstError> {
    let entries = std::fs::read_dir(scratch).map_err(|e| Sws2RstError::ExtractFailed {
        path: scratch.to_path_buf(),
        source: e,
    })?;

    for entry in entries.flatten() {
        let dir = entry.path();
        if dir.is_dir() && dir.join(WORKSHEET_FILE).is_file() {
            debug!("worksheet directory: {}", dir.display());
            return Ok(dir);
        }
    }

    if scratch.join(WORKSHEET_FILE).is_file() {
        return Ok(scratch.to_path_buf());
    }

    Err(Sws2RstError::WorksheetMissing {
        dir: scratch.to_path_buf(),
        expected: WORKSHEET_FILE,
    })
}

/// Read the worksheet markup as strict UTF-8.
pub fn read_markup(worksheet_dir: &Path) -> Result<String, Sws2RstError> {
    let path = worksheet_dir.join(WORKSHEET_FILE);
    let bytes = std::fs::read(&path).map_err(|e| Sws2RstError::ExtractFailed {
        path: path.clone(),
        source: e,
    })?;
    String::from_utf8(bytes).map_err(|_| Sws2RstError::MarkupNotUtf8 { path })
}
