//! Report types returned by the conversion entry points.

use serde::Serialize;
use std::path::PathBuf;

/// Result of converting one worksheet archive.
///
/// Both paths exist on disk by the time this value is returned; the scratch
/// directory used during conversion is already gone.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionOutput {
    /// The input archive this report describes.
    pub input: PathBuf,
    /// Normalized base name deriving both output paths.
    pub base_name: String,
    /// Path of the written reStructuredText document.
    pub document_path: PathBuf,
    /// Path of the media directory.
    pub media_dir: PathBuf,
    /// Counters for the run.
    pub stats: ConversionStats,
}

/// Counters for one pipeline run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversionStats {
    /// Shared-data files moved into the media directory.
    pub shared_files_moved: usize,
    /// Shared-data files dropped because the destination name already
    /// existed (first write wins).
    pub shared_files_skipped: usize,
    /// Cell output files copied into the media directory.
    pub cell_files_copied: usize,
    /// Byte length of the written document.
    pub document_bytes: usize,
    /// Wall-clock duration of the whole run.
    pub total_duration_ms: u64,
}

/// Archive layout summary produced by [`crate::inspect`] without unpacking.
#[derive(Debug, Clone, Serialize)]
pub struct WorksheetSummary {
    /// The input archive.
    pub input: PathBuf,
    /// Name of the top-level worksheet directory, if one was found.
    pub worksheet_dir: Option<String>,
    /// Whether the conventional markup file is present.
    pub has_markup: bool,
    /// Number of files in the shared-data directory.
    pub shared_files: usize,
    /// Number of numbered cell directories.
    pub cells: usize,
    /// Number of files directly inside numbered cell directories.
    pub cell_files: usize,
    /// Total entries in the archive.
    pub entries: usize,
}
