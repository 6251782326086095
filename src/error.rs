//! Error types for the sws2rst library.
//!
//! Every failure the pipeline can hit maps to one [`Sws2RstError`] variant:
//! archive open/extract problems, filesystem errors during relocation,
//! encoding errors reading the worksheet markup, converter failures, and
//! output-write failures. The batch driver reports the first error together
//! with the offending file and stops; there is no per-file recovery, so a
//! single error type is enough.
//!
//! Messages are written for the operator: they name the path involved and,
//! where it helps, what to do about it.

use std::path::PathBuf;
use thiserror::Error;

use crate::converter::ConvertError;

/// All errors returned by the sws2rst library.
#[derive(Debug, Error)]
pub enum Sws2RstError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("worksheet archive not found: '{path}'\nCheck the path exists and is readable.")]
    ArchiveNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("permission denied reading '{path}'")]
    PermissionDenied { path: PathBuf },

    /// The file exists but does not start with a known container magic.
    #[error(
        "'{path}' is not a worksheet archive (expected a bzip2 or gzip \
         compressed tar container)\nFirst bytes: {magic:?}"
    )]
    NotAWorksheetArchive { path: PathBuf, magic: [u8; 3] },

    /// The input file name has no usable stem to derive output names from.
    #[error("cannot derive an output name from '{path}'")]
    InvalidBaseName { path: PathBuf },

    // ── Extraction errors ─────────────────────────────────────────────────
    /// Could not create the scratch directory for extraction.
    #[error("failed to create scratch directory: {source}")]
    ScratchDirFailed {
        #[source]
        source: std::io::Error,
    },

    /// The tar stream was corrupt or could not be unpacked.
    #[error("failed to extract '{path}': {source}\nThe archive may be corrupt.")]
    ExtractFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The unpacked tree contains no worksheet markup file.
    #[error(
        "no worksheet found under '{dir}'\nExpected a top-level directory \
         containing '{expected}'."
    )]
    WorksheetMissing { dir: PathBuf, expected: &'static str },

    // ── Content errors ────────────────────────────────────────────────────
    /// The worksheet markup file is not valid UTF-8.
    #[error("worksheet markup '{path}' is not valid UTF-8")]
    MarkupNotUtf8 { path: PathBuf },

    /// A media file could not be moved or copied into the media directory.
    #[error("failed to relocate media file '{path}': {source}")]
    MediaRelocationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The markup converter rejected the document.
    #[error("conversion failed: {0}")]
    ConversionFailed(#[from] ConvertError),

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create the media directory or write the output document.
    #[error("failed to write output '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Batch errors ──────────────────────────────────────────────────────
    /// Two batch inputs normalize to the same base name and would overwrite
    /// each other's outputs.
    #[error(
        "inputs '{first}' and '{second}' both produce outputs named \
         '{base}.rst' / '{base}_media'\nRename one of them or run them in \
         separate batches."
    )]
    DuplicateBaseName {
        base: String,
        first: PathBuf,
        second: PathBuf,
    },
}
