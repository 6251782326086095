//! # sws2rst
//!
//! Convert worksheet archives (`.sws`) to reStructuredText plus a flat
//! media directory.
//!
//! A worksheet archive is a bzip2- (or gzip-) compressed tar container
//! holding an HTML rendering of the worksheet, an optional shared-data
//! directory, and an optional per-cell tree of generated images. This crate
//! unpacks the container, flattens the embedded media into
//! `<base>_media/`, converts the markup, and writes `<base>.rst` next to
//! the input.
//!
//! ## Pipeline Overview
//!
//! ```text
//! archive.sws
//!  │
//!  ├─ 1. Input      validate path, sniff bzip2/gzip magic
//!  ├─ 2. Extract    unpack the tar stream into a scratch TempDir
//!  ├─ 3. Media      move data/ files, copy cells/<id>/ files (flat, renamed)
//!  ├─ 4. Read       worksheet.html as strict UTF-8
//!  ├─ 5. Convert    MarkupConverter seam (default: built-in RstRenderer)
//!  ├─ 6. Polish     deterministic text cleanup
//!  └─ 7. Output     <base>.rst + <base>_media/, scratch tree removed
//! ```
//!
//! The pipeline is strictly sequential and blocking; there is nothing
//! concurrent about unpacking one local archive.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sws2rst::{convert_worksheet, ConversionConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let output = convert_worksheet("My File.sws", &ConversionConfig::default())?;
//!     println!("{}", output.document_path.display());
//!     println!("{}", output.media_dir.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Swapping the converter
//!
//! The markup conversion step is a trait object ([`MarkupConverter`]); the
//! pipeline only relies on its contract: markup text in, reStructuredText
//! with image links rewritten into the media directory out. Tests inject
//! stubs; callers can inject their own renderer.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `sws2rst` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod converter;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod rst;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder};
pub use convert::{
    check_distinct_outputs, convert_batch, convert_worksheet, derive_base_name, inspect,
    BatchReport, FailedFile, DOCUMENT_EXTENSION, MEDIA_DIR_SUFFIX,
};
pub use converter::{ConvertError, MarkupConverter};
pub use error::Sws2RstError;
pub use output::{ConversionOutput, ConversionStats, WorksheetSummary};
pub use progress::{BatchProgressCallback, NoopProgressCallback, ProgressCallback};
pub use rst::RstRenderer;
