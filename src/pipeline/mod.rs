//! Pipeline stages for worksheet-archive conversion.
//!
//! Each submodule implements exactly one transformation step, run strictly
//! in sequence by [`crate::convert::convert_worksheet`]. Keeping stages
//! separate makes each independently testable.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ media ──▶ worksheet ──▶ (converter) ──▶ postprocess
//! (path)    (tar+bz2)   (relocate) (read html)   (seam)          (cleanup)
//! ```
//!
//! 1. [`input`]     — validate the archive path and sniff the container format
//! 2. [`extract`]   — unpack the tar stream into a scratch `TempDir`
//! 3. [`media`]     — move shared-data files and copy cell files into the
//!    flat media directory
//! 4. [`worksheet`] — locate and read the worksheet markup as UTF-8
//! 5. [`postprocess`] — deterministic cleanup of the converted document
//!
//! The conversion step itself lives behind [`crate::converter::MarkupConverter`]
//! and is not a stage here.

pub mod extract;
pub mod input;
pub mod media;
pub mod postprocess;
pub mod worksheet;
