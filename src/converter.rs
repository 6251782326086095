//! The markup-conversion seam.
//!
//! The pipeline never converts HTML itself; it hands the worksheet markup
//! and the media directory *name* to a [`MarkupConverter`] and writes back
//! whatever comes out. The contract the pipeline relies on is small: given
//! valid markup text and a directory name, return a reStructuredText
//! document in which every image reference points into that directory.
//!
//! Keeping the converter behind a trait object means the pipeline can be
//! tested with a stub, and callers can swap in their own renderer (or an
//! external tool) without touching extraction or relocation code. The
//! built-in default is [`crate::rst::RstRenderer`].

use thiserror::Error;

/// Converts worksheet markup into a reStructuredText document.
///
/// Implementations must be `Send + Sync` so a single converter can be shared
/// across batch runs via `Arc`.
pub trait MarkupConverter: Send + Sync {
    /// Convert `markup` (a UTF-8 HTML document) into reStructuredText.
    ///
    /// `media_dir` is the bare directory name (e.g. `"My_File_media"`), not
    /// a path; image references in the output must be rewritten to
    /// `<media_dir>/<file>` so they resolve relative to the written
    /// document.
    fn convert(&self, markup: &str, media_dir: &str) -> Result<String, ConvertError>;
}

/// Opaque failure from a [`MarkupConverter`].
///
/// Converters are black boxes to the pipeline; their failures carry only a
/// human-readable message.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ConvertError {
    message: String,
}

impl ConvertError {
    /// Create a conversion error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
