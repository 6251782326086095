//! Configuration for worksheet conversion.
//!
//! All behaviour is controlled through [`ConversionConfig`], built via its
//! [`ConversionConfigBuilder`]. Defaults reproduce the conventional layout:
//! outputs land next to the input archive, the scratch tree goes under the
//! system temp directory, and conversion uses the built-in
//! [`crate::rst::RstRenderer`].

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::converter::MarkupConverter;
use crate::progress::ProgressCallback;

/// Configuration for converting worksheet archives.
///
/// # Example
/// ```rust
/// use sws2rst::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .output_dir("out")
///     .build();
/// ```
#[derive(Clone, Default)]
pub struct ConversionConfig {
    /// Directory receiving `<base>.rst` and `<base>_media/`.
    ///
    /// `None` (the default) writes them next to the input archive, so the
    /// document's relative links into the media directory hold wherever the
    /// pair is copied together.
    pub output_dir: Option<PathBuf>,

    /// Parent directory for per-run scratch trees.
    ///
    /// `None` uses the system temp directory. Each run gets its own scratch
    /// tree named after the input file; it is removed on every exit path,
    /// including failures.
    pub scratch_root: Option<PathBuf>,

    /// The markup converter. `None` uses [`crate::rst::RstRenderer`].
    ///
    /// Inject a stub here to test the pipeline without real conversion, or
    /// a custom renderer to change the output dialect entirely.
    pub converter: Option<Arc<dyn MarkupConverter>>,

    /// Batch progress events. `None` means no events are delivered.
    pub progress_callback: Option<ProgressCallback>,
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("output_dir", &self.output_dir)
            .field("scratch_root", &self.scratch_root)
            .field("converter", &self.converter.as_ref().map(|_| "<dyn MarkupConverter>"))
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn BatchProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug, Default)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = Some(dir.into());
        self
    }

    pub fn scratch_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.scratch_root = Some(dir.into());
        self
    }

    pub fn converter(mut self, converter: Arc<dyn MarkupConverter>) -> Self {
        self.config.converter = Some(converter);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration.
    ///
    /// There are no invalid combinations; missing fields fall back to the
    /// documented defaults at use time.
    pub fn build(self) -> ConversionConfig {
        self.config
    }
}
