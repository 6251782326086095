//! Conversion entry points: the per-file pipeline driver and the fail-fast
//! batch driver.
//!
//! [`convert_worksheet`] runs the whole pipeline for one archive and
//! returns a [`ConversionOutput`] describing the two artifacts it wrote.
//! [`convert_batch`] runs a list of archives strictly in order and stops at
//! the first failure; it returns a [`BatchReport`] value rather than
//! exiting, so the policy is unit-testable without spawning a process.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::config::ConversionConfig;
use crate::converter::MarkupConverter;
use crate::error::Sws2RstError;
use crate::output::{ConversionOutput, ConversionStats, WorksheetSummary};
use crate::pipeline::{extract, input, media, postprocess, worksheet};
use crate::rst::RstRenderer;

/// File extension of the written document.
pub const DOCUMENT_EXTENSION: &str = "rst";
/// Suffix appended to the base name to form the media directory name.
pub const MEDIA_DIR_SUFFIX: &str = "_media";

/// Convert one worksheet archive.
///
/// On success exactly two filesystem artifacts exist: `<base>.rst` and
/// `<base>_media/`, both in the output directory (the input's parent unless
/// overridden in `config`). The scratch tree used for extraction is removed
/// on every exit path, including failures.
///
/// An existing document of the same name is overwritten without warning;
/// an existing media directory is reused, so re-running on the same input
/// accumulates rather than fails.
pub fn convert_worksheet(
    input_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Sws2RstError> {
    let total_start = Instant::now();
    let input_path = input_path.as_ref();
    info!("converting {}", input_path.display());

    // ── Step 1: Resolve input ────────────────────────────────────────────
    let resolved = input::resolve_input(input_path)?;

    // ── Step 2: Derive output names ──────────────────────────────────────
    let names = OutputNames::derive(input_path, config)?;

    // ── Step 3: Extract into scratch ─────────────────────────────────────
    // The TempDir stays alive until this function returns; dropping it on
    // any path removes the scratch tree.
    let scratch = extract::unpack(&resolved, config.scratch_root.as_deref())?;
    let worksheet_dir = worksheet::locate(scratch.path())?;

    // ── Step 4: Media directory ──────────────────────────────────────────
    std::fs::create_dir_all(&names.media_dir).map_err(|e| Sws2RstError::OutputWriteFailed {
        path: names.media_dir.clone(),
        source: e,
    })?;

    // ── Step 5: Relocate media ───────────────────────────────────────────
    let media_stats = media::collect_media(&worksheet_dir, &names.media_dir)?;
    debug!(
        "media: {} moved, {} skipped, {} cell files copied",
        media_stats.shared_moved, media_stats.shared_skipped, media_stats.cell_copied
    );

    // ── Step 6: Read and convert the markup ──────────────────────────────
    let markup = worksheet::read_markup(&worksheet_dir)?;
    let converter = resolve_converter(config);
    let document = converter.convert(&markup, &names.media_dir_name)?;
    let document = postprocess::clean_document(&document);

    // ── Step 7: Write the document ───────────────────────────────────────
    std::fs::write(&names.document_path, &document).map_err(|e| {
        Sws2RstError::OutputWriteFailed {
            path: names.document_path.clone(),
            source: e,
        }
    })?;

    info!(
        "wrote {} and {}",
        names.document_path.display(),
        names.media_dir.display()
    );

    Ok(ConversionOutput {
        input: input_path.to_path_buf(),
        base_name: names.base,
        document_path: names.document_path,
        media_dir: names.media_dir,
        stats: ConversionStats {
            shared_files_moved: media_stats.shared_moved,
            shared_files_skipped: media_stats.shared_skipped,
            cell_files_copied: media_stats.cell_copied,
            document_bytes: document.len(),
            total_duration_ms: total_start.elapsed().as_millis() as u64,
        },
    })
}

/// Summarise an archive's worksheet layout without unpacking or writing
/// anything. Does not need a converter.
pub fn inspect(input_path: impl AsRef<Path>) -> Result<WorksheetSummary, Sws2RstError> {
    let resolved = input::resolve_input(input_path.as_ref())?;
    extract::scan(&resolved)
}

/// Derive the normalized base name for an input archive: file name with the
/// extension stripped and spaces replaced by underscores.
///
/// The base name deterministically derives both output names, so
/// `"My File.sws"` maps to `My_File.rst` and `My_File_media/`.
pub fn derive_base_name(input: &Path) -> Result<String, Sws2RstError> {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().replace(' ', "_"))
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Sws2RstError::InvalidBaseName {
            path: input.to_path_buf(),
        })
}

/// The three derived names of one run.
struct OutputNames {
    base: String,
    document_path: PathBuf,
    media_dir: PathBuf,
    /// Bare directory name handed to the converter for link rewriting.
    media_dir_name: String,
}

impl OutputNames {
    fn derive(input: &Path, config: &ConversionConfig) -> Result<Self, Sws2RstError> {
        let base = derive_base_name(input)?;
        let out_dir = match &config.output_dir {
            Some(dir) => dir.clone(),
            None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
        };
        let media_dir_name = format!("{base}{MEDIA_DIR_SUFFIX}");
        Ok(Self {
            document_path: out_dir.join(format!("{base}.{DOCUMENT_EXTENSION}")),
            media_dir: out_dir.join(&media_dir_name),
            media_dir_name,
            base,
        })
    }
}

fn resolve_converter(config: &ConversionConfig) -> Arc<dyn MarkupConverter> {
    config
        .converter
        .clone()
        .unwrap_or_else(|| Arc::new(RstRenderer))
}

// ── Batch driver ─────────────────────────────────────────────────────────

/// The file a batch stopped on, with its error.
#[derive(Debug)]
pub struct FailedFile {
    pub path: PathBuf,
    pub error: Sws2RstError,
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Reports for files converted before the batch stopped.
    pub completed: Vec<ConversionOutput>,
    /// Set when the batch stopped early; files after it were not attempted.
    pub failed: Option<FailedFile>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_none()
    }
}

/// Reject input lists in which two files normalize to the same base name.
///
/// Such files would silently overwrite each other's outputs; the batch
/// refuses them up front, before any file is processed.
pub fn check_distinct_outputs(inputs: &[PathBuf]) -> Result<(), Sws2RstError> {
    let mut seen: HashMap<String, &Path> = HashMap::new();
    for path in inputs {
        // Underivable names fail inside the pipeline with a better error.
        let Ok(base) = derive_base_name(path) else {
            continue;
        };
        if let Some(first) = seen.get(&base) {
            return Err(Sws2RstError::DuplicateBaseName {
                base,
                first: first.to_path_buf(),
                second: path.clone(),
            });
        }
        seen.insert(base, path);
    }
    Ok(())
}

/// Convert a list of archives strictly in order, stopping at the first
/// failure. Files after a failure are never attempted; no step is retried.
///
/// Progress events fire on the callback configured in `config`, in order
/// and never interleaved.
pub fn convert_batch(inputs: &[PathBuf], config: &ConversionConfig) -> BatchReport {
    let cb = config.progress_callback.clone();
    let total = inputs.len();
    let mut report = BatchReport::default();

    if let Some(cb) = &cb {
        cb.on_batch_start(total);
    }

    if let Err(error) = check_distinct_outputs(inputs) {
        let path = match &error {
            Sws2RstError::DuplicateBaseName { second, .. } => second.clone(),
            _ => PathBuf::new(),
        };
        if let Some(cb) = &cb {
            cb.on_file_error(&path, &error);
            cb.on_batch_complete(0, total);
        }
        report.failed = Some(FailedFile { path, error });
        return report;
    }

    for (index, path) in inputs.iter().enumerate() {
        if let Some(cb) = &cb {
            cb.on_file_start(path, index, total);
        }
        match convert_worksheet(path, config) {
            Ok(output) => {
                if let Some(cb) = &cb {
                    cb.on_file_complete(&output);
                }
                report.completed.push(output);
            }
            Err(error) => {
                if let Some(cb) = &cb {
                    cb.on_file_error(path, &error);
                }
                report.failed = Some(FailedFile {
                    path: path.clone(),
                    error,
                });
                break;
            }
        }
    }

    if let Some(cb) = &cb {
        cb.on_batch_complete(report.completed.len(), total);
    }
    report
}
