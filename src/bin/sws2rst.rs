//! CLI binary for sws2rst.
//!
//! A thin shim over the library crate: maps flags to `ConversionConfig`,
//! runs the batch, prints results, and turns the batch outcome into an
//! exit status. All conversion policy lives in the library.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use sws2rst::{
    convert_batch, inspect, BatchProgressCallback, ConversionConfig, ConversionOutput,
    Sws2RstError, WorksheetSummary,
};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback ────────────────────────────────────────────────────

/// Prints a progress line before each file and the two output paths after
/// it. The batch is strictly sequential, so plain prints stay in order.
struct CliProgress;

impl BatchProgressCallback for CliProgress {
    fn on_file_start(&self, path: &std::path::Path, index: usize, total: usize) {
        println!(
            "Processing {} ({}/{})",
            bold(&format!("'{}'", path.display())),
            index + 1,
            total
        );
    }

    fn on_file_complete(&self, output: &ConversionOutput) {
        println!("  {} Document: {}", green("✓"), output.document_path.display());
        println!("  {} Media:    {}/", green("✓"), output.media_dir.display());
    }
}

const PUBLISH_GUIDE: &str = r#"Publishing the converted worksheet

Each run produces a pair of artifacts that must travel together:

    <base>.rst          the reStructuredText document
    <base>_media/       the images it references (relative links)

To publish one worksheet, any reStructuredText processor works directly:

    rst2html5 <base>.rst > <base>.html

To publish a collection as a browsable project, create a documentation
project (for example with sphinx-quickstart), copy every <base>.rst and its
<base>_media/ directory into the source tree, list the documents in the
project's table of contents, and build:

    sphinx-quickstart docs
    cp My_File.rst docs/source/
    cp -r My_File_media docs/source/
    # add 'My_File' to the toctree in docs/source/index.rst
    sphinx-build -M html docs/source docs/build

Nothing in the generated documents is specific to one processor; the image
references are plain relative paths into the media directory.
"#;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert one worksheet (outputs land next to the input)
  sws2rst "My File.sws"

  # Convert several; the batch stops at the first failure
  sws2rst a.sws b.sws c.sws

  # Collect outputs in a separate directory
  sws2rst -o out/ lecture.sws

  # Show what an archive contains without converting it
  sws2rst --inspect-only lecture.sws

  # Machine-readable conversion reports
  sws2rst --json a.sws b.sws

  # Notes on publishing the generated documents
  sws2rst --publish-guide

OUTPUTS:
  For input "My File.sws" the outputs are "My_File.rst" and "My_File_media/"
  (base name: extension stripped, spaces replaced by underscores). An
  existing document of the same name is overwritten; an existing media
  directory is reused.

EXIT STATUS:
  0  all inputs converted (or an informational flag was used)
  1  no inputs given, or the batch stopped on a failure
"#;

/// Convert worksheet archives (.sws) to reStructuredText plus a media directory.
#[derive(Parser, Debug)]
#[command(
    name = "sws2rst",
    version,
    about = "Convert worksheet archives (.sws) to reStructuredText plus a media directory",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Worksheet archives to convert, processed in order.
    inputs: Vec<PathBuf>,

    /// Write <base>.rst and <base>_media/ into this directory instead of
    /// next to each input.
    #[arg(short, long, env = "SWS2RST_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Parent directory for scratch trees (default: system temp dir).
    #[arg(long, env = "SWS2RST_SCRATCH_DIR")]
    scratch_dir: Option<PathBuf>,

    /// Print archive layout summaries instead of converting.
    #[arg(long)]
    inspect_only: bool,

    /// Print structured JSON reports instead of progress lines.
    #[arg(long)]
    json: bool,

    /// Print notes on publishing the generated documents, then exit.
    #[arg(long)]
    publish_guide: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "SWS2RST_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "SWS2RST_QUIET")]
    quiet: bool,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e:#}", red("error:"));
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Progress lines carry the user-facing feedback; library logs default
    // to warnings so the two don't interleave.
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    // ── Informational flag: print and exit, no processing ────────────────
    if cli.publish_guide {
        print!("{PUBLISH_GUIDE}");
        return Ok(ExitCode::SUCCESS);
    }

    // ── Usage on empty input list ────────────────────────────────────────
    if cli.inputs.is_empty() {
        Cli::command()
            .print_help()
            .context("failed to print usage")?;
        return Ok(ExitCode::FAILURE);
    }

    if cli.inspect_only {
        return run_inspect(&cli);
    }
    run_convert(&cli)
}

/// Inspect each archive without converting; first failure stops the run.
fn run_inspect(cli: &Cli) -> Result<ExitCode> {
    let mut summaries: Vec<WorksheetSummary> = Vec::new();
    for path in &cli.inputs {
        match inspect(path) {
            Ok(summary) => summaries.push(summary),
            Err(e) => {
                report_failure(path, &e);
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summaries).context("failed to serialise summaries")?
        );
    } else {
        for s in &summaries {
            println!("File:          {}", s.input.display());
            println!(
                "Worksheet dir: {}",
                s.worksheet_dir.as_deref().unwrap_or("(none)")
            );
            println!("Markup:        {}", if s.has_markup { "present" } else { "MISSING" });
            println!("Shared files:  {}", s.shared_files);
            println!("Cells:         {}", s.cells);
            println!("Cell files:    {}", s.cell_files);
            println!("Entries:       {}", s.entries);
            println!();
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn run_convert(cli: &Cli) -> Result<ExitCode> {
    let mut builder = ConversionConfig::builder();
    if let Some(dir) = &cli.output_dir {
        builder = builder.output_dir(dir);
    }
    if let Some(dir) = &cli.scratch_dir {
        builder = builder.scratch_root(dir);
    }
    let show_progress = !cli.quiet && !cli.json;
    if show_progress {
        builder = builder.progress_callback(Arc::new(CliProgress));
    }
    let config = builder.build();

    let report = convert_batch(&cli.inputs, &config);

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report.completed)
                .context("failed to serialise reports")?
        );
    }

    match &report.failed {
        Some(failed) => {
            report_failure(&failed.path, &failed.error);
            Ok(ExitCode::FAILURE)
        }
        None => Ok(ExitCode::SUCCESS)
    }
}

/// Diagnostic for the file the batch stopped on: file name plus error text.
fn report_failure(path: &std::path::Path, error: &Sws2RstError) {
    eprintln!(
        "{} failed on {}: {error}",
        red("✗"),
        bold(&format!("'{}'", path.display()))
    );
}
