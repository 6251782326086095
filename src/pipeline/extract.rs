//! Archive extraction into a scratch directory, plus a no-unpack scan.
//!
//! The scratch tree is owned by a [`tempfile::TempDir`] named after the
//! input file. Ownership is the cleanup guarantee: whoever holds the
//! `TempDir` keeps the tree alive, and dropping it (normally, on error, or
//! during a panic unwind) removes it. There is no separate cleanup step to
//! forget.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tempfile::TempDir;
use tracing::debug;

use crate::error::Sws2RstError;
use crate::output::WorksheetSummary;
use crate::pipeline::input::{ArchiveFormat, ResolvedInput};
use crate::pipeline::worksheet::{CELLS_DIR, SHARED_DATA_DIR, WORKSHEET_FILE};

/// Wrap the archive file in the decoder matching its sniffed format.
fn open_decoder(input: &ResolvedInput) -> Result<Box<dyn Read>, Sws2RstError> {
    let file = File::open(&input.path).map_err(|e| Sws2RstError::ExtractFailed {
        path: input.path.clone(),
        source: e,
    })?;
    Ok(match input.format {
        ArchiveFormat::Bzip2 => Box::new(bzip2::read::BzDecoder::new(file)),
        ArchiveFormat::Gzip => Box::new(flate2::read::GzDecoder::new(file)),
    })
}

/// Unpack the archive into a fresh scratch directory and return its owner.
///
/// The directory is created under `scratch_root` (or the system temp dir)
/// with the unmodified input file name as prefix, so concurrent runs on
/// different inputs never share scratch space.
pub fn unpack(input: &ResolvedInput, scratch_root: Option<&Path>) -> Result<TempDir, Sws2RstError> {
    let file_name = input
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "worksheet".to_string());

    let prefix = format!("{file_name}.");
    let mut builder = tempfile::Builder::new();
    builder.prefix(&prefix);

    let scratch = match scratch_root {
        Some(root) => {
            std::fs::create_dir_all(root)
                .map_err(|e| Sws2RstError::ScratchDirFailed { source: e })?;
            builder
                .tempdir_in(root)
                .map_err(|e| Sws2RstError::ScratchDirFailed { source: e })?
        }
        None => builder
            .tempdir()
            .map_err(|e| Sws2RstError::ScratchDirFailed { source: e })?,
    };

    let mut archive = tar::Archive::new(open_decoder(input)?);
    archive
        .unpack(scratch.path())
        .map_err(|e| Sws2RstError::ExtractFailed {
            path: input.path.clone(),
            source: e,
        })?;

    debug!(
        "extracted {} into {}",
        input.path.display(),
        scratch.path().display()
    );
    Ok(scratch)
}

/// Walk the archive's entry list without unpacking and summarise the
/// worksheet layout.
pub fn scan(input: &ResolvedInput) -> Result<WorksheetSummary, Sws2RstError> {
    let mut archive = tar::Archive::new(open_decoder(input)?);

    let mut summary = WorksheetSummary {
        input: input.path.clone(),
        worksheet_dir: None,
        has_markup: false,
        shared_files: 0,
        cells: 0,
        cell_files: 0,
        entries: 0,
    };
    let mut cell_ids: BTreeSet<u64> = BTreeSet::new();

    let entries = archive.entries().map_err(|e| Sws2RstError::ExtractFailed {
        path: input.path.clone(),
        source: e,
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| Sws2RstError::ExtractFailed {
            path: input.path.clone(),
            source: e,
        })?;
        summary.entries += 1;

        let path = match entry.path() {
            Ok(p) => p.into_owned(),
            Err(_) => continue,
        };
        let comps: Vec<String> = path
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .filter(|c| c != ".")
            .collect();

        let is_file = entry.header().entry_type().is_file();

        if comps.len() == 2 && comps[1] == WORKSHEET_FILE && is_file {
            summary.worksheet_dir = Some(comps[0].clone());
            summary.has_markup = true;
        } else if comps.len() == 3 && comps[1] == SHARED_DATA_DIR && is_file {
            summary.shared_files += 1;
        } else if comps.len() >= 3 && comps[1] == CELLS_DIR {
            if let Ok(id) = comps[2].parse::<u64>() {
                cell_ids.insert(id);
                if comps.len() == 4 && is_file {
                    summary.cell_files += 1;
                }
            }
        }
    }

    summary.cells = cell_ids.len();
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::input::resolve_input;
    use std::io::Write;
    use std::path::PathBuf;

    /// Build a bzip2-compressed tar archive from `(path, contents)` pairs.
    fn build_archive(dir: &Path, name: &str, files: &[(&str, &[u8])]) -> PathBuf {
        let archive_path = dir.join(name);
        let encoder = bzip2::write::BzEncoder::new(
            File::create(&archive_path).unwrap(),
            bzip2::Compression::default(),
        );
        let mut builder = tar::Builder::new(encoder);
        for (path, contents) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(contents.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, path, *contents).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
        archive_path
    }

    #[test]
    fn unpack_creates_and_owns_scratch_tree() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = build_archive(
            tmp.path(),
            "ws.sws",
            &[("worksheet/worksheet.html", b"<p>hi</p>" as &[u8])],
        );
        let resolved = resolve_input(&archive).unwrap();

        let scratch = unpack(&resolved, Some(tmp.path())).unwrap();
        let scratch_path = scratch.path().to_path_buf();
        assert!(scratch_path.join("worksheet/worksheet.html").is_file());

        drop(scratch);
        assert!(!scratch_path.exists(), "scratch tree must vanish on drop");
    }

    #[test]
    fn unpack_rejects_corrupt_stream() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bad.sws");
        // Valid bzip2 magic, garbage after it.
        std::fs::write(&path, b"BZh91AY&SY garbage garbage").unwrap();
        let resolved = resolve_input(&path).unwrap();
        let err = unpack(&resolved, Some(tmp.path())).unwrap_err();
        assert!(matches!(err, Sws2RstError::ExtractFailed { .. }));
    }

    #[test]
    fn scan_summarises_layout() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = build_archive(
            tmp.path(),
            "ws.sws",
            &[
                ("worksheet/worksheet.html", b"<p>hi</p>" as &[u8]),
                ("worksheet/data/a.png", b"a" as &[u8]),
                ("worksheet/data/b.png", b"b" as &[u8]),
                ("worksheet/cells/3/out.png", b"c" as &[u8]),
                ("worksheet/cells/5/out.png", b"d" as &[u8]),
            ],
        );
        let resolved = resolve_input(&archive).unwrap();
        let summary = scan(&resolved).unwrap();

        assert_eq!(summary.worksheet_dir.as_deref(), Some("worksheet"));
        assert!(summary.has_markup);
        assert_eq!(summary.shared_files, 2);
        assert_eq!(summary.cells, 2);
        assert_eq!(summary.cell_files, 2);
        assert_eq!(summary.entries, 5);
    }
}
