//! Media relocation: flatten worksheet images into the media directory.
//!
//! Two sources feed the flat media directory, with different semantics:
//!
//! * **Shared data** (`data/`) is *moved*. Destination names are the source
//!   names with spaces replaced by underscores. A name collision means the
//!   file is dropped silently: first write wins, the existing file is never
//!   overwritten.
//! * **Cell output** (`cells/<id>/`) is *copied*, and prefixed as
//!   `cell_<id>_<name>`. Distinct cells cannot collide by construction, and
//!   the prefix keeps cell files disjoint from shared-data names.
//!
//! Entries that are not regular files (nested viewer directories inside a
//! cell, subdirectories of `data/`) are skipped silently.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::Sws2RstError;
use crate::pipeline::worksheet::{CELLS_DIR, SHARED_DATA_DIR};

/// Relocation counters for one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MediaStats {
    pub shared_moved: usize,
    pub shared_skipped: usize,
    pub cell_copied: usize,
}

/// Relocate all media from `worksheet_dir` into `media_dir`.
///
/// Both the shared-data directory and the cell tree are optional; their
/// absence is not an error. `media_dir` must already exist.
pub fn collect_media(worksheet_dir: &Path, media_dir: &Path) -> Result<MediaStats, Sws2RstError> {
    let mut stats = MediaStats::default();
    relocate_shared(&worksheet_dir.join(SHARED_DATA_DIR), media_dir, &mut stats)?;
    copy_cells(&worksheet_dir.join(CELLS_DIR), media_dir, &mut stats)?;
    Ok(stats)
}

fn relocate_shared(
    data_dir: &Path,
    media_dir: &Path,
    stats: &mut MediaStats,
) -> Result<(), Sws2RstError> {
    if !data_dir.is_dir() {
        return Ok(());
    }

    for entry in read_dir(data_dir)? {
        let src = entry.path();
        if !src.is_file() {
            continue;
        }
        let Some(name) = src.file_name().map(|n| n.to_string_lossy().replace(' ', "_")) else {
            continue;
        };
        let dest = media_dir.join(&name);
        if dest.exists() {
            // First mover wins; the duplicate is dropped, not overwritten.
            debug!("skipping duplicate media file {name}");
            stats.shared_skipped += 1;
            continue;
        }
        move_file(&src, &dest).map_err(|e| Sws2RstError::MediaRelocationFailed {
            path: src.clone(),
            source: e,
        })?;
        stats.shared_moved += 1;
    }
    Ok(())
}

fn copy_cells(cells_dir: &Path, media_dir: &Path, stats: &mut MediaStats) -> Result<(), Sws2RstError> {
    if !cells_dir.is_dir() {
        return Ok(());
    }

    // Numeric cell ids, processed in order for deterministic logs.
    let mut cells: Vec<(u64, std::path::PathBuf)> = read_dir(cells_dir)?
        .into_iter()
        .filter(|e| e.path().is_dir())
        .filter_map(|e| {
            let id = e.file_name().to_string_lossy().parse::<u64>().ok()?;
            Some((id, e.path()))
        })
        .collect();
    cells.sort_by_key(|(id, _)| *id);

    for (id, cell_dir) in cells {
        for entry in read_dir(&cell_dir)? {
            let src = entry.path();
            let file_type = entry.file_type().map_err(|e| Sws2RstError::MediaRelocationFailed {
                path: src.clone(),
                source: e,
            })?;
            if !file_type.is_file() {
                // Nested directories (e.g. interactive viewer bundles) are
                // not relocated.
                warn!("ignoring non-file entry in cell {id}: {}", src.display());
                continue;
            }
            let Some(name) = src.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                continue;
            };
            let dest = media_dir.join(format!("cell_{id}_{name}"));
            fs::copy(&src, &dest).map_err(|e| Sws2RstError::MediaRelocationFailed {
                path: src.clone(),
                source: e,
            })?;
            stats.cell_copied += 1;
        }
    }
    Ok(())
}

fn read_dir(dir: &Path) -> Result<Vec<fs::DirEntry>, Sws2RstError> {
    let iter = fs::read_dir(dir).map_err(|e| Sws2RstError::MediaRelocationFailed {
        path: dir.to_path_buf(),
        source: e,
    })?;
    Ok(iter.flatten().collect())
}

/// Move a file, falling back to copy+remove when `rename` crosses a
/// filesystem boundary (the scratch tree often lives on tmpfs while the
/// media directory does not).
fn move_file(src: &Path, dest: &Path) -> std::io::Result<()> {
    match fs::rename(src, dest) {
        Ok(()) => Ok(()),
        Err(_) => {
            fs::copy(src, dest)?;
            fs::remove_file(src)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    struct Fixture {
        _tmp: tempfile::TempDir,
        worksheet: PathBuf,
        media: PathBuf,
    }

    fn fixture() -> Fixture {
        let tmp = tempfile::tempdir().unwrap();
        let worksheet = tmp.path().join("worksheet");
        let media = tmp.path().join("out_media");
        fs::create_dir_all(&worksheet).unwrap();
        fs::create_dir_all(&media).unwrap();
        Fixture {
            _tmp: tmp,
            worksheet,
            media,
        }
    }

    #[test]
    fn moves_shared_files_and_normalizes_spaces() {
        let fx = fixture();
        let data = fx.worksheet.join(SHARED_DATA_DIR);
        fs::create_dir(&data).unwrap();
        fs::write(data.join("my plot.png"), b"png").unwrap();

        let stats = collect_media(&fx.worksheet, &fx.media).unwrap();

        assert_eq!(stats.shared_moved, 1);
        assert!(fx.media.join("my_plot.png").is_file());
        assert!(!data.join("my plot.png").exists(), "source must be moved");
    }

    #[test]
    fn shared_collision_keeps_first_file() {
        let fx = fixture();
        let data = fx.worksheet.join(SHARED_DATA_DIR);
        fs::create_dir(&data).unwrap();
        fs::write(data.join("logo.png"), b"new").unwrap();
        fs::write(fx.media.join("logo.png"), b"old").unwrap();

        let stats = collect_media(&fx.worksheet, &fx.media).unwrap();

        assert_eq!(stats.shared_moved, 0);
        assert_eq!(stats.shared_skipped, 1);
        assert_eq!(fs::read(fx.media.join("logo.png")).unwrap(), b"old");
    }

    #[test]
    fn copies_cell_files_with_prefix() {
        let fx = fixture();
        let cell = fx.worksheet.join(CELLS_DIR).join("4");
        fs::create_dir_all(&cell).unwrap();
        fs::write(cell.join("sage0.png"), b"img").unwrap();

        let stats = collect_media(&fx.worksheet, &fx.media).unwrap();

        assert_eq!(stats.cell_copied, 1);
        assert!(fx.media.join("cell_4_sage0.png").is_file());
        assert!(cell.join("sage0.png").is_file(), "cell source must remain");
    }

    #[test]
    fn cell_files_never_collide_with_shared_names() {
        let fx = fixture();
        let data = fx.worksheet.join(SHARED_DATA_DIR);
        let cell = fx.worksheet.join(CELLS_DIR).join("1");
        fs::create_dir(&data).unwrap();
        fs::create_dir_all(&cell).unwrap();
        fs::write(data.join("out.png"), b"shared").unwrap();
        fs::write(cell.join("out.png"), b"cell").unwrap();

        let stats = collect_media(&fx.worksheet, &fx.media).unwrap();

        assert_eq!(stats.shared_moved, 1);
        assert_eq!(stats.cell_copied, 1);
        assert_eq!(fs::read(fx.media.join("out.png")).unwrap(), b"shared");
        assert_eq!(fs::read(fx.media.join("cell_1_out.png")).unwrap(), b"cell");
    }

    #[test]
    fn skips_non_numeric_cell_dirs_and_nested_entries() {
        let fx = fixture();
        let cells = fx.worksheet.join(CELLS_DIR);
        fs::create_dir_all(cells.join("7/viewer")).unwrap();
        fs::create_dir_all(cells.join("stale")).unwrap();
        fs::write(cells.join("7/ok.png"), b"x").unwrap();
        fs::write(cells.join("7/viewer/inner.png"), b"y").unwrap();
        fs::write(cells.join("stale/ignored.png"), b"z").unwrap();

        let stats = collect_media(&fx.worksheet, &fx.media).unwrap();

        assert_eq!(stats.cell_copied, 1);
        assert!(fx.media.join("cell_7_ok.png").is_file());
        assert!(!fx.media.join("cell_7_inner.png").exists());
    }

    #[test]
    fn absent_directories_are_fine() {
        let fx = fixture();
        let stats = collect_media(&fx.worksheet, &fx.media).unwrap();
        assert_eq!(stats, MediaStats::default());
    }
}
