//! Input resolution: validate the archive path and sniff its format.
//!
//! Worksheet archives are tar containers compressed with bzip2 (the common
//! case) or gzip. Sniffing the magic bytes up front turns a
//! wrong-format input into a typed error naming the offending bytes,
//! instead of a confusing decoder failure halfway through extraction.

use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Sws2RstError;

/// Compression wrapping the tar stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Bzip2,
    Gzip,
}

/// A validated input archive.
#[derive(Debug)]
pub struct ResolvedInput {
    pub path: PathBuf,
    pub format: ArchiveFormat,
}

/// Validate that `path` exists, is readable, and starts with a known
/// container magic.
pub fn resolve_input(path: &Path) -> Result<ResolvedInput, Sws2RstError> {
    if !path.exists() {
        return Err(Sws2RstError::ArchiveNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut file = match std::fs::File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(Sws2RstError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(_) => {
            return Err(Sws2RstError::ArchiveNotFound {
                path: path.to_path_buf(),
            });
        }
    };

    let mut magic = [0u8; 3];
    if file.read_exact(&mut magic).is_err() {
        return Err(Sws2RstError::NotAWorksheetArchive {
            path: path.to_path_buf(),
            magic: [0; 3],
        });
    }

    let format = match magic {
        [b'B', b'Z', b'h'] => ArchiveFormat::Bzip2,
        [0x1f, 0x8b, _] => ArchiveFormat::Gzip,
        _ => {
            return Err(Sws2RstError::NotAWorksheetArchive {
                path: path.to_path_buf(),
                magic,
            });
        }
    };

    debug!("resolved {} as {:?}", path.display(), format);
    Ok(ResolvedInput {
        path: path.to_path_buf(),
        format,
    })
}
