//! Bead archive container.
//!
//! An archive is a zstd-compressed tar file with a fixed internal layout:
//!
//! ```text
//! meta/bead.json    metadata document (required, written first)
//! data/**           output payload files
//! code/**           source files
//! ```
//!
//! Basenames encode identity as `<name>_<freeze_time>.bead`.

mod filename;
mod meta;
mod reader;
mod writer;

use std::path::PathBuf;

use thiserror::Error;

pub use filename::{archive_basename, is_archive_path, name_from_path};
pub use meta::{ArchiveMeta, InputRef, META_VERSION};
pub use reader::BeadArchive;
pub use writer::ArchiveWriter;

/// Extension of bead archive files, without the dot.
pub const ARCHIVE_EXT: &str = "bead";

/// Tar entry holding the metadata document.
pub const META_ENTRY: &str = "meta/bead.json";

/// Tar entry prefix for output payload files.
pub const DATA_PREFIX: &str = "data";

/// Tar entry prefix for source files.
pub const CODE_PREFIX: &str = "code";

/// Failure scoped to a single archive file. One bad archive never aborts a
/// directory-wide rebuild; callers skip it and continue.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ArchiveError {
    #[error("cannot read archive at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path:?} is not a bead archive: {reason}")]
    NotAnArchive { path: PathBuf, reason: String },
    #[error("archive {path:?} has no {META_ENTRY} entry")]
    MissingMeta { path: PathBuf },
    #[error("archive {path:?} metadata is malformed: {source}")]
    Meta {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("archive {path:?} has meta version `{got}`, expected `{META_VERSION}`")]
    MetaVersion { path: PathBuf, got: String },
    #[error("archive {path:?} entry `{entry}` escapes the extraction root")]
    UnsafeEntry { path: PathBuf, entry: String },
}

impl ArchiveError {
    pub fn transience(&self) -> crate::error::Transience {
        match self {
            ArchiveError::Io { .. } => crate::error::Transience::Unknown,
            _ => crate::error::Transience::Permanent,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ArchiveError::Io {
            path: path.into(),
            source,
        }
    }
}
