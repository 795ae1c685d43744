#![forbid(unsafe_code)]

//! Box storage for frozen computations.
//!
//! A *bead* is a discrete computation captured as `output = function(inputs)`
//! and frozen into a single archive file. A *box* is a directory of such
//! archives, fronted by an authoritative SQLite index that answers
//! structured queries, tracks input dependencies, and resolves lightweight
//! [`BeadRecord`]s to openable [`BeadArchive`]s.

pub mod archive;
pub mod boxes;
pub mod core;
pub mod error;
pub mod index;
pub mod search;

pub use error::{Error, Transience};
pub type Result<T> = std::result::Result<T, Error>;

// Re-export the working set at the crate root for convenience.
pub use crate::archive::{
    archive_basename, ArchiveError, ArchiveMeta, ArchiveWriter, BeadArchive, InputRef,
    ARCHIVE_EXT,
};
pub use crate::boxes::{BeadBox, BoxError};
pub use crate::core::{BeadName, BeadRecord, ContentId, CoreError, FreezeTime, InputSpec, Kind};
pub use crate::index::{
    BoxIndex, Condition, IndexConfig, IndexError, InputLoading, JournalMode, INDEX_FILE,
};
pub use crate::search::{search_boxes, BeadSearch};
