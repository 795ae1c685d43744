//! Crate-level convenience error.
//!
//! Not a "god error": a thin wrapper over the canonical capability errors,
//! plus a retry classification the caller can act on.

use thiserror::Error;

use crate::archive::ArchiveError;
use crate::boxes::BoxError;
use crate::core::CoreError;
use crate::index::IndexError;

/// Whether retrying this operation may succeed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Transience {
    /// Retry will never help without changing inputs/state.
    Permanent,
    /// Retry may help (transient contention/outage).
    Retryable,
    /// Unknown if retry will help.
    Unknown,
}

impl Transience {
    pub fn is_retryable(self) -> bool {
        matches!(self, Transience::Retryable)
    }
}

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Box(#[from] BoxError),
}

impl Error {
    pub fn transience(&self) -> Transience {
        match self {
            Error::Core(e) => e.transience(),
            Error::Archive(e) => e.transience(),
            Error::Index(e) => e.transience(),
            Error::Box(e) => e.transience(),
        }
    }
}
