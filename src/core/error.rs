//! Domain validation errors.
//!
//! These are bounded and stable: they represent refused input, not
//! library implementation details.

use thiserror::Error;

use crate::error::Transience;

/// Canonical error enum for the core data model.
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum CoreError {
    #[error("bead name `{raw}` is invalid: {reason}")]
    Name { raw: String, reason: String },
    #[error("kind `{raw}` is invalid: {reason}")]
    Kind { raw: String, reason: String },
    #[error("content id `{raw}` is invalid: {reason}")]
    ContentId { raw: String, reason: String },
    #[error("freeze time `{raw}` is invalid: {reason}")]
    FreezeTime { raw: String, reason: String },
}

impl CoreError {
    pub fn transience(&self) -> Transience {
        // Pure input failures.
        Transience::Permanent
    }
}
