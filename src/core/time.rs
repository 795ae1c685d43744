//! Freeze timestamps.
//!
//! One canonical form everywhere: `YYYYMMDDTHHMMSSffffffZ` - 22 characters,
//! microsecond precision, UTC only. Fixed width means lexicographic order
//! over the canonical strings equals chronological order, which is what the
//! index relies on for its range conditions over `freeze_time_str`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::PrimitiveDateTime;

use super::error::CoreError;

const CANONICAL: &[BorrowedFormatItem<'static>] =
    format_description!("[year][month][day]T[hour][minute][second][subsecond digits:6]Z");

const CANONICAL_LEN: usize = 22;

/// Timestamp captured when a bead was frozen.
///
/// Stores the canonical string; construction validates it. Ordering is the
/// string ordering, which the fixed-width form makes chronological.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FreezeTime(String);

impl FreezeTime {
    /// Parse the canonical form. Anything else is refused, including
    /// offsets other than `Z` and non-fixed-width fields.
    pub fn parse(s: impl Into<String>) -> Result<Self, CoreError> {
        let s = s.into();
        if s.len() != CANONICAL_LEN {
            return Err(CoreError::FreezeTime {
                raw: s.clone(),
                reason: format!("expected {CANONICAL_LEN} characters, got {}", s.len()),
            });
        }
        PrimitiveDateTime::parse(&s, CANONICAL).map_err(|err| CoreError::FreezeTime {
            raw: s.clone(),
            reason: err.to_string(),
        })?;
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for FreezeTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FreezeTime({})", self.0)
    }
}

impl fmt::Display for FreezeTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FreezeTime {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, CoreError> {
        Self::parse(s)
    }
}

impl TryFrom<String> for FreezeTime {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, CoreError> {
        Self::parse(s)
    }
}

impl From<FreezeTime> for String {
    fn from(t: FreezeTime) -> String {
        t.0
    }
}
