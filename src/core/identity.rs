//! Identity atoms.
//!
//! BeadName: user-facing name, doubles as a filename component.
//! Kind: opaque identifier shared across versions of one computation.
//! ContentId: opaque hash uniquely identifying an archive's content.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::CoreError;

/// User-facing bead name, derived from the archive filename.
///
/// Must be usable as a path component: no separators, no relative-path
/// specials, no `__` (reserved so a single `_` can separate the name from
/// the freeze-time suffix unambiguously in basenames).
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BeadName(String);

impl BeadName {
    pub fn new(s: impl Into<String>) -> Result<Self, CoreError> {
        let s = s.into();
        let reject = |reason: &str| {
            Err(CoreError::Name {
                raw: s.clone(),
                reason: reason.to_string(),
            })
        };
        if s.is_empty() {
            return reject("empty");
        }
        if s == "." || s == ".." {
            return reject("relative path component");
        }
        if s.contains('/') || s.contains('\\') {
            return reject("contains a path separator");
        }
        if s.contains("__") {
            return reject("contains `__`");
        }
        if s.chars().any(|c| c.is_control()) {
            return reject("contains control characters");
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BeadName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BeadName({:?})", self.0)
    }
}

impl fmt::Display for BeadName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for BeadName {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, CoreError> {
        Self::new(s)
    }
}

impl From<BeadName> for String {
    fn from(name: BeadName) -> String {
        name.0
    }
}

/// Opaque kind identifier, shared across versions of the conceptually same
/// computation. UUID-shaped in practice, but any opaque token is accepted.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Kind(String);

impl Kind {
    pub fn new(s: impl Into<String>) -> Result<Self, CoreError> {
        let s = s.into();
        validate_token(&s).map_err(|reason| CoreError::Kind { raw: s.clone(), reason })?;
        Ok(Self(s))
    }

    /// Fresh kind for a brand-new computation.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Kind({:?})", self.0)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Kind {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, CoreError> {
        Self::new(s)
    }
}

impl From<Kind> for String {
    fn from(kind: Kind) -> String {
        kind.0
    }
}

/// Opaque content hash uniquely identifying an archive's content.
///
/// Computed elsewhere; this crate only carries it around and compares it.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentId(String);

impl ContentId {
    pub fn new(s: impl Into<String>) -> Result<Self, CoreError> {
        let s = s.into();
        validate_token(&s).map_err(|reason| CoreError::ContentId { raw: s.clone(), reason })?;
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentId({:?})", self.0)
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ContentId {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, CoreError> {
        Self::new(s)
    }
}

impl From<ContentId> for String {
    fn from(id: ContentId) -> String {
        id.0
    }
}

fn validate_token(s: &str) -> Result<(), String> {
    if s.is_empty() {
        return Err("empty".to_string());
    }
    if s.contains('/') {
        return Err("contains `/`".to_string());
    }
    if s.chars().any(|c| c.is_control()) {
        return Err("contains control characters".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bead_name_accepts_ordinary_names() {
        for ok in ["alpha", "bead-2015v3", "census_hu", "a"] {
            assert_eq!(BeadName::new(ok).unwrap().as_str(), ok);
        }
    }

    #[test]
    fn bead_name_rejects_path_specials() {
        for bad in ["", ".", "..", "a/b", "a\\b", "a__b", "a\nb"] {
            assert!(BeadName::new(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn generated_kinds_are_distinct() {
        assert_ne!(Kind::generate(), Kind::generate());
    }

    #[test]
    fn content_id_round_trips_through_serde() {
        let id = ContentId::new("c1").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"c1\"");
        let back: ContentId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn serde_rejects_invalid_values() {
        assert!(serde_json::from_str::<BeadName>("\"..\"").is_err());
        assert!(serde_json::from_str::<ContentId>("\"\"").is_err());
    }
}
