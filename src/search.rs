//! Fluent bead search over one box or an ordered list of boxes.
//!
//! One builder, parameterized by scope; the multi-box variant preserves box
//! order as the primary ordering for `first`, while `newest`/`oldest` rank
//! the whole union by freeze time.

use std::cmp::Ordering;
use std::collections::HashSet;

use tracing::warn;

use crate::boxes::{BeadBox, BoxError};
use crate::core::{BeadName, BeadRecord, ContentId, FreezeTime, Kind};
use crate::index::Condition;

#[derive(Clone, Copy)]
enum Scope<'a> {
    Single(&'a BeadBox),
    Many(&'a [BeadBox]),
}

/// Accumulates conditions, then drives the bound box(es) on a terminator.
pub struct BeadSearch<'a> {
    scope: Scope<'a>,
    conditions: Vec<Condition>,
    unique: bool,
}

/// Search an ordered list of boxes.
pub fn search_boxes<'a>(boxes: &'a [BeadBox]) -> BeadSearch<'a> {
    BeadSearch {
        scope: Scope::Many(boxes),
        conditions: Vec::new(),
        unique: false,
    }
}

impl<'a> BeadSearch<'a> {
    pub(crate) fn single(bead_box: &'a BeadBox) -> Self {
        Self {
            scope: Scope::Single(bead_box),
            conditions: Vec::new(),
            unique: false,
        }
    }

    pub fn by_name(mut self, name: BeadName) -> Self {
        self.conditions.push(Condition::ByName(name));
        self
    }

    pub fn by_kind(mut self, kind: Kind) -> Self {
        self.conditions.push(Condition::ByKind(kind));
        self
    }

    pub fn by_content_id(mut self, content_id: ContentId) -> Self {
        self.conditions.push(Condition::ByContentId(content_id));
        self
    }

    pub fn at_time(mut self, timestamp: FreezeTime) -> Self {
        self.conditions.push(Condition::AtTime(timestamp));
        self
    }

    pub fn newer_than(mut self, timestamp: FreezeTime) -> Self {
        self.conditions.push(Condition::NewerThan(timestamp));
        self
    }

    pub fn older_than(mut self, timestamp: FreezeTime) -> Self {
        self.conditions.push(Condition::OlderThan(timestamp));
        self
    }

    pub fn at_or_newer(mut self, timestamp: FreezeTime) -> Self {
        self.conditions.push(Condition::AtOrNewer(timestamp));
        self
    }

    pub fn at_or_older(mut self, timestamp: FreezeTime) -> Self {
        self.conditions.push(Condition::AtOrOlder(timestamp));
        self
    }

    /// Keep one record per content id (first occurrence wins).
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// All matches, box order first, freeze-time order within a box.
    pub fn all(self) -> Result<Vec<BeadRecord>, BoxError> {
        self.gather()
    }

    /// Any match. Box order is the primary key; a box that fails to answer
    /// is skipped.
    pub fn first(self) -> Result<Option<BeadRecord>, BoxError> {
        match self.scope {
            Scope::Single(bead_box) => {
                Ok(bead_box.get_beads(&self.conditions)?.into_iter().next())
            }
            Scope::Many(boxes) => {
                for bead_box in boxes {
                    match bead_box.get_beads(&self.conditions) {
                        Ok(records) => {
                            if let Some(record) = records.into_iter().next() {
                                return Ok(Some(record));
                            }
                        }
                        Err(err) => {
                            warn!(box_name = %bead_box.name(), error = %err,
                                "skipping box during search");
                        }
                    }
                }
                Ok(None)
            }
        }
    }

    /// Latest freeze time across the union; ties go to the ascending
    /// content id.
    pub fn newest(self) -> Result<Option<BeadRecord>, BoxError> {
        Ok(self.gather()?.into_iter().max_by(newest_preference))
    }

    /// Earliest freeze time across the union; same tie-breaker.
    pub fn oldest(self) -> Result<Option<BeadRecord>, BoxError> {
        Ok(self.gather()?.into_iter().min_by(oldest_preference))
    }

    pub fn exists(self) -> Result<bool, BoxError> {
        Ok(self.first()?.is_some())
    }

    fn gather(&self) -> Result<Vec<BeadRecord>, BoxError> {
        let mut records = Vec::new();
        match self.scope {
            Scope::Single(bead_box) => records = bead_box.get_beads(&self.conditions)?,
            Scope::Many(boxes) => {
                for bead_box in boxes {
                    records.extend(bead_box.get_beads(&self.conditions)?);
                }
            }
        }
        if self.unique {
            let mut seen: HashSet<ContentId> = HashSet::new();
            records.retain(|record| seen.insert(record.content_id.clone()));
        }
        Ok(records)
    }
}

/// `Greater` means "more preferred by `newest`": later freeze time, then
/// smaller content id.
fn newest_preference(a: &BeadRecord, b: &BeadRecord) -> Ordering {
    a.freeze_time
        .cmp(&b.freeze_time)
        .then_with(|| b.content_id.cmp(&a.content_id))
}

/// `Less` means "more preferred by `oldest`": earlier freeze time, then
/// smaller content id.
fn oldest_preference(a: &BeadRecord, b: &BeadRecord) -> Ordering {
    a.freeze_time
        .cmp(&b.freeze_time)
        .then_with(|| a.content_id.cmp(&b.content_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BeadName, Kind};

    fn record(content_id: &str, freeze: &str) -> BeadRecord {
        BeadRecord {
            box_name: "b".to_string(),
            name: BeadName::new("alpha").unwrap(),
            kind: Kind::new("k").unwrap(),
            content_id: ContentId::new(content_id).unwrap(),
            freeze_name: BeadName::new("alpha").unwrap(),
            freeze_time: FreezeTime::parse(freeze).unwrap(),
            inputs: None,
        }
    }

    #[test]
    fn newest_prefers_later_time_then_smaller_content_id() {
        let records = vec![
            record("c3", "20230101T000000000000Z"),
            record("c2", "20230201T000000000000Z"),
            record("c1", "20230201T000000000000Z"),
        ];
        let newest = records.into_iter().max_by(newest_preference).unwrap();
        assert_eq!(newest.content_id.as_str(), "c1");
    }

    #[test]
    fn oldest_prefers_earlier_time_then_smaller_content_id() {
        let records = vec![
            record("c3", "20230101T000000000000Z"),
            record("c2", "20230101T000000000000Z"),
            record("c1", "20230201T000000000000Z"),
        ];
        let oldest = records.into_iter().min_by(oldest_preference).unwrap();
        assert_eq!(oldest.content_id.as_str(), "c2");
    }
}
