//! The condition language: a closed set of predicates over bead metadata.
//!
//! `compile` is the only place that turns user-provided values into SQL;
//! every value travels as a bound parameter, never interpolated text.
//! `matches` mirrors the same semantics in memory for the filesystem
//! fallback path.

use crate::core::{BeadName, BeadRecord, ContentId, FreezeTime, Kind};

/// One query predicate. A query is a conjunction of these.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Condition {
    ByName(BeadName),
    ByKind(Kind),
    ByContentId(ContentId),
    AtTime(FreezeTime),
    NewerThan(FreezeTime),
    OlderThan(FreezeTime),
    AtOrNewer(FreezeTime),
    AtOrOlder(FreezeTime),
}

impl Condition {
    fn column(&self) -> &'static str {
        match self {
            Condition::ByName(_) => "name",
            Condition::ByKind(_) => "kind",
            Condition::ByContentId(_) => "content_id",
            Condition::AtTime(_)
            | Condition::NewerThan(_)
            | Condition::OlderThan(_)
            | Condition::AtOrNewer(_)
            | Condition::AtOrOlder(_) => "freeze_time_str",
        }
    }

    fn operator(&self) -> &'static str {
        match self {
            Condition::ByName(_)
            | Condition::ByKind(_)
            | Condition::ByContentId(_)
            | Condition::AtTime(_) => "=",
            Condition::NewerThan(_) => ">",
            Condition::OlderThan(_) => "<",
            Condition::AtOrNewer(_) => ">=",
            Condition::AtOrOlder(_) => "<=",
        }
    }

    fn value(&self) -> &str {
        match self {
            Condition::ByName(name) => name.as_str(),
            Condition::ByKind(kind) => kind.as_str(),
            Condition::ByContentId(id) => id.as_str(),
            Condition::AtTime(t)
            | Condition::NewerThan(t)
            | Condition::OlderThan(t)
            | Condition::AtOrNewer(t)
            | Condition::AtOrOlder(t) => t.as_str(),
        }
    }

    /// In-memory mirror of the compiled predicate.
    pub fn matches(&self, record: &BeadRecord) -> bool {
        match self {
            Condition::ByName(name) => record.name == *name,
            Condition::ByKind(kind) => record.kind == *kind,
            Condition::ByContentId(id) => record.content_id == *id,
            Condition::AtTime(t) => record.freeze_time == *t,
            Condition::NewerThan(t) => record.freeze_time > *t,
            Condition::OlderThan(t) => record.freeze_time < *t,
            Condition::AtOrNewer(t) => record.freeze_time >= *t,
            Condition::AtOrOlder(t) => record.freeze_time <= *t,
        }
    }
}

/// Compile conditions into a WHERE fragment plus the parallel parameter
/// list. An empty condition list compiles to an empty fragment (all rows).
pub fn compile(conditions: &[Condition]) -> (String, Vec<String>) {
    let fragment = conditions
        .iter()
        .map(|condition| format!("{} {} ?", condition.column(), condition.operator()))
        .collect::<Vec<_>>()
        .join(" AND ");
    let params = conditions
        .iter()
        .map(|condition| condition.value().to_string())
        .collect();
    (fragment, params)
}
