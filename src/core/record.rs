//! Query result types.
//!
//! A `BeadRecord` identifies an archive without opening it. The heavyweight
//! counterpart is `archive::BeadArchive`, obtained through `BeadBox::resolve`.

use serde::{Deserialize, Serialize};

use super::identity::{BeadName, ContentId, Kind};
use super::time::FreezeTime;

/// One input dependency recorded at freeze time.
///
/// Refers to the referenced bead by value (kind / content id / freeze time),
/// never by pointer, so dependency graphs are a pure function of records.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSpec {
    pub name: BeadName,
    pub kind: Kind,
    pub content_id: ContentId,
    pub freeze_time: FreezeTime,
}

/// Lightweight metadata tuple returned by queries.
///
/// Equality is structural on `(box_name, name, content_id)` - the triple
/// that resolution keys on. `freeze_name` is carried for display but never
/// used to resolve. `inputs` is `None` when the query did not load them.
#[derive(Clone, Debug)]
pub struct BeadRecord {
    pub box_name: String,
    pub name: BeadName,
    pub kind: Kind,
    pub content_id: ContentId,
    pub freeze_name: BeadName,
    pub freeze_time: FreezeTime,
    pub inputs: Option<Vec<InputSpec>>,
}

impl PartialEq for BeadRecord {
    fn eq(&self, other: &Self) -> bool {
        self.box_name == other.box_name
            && self.name == other.name
            && self.content_id == other.content_id
    }
}

impl Eq for BeadRecord {}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(box_name: &str, name: &str, content_id: &str, freeze: &str) -> BeadRecord {
        BeadRecord {
            box_name: box_name.to_string(),
            name: BeadName::new(name).unwrap(),
            kind: Kind::new("k1").unwrap(),
            content_id: ContentId::new(content_id).unwrap(),
            freeze_name: BeadName::new(name).unwrap(),
            freeze_time: FreezeTime::parse(freeze).unwrap(),
            inputs: None,
        }
    }

    #[test]
    fn equality_is_on_the_resolution_triple() {
        let a = record("b1", "alpha", "c1", "20230101T000000000000Z");
        let mut b = record("b1", "alpha", "c1", "20240101T000000000000Z");
        b.kind = Kind::new("k2").unwrap();
        assert_eq!(a, b);

        let other_content = record("b1", "alpha", "c2", "20230101T000000000000Z");
        assert_ne!(a, other_content);

        let other_box = record("b2", "alpha", "c1", "20230101T000000000000Z");
        assert_ne!(a, other_box);
    }
}
