//! The metadata document embedded in every archive at `meta/bead.json`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::{BeadName, ContentId, FreezeTime, InputSpec, Kind};

/// Current metadata document version. Carried in every archive so content-id
/// schemes can evolve without orphaning existing beads.
pub const META_VERSION: &str = "bead-meta/1";

/// Identity of a referenced bead at the moment of freezing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRef {
    pub kind: Kind,
    pub content_id: ContentId,
    pub freeze_time: FreezeTime,
}

/// Archive metadata document.
///
/// `inputs` is keyed by the name the owning bead uses for each input; the
/// map keeps input order deterministic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveMeta {
    pub meta_version: String,
    pub kind: Kind,
    pub content_id: ContentId,
    pub freeze_time: FreezeTime,
    pub freeze_name: BeadName,
    #[serde(default)]
    pub inputs: BTreeMap<BeadName, InputRef>,
}

impl ArchiveMeta {
    pub fn new(
        kind: Kind,
        content_id: ContentId,
        freeze_time: FreezeTime,
        freeze_name: BeadName,
    ) -> Self {
        Self {
            meta_version: META_VERSION.to_string(),
            kind,
            content_id,
            freeze_time,
            freeze_name,
            inputs: BTreeMap::new(),
        }
    }

    pub fn with_input(mut self, name: BeadName, input: InputRef) -> Self {
        self.inputs.insert(name, input);
        self
    }

    /// Inputs as records, ordered by input name.
    pub fn input_specs(&self) -> Vec<InputSpec> {
        self.inputs
            .iter()
            .map(|(name, input)| InputSpec {
                name: name.clone(),
                kind: input.kind.clone(),
                content_id: input.content_id.clone(),
                freeze_time: input.freeze_time.clone(),
            })
            .collect()
    }
}
