#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use beadbox::{
    ArchiveMeta, ArchiveWriter, BeadBox, BeadName, ContentId, FreezeTime, InputRef, Kind,
};

/// Temp root holding any number of box directories plus a staging area for
/// archives that are not in any box yet.
pub struct BoxRig {
    temp: TempDir,
}

impl BoxRig {
    pub fn new() -> Self {
        Self {
            temp: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    /// Create (if needed) and return a box directory.
    pub fn box_dir(&self, name: &str) -> PathBuf {
        let dir = self.temp.path().join(name);
        std::fs::create_dir_all(&dir).expect("create box dir");
        dir
    }

    /// Open a box over its directory, creating the directory first.
    pub fn open_box(&self, name: &str) -> BeadBox {
        let dir = self.box_dir(name);
        BeadBox::open(name, dir).expect("open box")
    }

    /// A directory for archives that belong to no box.
    pub fn staging_dir(&self) -> PathBuf {
        let dir = self.temp.path().join("staging");
        std::fs::create_dir_all(&dir).expect("create staging dir");
        dir
    }
}

pub fn freeze(s: &str) -> FreezeTime {
    FreezeTime::parse(s).expect("parse freeze time")
}

pub fn name(s: &str) -> BeadName {
    BeadName::new(s).expect("parse bead name")
}

pub fn kind(s: &str) -> Kind {
    Kind::new(s).expect("parse kind")
}

pub fn content_id(s: &str) -> ContentId {
    ContentId::new(s).expect("parse content id")
}

pub fn bead_meta(
    bead_name: &str,
    bead_content_id: &str,
    bead_kind: &str,
    freeze_time: &str,
) -> ArchiveMeta {
    ArchiveMeta::new(
        kind(bead_kind),
        content_id(bead_content_id),
        freeze(freeze_time),
        name(bead_name),
    )
}

/// Write a minimal bead archive into `dir`; returns its path.
pub fn write_bead(
    dir: &Path,
    bead_name: &str,
    bead_content_id: &str,
    bead_kind: &str,
    freeze_time: &str,
) -> PathBuf {
    write_bead_with_inputs(dir, bead_name, bead_content_id, bead_kind, freeze_time, &[])
}

/// Same, with `(input_name, input_content_id, input_freeze_time)` inputs.
pub fn write_bead_with_inputs(
    dir: &Path,
    bead_name: &str,
    bead_content_id: &str,
    bead_kind: &str,
    freeze_time: &str,
    inputs: &[(&str, &str, &str)],
) -> PathBuf {
    let mut meta = bead_meta(bead_name, bead_content_id, bead_kind, freeze_time);
    let mut input_map = BTreeMap::new();
    for (input_name, input_content_id, input_freeze) in inputs {
        input_map.insert(
            name(input_name),
            InputRef {
                kind: kind("input-kind"),
                content_id: content_id(input_content_id),
                freeze_time: freeze(input_freeze),
            },
        );
    }
    meta.inputs = input_map;
    ArchiveWriter::new(meta)
        .data_file("output/result.csv", b"a,b\n1,2\n")
        .code_file("main.py", b"print('run')\n")
        .write_into_dir(dir)
        .expect("write bead archive")
}
