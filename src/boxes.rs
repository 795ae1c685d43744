//! The box facade: a named directory of bead archives fronted by the index.
//!
//! Boxes exist to share computations (a box on a network mount), to hold
//! release branches, or to split storage by access level. All structured
//! lookups go through the index; when the index cannot exist at all (for
//! example a read-only mount that never had one) queries degrade to
//! enumerating the directory.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;

use crate::archive::{archive_basename, ArchiveError, BeadArchive};
use crate::core::{BeadName, BeadRecord, ContentId, Kind};
use crate::error::Transience;
use crate::index::{
    archive_paths, BoxIndex, Condition, IndexConfig, IndexError, InputLoading,
};
use crate::search::BeadSearch;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BoxError {
    #[error("box `{name}`: {path:?} is not a directory")]
    NotADirectory { name: String, path: PathBuf },
    #[error("record belongs to box `{got}`, not `{expected}`")]
    WrongBox { expected: String, got: String },
    #[error(
        "archive {path:?} does not match its index row: expected {expected}, found {found}; \
         rebuild the index"
    )]
    IndexOutOfSync {
        path: PathBuf,
        expected: String,
        found: String,
    },
    #[error(transparent)]
    Archive(#[from] ArchiveError),
    #[error(transparent)]
    Index(#[from] IndexError),
    #[error("io error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BoxError {
    pub fn transience(&self) -> Transience {
        match self {
            BoxError::Archive(e) => e.transience(),
            BoxError::Index(e) => e.transience(),
            BoxError::Io { .. } => Transience::Unknown,
            BoxError::NotADirectory { .. }
            | BoxError::WrongBox { .. }
            | BoxError::IndexOutOfSync { .. } => Transience::Permanent,
        }
    }
}

/// A named box directory.
///
/// `index` is `None` only when the directory cannot carry one (read-only
/// filesystem, no existing database); every lookup then scans the
/// directory instead.
#[derive(Debug)]
pub struct BeadBox {
    name: String,
    directory: PathBuf,
    index: Option<BoxIndex>,
}

impl BeadBox {
    /// Open a box with the default index configuration.
    pub fn open(name: impl Into<String>, directory: impl Into<PathBuf>) -> Result<Self, BoxError> {
        Self::open_with(name, directory, IndexConfig::default())
    }

    pub fn open_with(
        name: impl Into<String>,
        directory: impl Into<PathBuf>,
        config: IndexConfig,
    ) -> Result<Self, BoxError> {
        let name = name.into();
        let directory = directory.into();
        if !directory.is_dir() {
            return Err(BoxError::NotADirectory {
                name,
                path: directory,
            });
        }
        let index = match BoxIndex::open(&directory, config) {
            Ok(index) => Some(index),
            Err(IndexError::Unavailable { path, reason }) => {
                warn!(box_name = %name, path = ?path, reason = %reason,
                    "index unavailable, falling back to directory scans");
                None
            }
            Err(err) => return Err(err.into()),
        };
        Ok(Self {
            name,
            directory,
            index,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn has_index(&self) -> bool {
        self.index.is_some()
    }

    pub fn index(&self) -> Option<&BoxIndex> {
        self.index.as_ref()
    }

    /// Retrieve matching records, inputs included.
    pub fn get_beads(&self, conditions: &[Condition]) -> Result<Vec<BeadRecord>, BoxError> {
        match &self.index {
            Some(index) => Ok(index.query(conditions, &self.name, InputLoading::Load)?),
            None => self.scan_beads(conditions),
        }
    }

    /// Every record in the box.
    pub fn all_beads(&self) -> Result<Vec<BeadRecord>, BoxError> {
        self.get_beads(&[])
    }

    /// Records whose inputs reference the given content id.
    pub fn beads_with_input(&self, content_id: &ContentId) -> Result<Vec<BeadRecord>, BoxError> {
        match &self.index {
            Some(index) => Ok(index.beads_with_input(content_id, &self.name)?),
            None => {
                let records = self.scan_beads(&[])?;
                Ok(records
                    .into_iter()
                    .filter(|record| {
                        record.inputs.as_deref().unwrap_or_default().iter().any(
                            |input| input.content_id == *content_id,
                        )
                    })
                    .collect())
            }
        }
    }

    /// Validated mapping from a record to an opened archive.
    ///
    /// The archive's `(name, content_id, kind)` must equal the record's;
    /// a mismatch means the index no longer describes the directory and is
    /// fatal for this operation.
    pub fn resolve(&self, record: &BeadRecord) -> Result<BeadArchive, BoxError> {
        if record.box_name != self.name {
            return Err(BoxError::WrongBox {
                expected: self.name.clone(),
                got: record.box_name.clone(),
            });
        }
        let path = match &self.index {
            Some(index) => index.locate(&record.name, &record.content_id)?,
            None => self.locate_by_scan(&record.name, &record.content_id)?,
        };
        let archive = BeadArchive::open(&path, &self.name)?;
        if archive.name() != &record.name
            || archive.content_id() != &record.content_id
            || archive.kind() != &record.kind
        {
            return Err(BoxError::IndexOutOfSync {
                path,
                expected: tuple_display(&record.name, &record.content_id, &record.kind),
                found: tuple_display(archive.name(), archive.content_id(), archive.kind()),
            });
        }
        Ok(archive)
    }

    /// Copy an archive file into the box under its canonical basename and
    /// index it. The source must be a valid bead archive.
    pub fn store(&self, source: &Path) -> Result<BeadRecord, BoxError> {
        let archive = BeadArchive::open(source, &self.name)?;
        let basename = archive_basename(archive.name(), archive.freeze_time());
        let dest = self.directory.join(&basename);
        // The source may already sit at its canonical path inside the box.
        if source.canonicalize().ok() != dest.canonicalize().ok() {
            fs::copy(source, &dest).map_err(|source| BoxError::Io {
                path: dest.clone(),
                source,
            })?;
        }
        match &self.index {
            Some(index) => index.add(&dest)?,
            None => warn!(box_name = %self.name, path = ?dest,
                "box has no index; stored archive is visible to scans only"),
        }
        Ok(archive.record())
    }

    /// Fluent search over this box.
    pub fn search(&self) -> BeadSearch<'_> {
        BeadSearch::single(self)
    }

    /// Directory-scan fallback; mirrors query ordering and skips
    /// unreadable files the way bulk ingest does.
    fn scan_beads(&self, conditions: &[Condition]) -> Result<Vec<BeadRecord>, BoxError> {
        let mut records = Vec::new();
        for path in archive_paths(&self.directory)? {
            match BeadArchive::open(&path, &self.name) {
                Ok(archive) => {
                    let record = archive.record();
                    if conditions.iter().all(|condition| condition.matches(&record)) {
                        records.push(record);
                    }
                }
                Err(err) => {
                    warn!(path = ?path, error = %err, "skipping unreadable archive");
                }
            }
        }
        records.sort_by(|a, b| {
            a.freeze_time
                .cmp(&b.freeze_time)
                .then_with(|| a.content_id.cmp(&b.content_id))
        });
        Ok(records)
    }

    fn locate_by_scan(&self, name: &BeadName, content_id: &ContentId) -> Result<PathBuf, BoxError> {
        let mut matches = Vec::new();
        for path in archive_paths(&self.directory)? {
            if let Ok(archive) = BeadArchive::open(&path, &self.name) {
                if archive.name() == name && archive.content_id() == content_id {
                    matches.push(path);
                }
            }
        }
        match matches.len() {
            0 => Err(IndexError::NotFound {
                name: name.clone(),
                content_id: content_id.clone(),
            }
            .into()),
            1 => Ok(matches.remove(0)),
            _ => Err(IndexError::Ambiguous {
                name: name.clone(),
                content_id: content_id.clone(),
                paths: matches
                    .iter()
                    .map(|path| path.to_string_lossy().into_owned())
                    .collect(),
            }
            .into()),
        }
    }
}

fn tuple_display(name: &BeadName, content_id: &ContentId, kind: &Kind) -> String {
    format!("(name `{name}`, content_id `{content_id}`, kind `{kind}`)")
}
