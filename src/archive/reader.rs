//! Archive reading: metadata access and payload extraction.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Component, Path, PathBuf};

use crate::core::{BeadName, BeadRecord, ContentId, FreezeTime, InputSpec, Kind};

use super::filename::name_from_path;
use super::meta::{ArchiveMeta, META_VERSION};
use super::{ArchiveError, CODE_PREFIX, DATA_PREFIX, META_ENTRY};

type TarReader = tar::Archive<zstd::Decoder<'static, BufReader<File>>>;

/// An opened bead archive.
///
/// Opening reads only the metadata document; payload entries stay on disk.
/// Extraction methods re-open the container per call, so no OS handle
/// outlives a single operation.
#[derive(Debug)]
pub struct BeadArchive {
    path: PathBuf,
    box_name: String,
    name: BeadName,
    meta: ArchiveMeta,
}

impl BeadArchive {
    /// Open an archive and read its metadata.
    ///
    /// The bead name comes from the filename; the metadata `freeze_name`
    /// is used only when the filename yields no well-formed name.
    pub fn open(path: &Path, box_name: &str) -> Result<Self, ArchiveError> {
        let meta = read_meta(path)?;
        let name = name_from_path(path).unwrap_or_else(|| meta.freeze_name.clone());
        Ok(Self {
            path: path.to_path_buf(),
            box_name: box_name.to_string(),
            name,
            meta,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn box_name(&self) -> &str {
        &self.box_name
    }

    pub fn name(&self) -> &BeadName {
        &self.name
    }

    pub fn kind(&self) -> &Kind {
        &self.meta.kind
    }

    pub fn content_id(&self) -> &ContentId {
        &self.meta.content_id
    }

    pub fn freeze_time(&self) -> &FreezeTime {
        &self.meta.freeze_time
    }

    pub fn freeze_name(&self) -> &BeadName {
        &self.meta.freeze_name
    }

    pub fn inputs(&self) -> Vec<InputSpec> {
        self.meta.input_specs()
    }

    pub fn meta(&self) -> &ArchiveMeta {
        &self.meta
    }

    /// The lightweight record identifying this archive.
    pub fn record(&self) -> BeadRecord {
        BeadRecord {
            box_name: self.box_name.clone(),
            name: self.name.clone(),
            kind: self.meta.kind.clone(),
            content_id: self.meta.content_id.clone(),
            freeze_name: self.meta.freeze_name.clone(),
            freeze_time: self.meta.freeze_time.clone(),
            inputs: Some(self.meta.input_specs()),
        }
    }

    /// Output payload paths, relative to the data root.
    pub fn data_files(&self) -> Result<Vec<String>, ArchiveError> {
        self.list_section(DATA_PREFIX)
    }

    /// Source file paths, relative to the code root.
    pub fn code_files(&self) -> Result<Vec<String>, ArchiveError> {
        self.list_section(CODE_PREFIX)
    }

    /// Extract all output payload files under `dest`.
    pub fn extract_data_to(&self, dest: &Path) -> Result<(), ArchiveError> {
        self.extract_section(DATA_PREFIX, dest)
    }

    /// Extract all source files under `dest`.
    pub fn extract_code_to(&self, dest: &Path) -> Result<(), ArchiveError> {
        self.extract_section(CODE_PREFIX, dest)
    }

    fn list_section(&self, prefix: &str) -> Result<Vec<String>, ArchiveError> {
        let mut tar = open_tar(&self.path)?;
        let entries = tar
            .entries()
            .map_err(|err| not_an_archive(&self.path, &err))?;
        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| not_an_archive(&self.path, &err))?;
            let entry_path = entry
                .path()
                .map_err(|err| not_an_archive(&self.path, &err))?
                .into_owned();
            if let Some(rel) = section_relative(&entry_path, prefix) {
                files.push(rel.to_string_lossy().into_owned());
            }
        }
        files.sort();
        Ok(files)
    }

    fn extract_section(&self, prefix: &str, dest: &Path) -> Result<(), ArchiveError> {
        let mut tar = open_tar(&self.path)?;
        let entries = tar
            .entries()
            .map_err(|err| not_an_archive(&self.path, &err))?;
        for entry in entries {
            let mut entry = entry.map_err(|err| not_an_archive(&self.path, &err))?;
            let entry_path = entry
                .path()
                .map_err(|err| not_an_archive(&self.path, &err))?
                .into_owned();
            let Some(rel) = section_relative(&entry_path, prefix) else {
                continue;
            };
            if !is_safe_relative(&rel) {
                return Err(ArchiveError::UnsafeEntry {
                    path: self.path.clone(),
                    entry: entry_path.to_string_lossy().into_owned(),
                });
            }
            let target = dest.join(&rel);
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|err| ArchiveError::io(parent, err))?;
            }
            entry
                .unpack(&target)
                .map_err(|err| ArchiveError::io(&target, err))?;
        }
        Ok(())
    }
}

/// Single streaming pass that stops at the metadata entry.
fn read_meta(path: &Path) -> Result<ArchiveMeta, ArchiveError> {
    let mut tar = open_tar(path)?;
    let entries = tar.entries().map_err(|err| not_an_archive(path, &err))?;
    for entry in entries {
        let mut entry = entry.map_err(|err| not_an_archive(path, &err))?;
        let entry_path = entry
            .path()
            .map_err(|err| not_an_archive(path, &err))?
            .into_owned();
        if entry_path != Path::new(META_ENTRY) {
            continue;
        }
        let mut buf = Vec::new();
        entry
            .read_to_end(&mut buf)
            .map_err(|err| not_an_archive(path, &err))?;
        let meta: ArchiveMeta = serde_json::from_slice(&buf).map_err(|source| {
            ArchiveError::Meta {
                path: path.to_path_buf(),
                source,
            }
        })?;
        if meta.meta_version != META_VERSION {
            return Err(ArchiveError::MetaVersion {
                path: path.to_path_buf(),
                got: meta.meta_version,
            });
        }
        return Ok(meta);
    }
    Err(ArchiveError::MissingMeta {
        path: path.to_path_buf(),
    })
}

fn open_tar(path: &Path) -> Result<TarReader, ArchiveError> {
    let file = File::open(path).map_err(|err| ArchiveError::io(path, err))?;
    let decoder = zstd::Decoder::new(file).map_err(|err| ArchiveError::io(path, err))?;
    Ok(tar::Archive::new(decoder))
}

fn not_an_archive(path: &Path, err: &std::io::Error) -> ArchiveError {
    ArchiveError::NotAnArchive {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}

/// Entry path relative to a section prefix, or `None` for other entries
/// and for the section directory itself.
fn section_relative(entry_path: &Path, prefix: &str) -> Option<PathBuf> {
    let rel = entry_path.strip_prefix(prefix).ok()?;
    if rel.as_os_str().is_empty() {
        return None;
    }
    Some(rel.to_path_buf())
}

fn is_safe_relative(rel: &Path) -> bool {
    rel.components()
        .all(|component| matches!(component, Component::Normal(_)))
}
