//! Archive writing.
//!
//! Store-side tooling and tests fabricate archives through this builder.
//! The metadata document is always the first entry, so readers can stop
//! streaming as soon as they have seen it.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::filename::archive_basename;
use super::meta::ArchiveMeta;
use super::{ArchiveError, CODE_PREFIX, DATA_PREFIX, META_ENTRY};

const ZSTD_LEVEL: i32 = 0;
const ENTRY_MODE: u32 = 0o644;

/// Builds a well-formed bead archive from metadata plus payload entries.
#[derive(Debug)]
pub struct ArchiveWriter {
    meta: ArchiveMeta,
    data: Vec<(String, Vec<u8>)>,
    code: Vec<(String, Vec<u8>)>,
}

impl ArchiveWriter {
    pub fn new(meta: ArchiveMeta) -> Self {
        Self {
            meta,
            data: Vec::new(),
            code: Vec::new(),
        }
    }

    /// Add an output payload file at `rel` under the data root.
    pub fn data_file(mut self, rel: &str, bytes: &[u8]) -> Self {
        self.data.push((rel.to_string(), bytes.to_vec()));
        self
    }

    /// Add a source file at `rel` under the code root.
    pub fn code_file(mut self, rel: &str, bytes: &[u8]) -> Self {
        self.code.push((rel.to_string(), bytes.to_vec()));
        self
    }

    /// Write the archive to an explicit path.
    pub fn write_to(&self, path: &Path) -> Result<(), ArchiveError> {
        let file = File::create(path).map_err(|err| ArchiveError::io(path, err))?;
        let encoder =
            zstd::Encoder::new(file, ZSTD_LEVEL).map_err(|err| ArchiveError::io(path, err))?;
        let mut builder = tar::Builder::new(encoder);

        let meta_json = serde_json::to_vec_pretty(&self.meta).map_err(|source| {
            ArchiveError::Meta {
                path: path.to_path_buf(),
                source,
            }
        })?;
        append_entry(&mut builder, path, META_ENTRY, &meta_json)?;
        for (rel, bytes) in &self.data {
            append_entry(&mut builder, path, &format!("{DATA_PREFIX}/{rel}"), bytes)?;
        }
        for (rel, bytes) in &self.code {
            append_entry(&mut builder, path, &format!("{CODE_PREFIX}/{rel}"), bytes)?;
        }

        let encoder = builder
            .into_inner()
            .map_err(|err| ArchiveError::io(path, err))?;
        let mut file = encoder
            .finish()
            .map_err(|err| ArchiveError::io(path, err))?;
        file.flush().map_err(|err| ArchiveError::io(path, err))?;
        Ok(())
    }

    /// Write into a directory under the canonical basename derived from the
    /// metadata (`<freeze_name>_<freeze_time>.bead`); returns the full path.
    pub fn write_into_dir(&self, dir: &Path) -> Result<PathBuf, ArchiveError> {
        let basename = archive_basename(&self.meta.freeze_name, &self.meta.freeze_time);
        let path = dir.join(basename);
        self.write_to(&path)?;
        Ok(path)
    }
}

fn append_entry<W: Write>(
    builder: &mut tar::Builder<W>,
    archive_path: &Path,
    entry_path: &str,
    bytes: &[u8],
) -> Result<(), ArchiveError> {
    let mut header = tar::Header::new_gnu();
    header.set_size(bytes.len() as u64);
    header.set_mode(ENTRY_MODE);
    builder
        .append_data(&mut header, entry_path, bytes)
        .map_err(|err| ArchiveError::io(archive_path, err))
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use crate::archive::reader::BeadArchive;
    use crate::core::{BeadName, ContentId, FreezeTime, Kind};

    use super::*;

    #[test]
    fn write_into_dir_uses_the_canonical_basename() {
        let temp = TempDir::new().unwrap();
        let meta = ArchiveMeta::new(
            Kind::new("k1").unwrap(),
            ContentId::new("c1").unwrap(),
            FreezeTime::parse("20230101T000000000000Z").unwrap(),
            BeadName::new("alpha").unwrap(),
        );
        let path = ArchiveWriter::new(meta.clone())
            .write_into_dir(temp.path())
            .unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "alpha_20230101T000000000000Z.bead"
        );
        let archive = BeadArchive::open(&path, "").unwrap();
        assert_eq!(archive.meta(), &meta);
    }
}
