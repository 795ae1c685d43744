//! Basename codec: `<name>_<freeze_time>.bead`.
//!
//! The name is everything before the last underscore whose remainder parses
//! as a freeze time. A basename without a parsable stamp is taken as a bare
//! name; the caller falls back to the metadata name hint when even that is
//! not a well-formed name.

use std::path::Path;

use crate::core::{BeadName, FreezeTime};

use super::ARCHIVE_EXT;

/// Compose the on-disk basename for an archive.
pub fn archive_basename(name: &BeadName, freeze_time: &FreezeTime) -> String {
    format!("{}_{}.{}", name.as_str(), freeze_time.as_str(), ARCHIVE_EXT)
}

/// Whether a path looks like a bead archive (by extension only).
pub fn is_archive_path(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some(ARCHIVE_EXT)
}

/// Parse the bead name out of an archive file path.
///
/// Returns `None` when no well-formed name can be derived, in which case
/// the archive's `freeze_name` is the only usable hint.
pub fn name_from_path(path: &Path) -> Option<BeadName> {
    let stem = path.file_stem()?.to_str()?;
    let name = match stem.rsplit_once('_') {
        Some((prefix, suffix)) if FreezeTime::parse(suffix).is_ok() => prefix,
        _ => stem,
    };
    BeadName::new(name).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(path: &str) -> Option<String> {
        name_from_path(Path::new(path)).map(|name| name.as_str().to_string())
    }

    #[test]
    fn strips_the_freeze_time_suffix() {
        assert_eq!(
            parsed("bead-2015v3_20150923T010203012345Z.bead").as_deref(),
            Some("bead-2015v3")
        );
        assert_eq!(
            parsed("path/to/bead-2015v3_20150923T010203012345Z.bead").as_deref(),
            Some("bead-2015v3")
        );
    }

    #[test]
    fn name_may_itself_contain_underscores() {
        assert_eq!(
            parsed("census_hu_20230101T000000000000Z.bead").as_deref(),
            Some("census_hu")
        );
    }

    #[test]
    fn bare_name_without_stamp_is_kept_whole() {
        assert_eq!(parsed("bead-2015v3.bead").as_deref(), Some("bead-2015v3"));
        // Underscore suffix that is not a freeze time stays part of the name.
        assert_eq!(parsed("bead_20150923.bead").as_deref(), Some("bead_20150923"));
    }

    #[test]
    fn malformed_stems_yield_none() {
        assert_eq!(parsed("_20230101T000000000000Z.bead"), None);
    }

    #[test]
    fn basename_round_trips() {
        let name = BeadName::new("alpha").unwrap();
        let t = FreezeTime::parse("20230101T000000000000Z").unwrap();
        let basename = archive_basename(&name, &t);
        assert_eq!(basename, "alpha_20230101T000000000000Z.bead");
        assert!(is_archive_path(Path::new(&basename)));
        assert_eq!(parsed(&basename).as_deref(), Some("alpha"));
    }
}
