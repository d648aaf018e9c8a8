//! # Reconcile Module
//!
//! Derives an updated [`ScanResult`] after files were deleted, without
//! rescanning the filesystem.
//!
//! For each group, paths in the deleted set are removed and every remaining
//! path is re-checked on disk, since files may also have vanished through
//! outside action. Groups left with one member or none are dropped. The
//! input snapshot is never modified.

use crate::core::comparator::{DuplicateGroup, ImageFile, ScanResult};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Build a new snapshot with `deleted` paths and vanished files removed.
///
/// Reconciling against paths that are not in `result` changes nothing
/// beyond the existence re-check.
pub fn reconcile<P: AsRef<Path>>(result: &ScanResult, deleted: &[P]) -> ScanResult {
    let deleted: HashSet<&Path> = deleted.iter().map(AsRef::as_ref).collect();

    let groups = result.iter().map(|group| {
        let survivors = group
            .files()
            .iter()
            .filter(|file| !deleted.contains(file.path()))
            .map(|file| ImageFile::new(file.path()))
            .filter(|file| {
                let exists = file.exists();
                if !exists {
                    debug!(path = %file.path().display(), "dropping vanished file from group");
                }
                exists
            })
            .collect();

        DuplicateGroup::new(group.fingerprint().clone(), survivors)
    });

    let reconciled = ScanResult::from_groups(groups);
    debug!(
        groups_before = result.len(),
        groups_after = reconciled.len(),
        "reconciled scan result"
    );
    reconciled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hasher::Fingerprint;
    use std::fs::{self, File};
    use std::path::PathBuf;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        a: Vec<PathBuf>,
        b: Vec<PathBuf>,
        result: ScanResult,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let make = |name: &str| {
            let path = dir.path().join(name);
            File::create(&path).unwrap();
            path
        };
        let a = vec![make("a1.png"), make("a2.png"), make("a3.png")];
        let b = vec![make("b1.png"), make("b2.png")];

        let pairs = a
            .iter()
            .map(|p| (p.clone(), Some(Fingerprint::from_hex("aaaa"))))
            .chain(b.iter().map(|p| (p.clone(), Some(Fingerprint::from_hex("bbbb")))));
        let result: ScanResult = pairs.collect();

        Fixture {
            _dir: dir,
            a,
            b,
            result,
        }
    }

    #[test]
    fn deleted_paths_are_removed_from_groups() {
        let f = fixture();
        fs::remove_file(&f.a[1]).unwrap();

        let updated = reconcile(&f.result, &[f.a[1].clone()]);

        let group = updated.get(&Fingerprint::from_hex("aaaa")).unwrap();
        assert_eq!(group.paths().collect::<Vec<_>>(), vec![f.a[0].as_path(), f.a[2].as_path()]);
        assert_eq!(updated.len(), 2);
    }

    #[test]
    fn group_reduced_to_one_member_disappears() {
        let f = fixture();
        fs::remove_file(&f.b[0]).unwrap();

        let updated = reconcile(&f.result, &[&f.b[0]]);

        assert!(updated.get(&Fingerprint::from_hex("bbbb")).is_none());
        assert!(!updated.contains_path(&f.b[1]));
        assert_eq!(updated.len(), 1);
    }

    #[test]
    fn unrelated_paths_are_a_no_op() {
        let f = fixture();

        let updated = reconcile(&f.result, &[PathBuf::from("/not/in/result.png")]);

        assert_eq!(updated, f.result);
    }

    #[test]
    fn reconciling_twice_is_idempotent() {
        let f = fixture();
        fs::remove_file(&f.a[0]).unwrap();

        let once = reconcile(&f.result, &[&f.a[0]]);
        let twice = reconcile(&once, &[&f.a[0]]);

        assert_eq!(once, twice);
    }

    #[test]
    fn externally_removed_files_are_dropped() {
        let f = fixture();
        fs::remove_file(&f.a[2]).unwrap();

        let updated = reconcile::<PathBuf>(&f.result, &[]);

        assert!(!updated.contains_path(&f.a[2]));
        assert_eq!(updated.get(&Fingerprint::from_hex("aaaa")).unwrap().len(), 2);
    }

    #[test]
    fn input_snapshot_is_untouched() {
        let f = fixture();
        let before = f.result.clone();
        for path in &f.a {
            fs::remove_file(path).unwrap();
        }

        let updated = reconcile(&f.result, &f.a);

        assert_eq!(f.result, before);
        assert_eq!(f.result.len(), 2);
        assert_eq!(updated.len(), 1);
    }
}
