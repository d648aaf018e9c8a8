//! Fingerprint-keyed accumulation of scan output.

use super::{DuplicateGroup, ImageFile, ScanResult};
use crate::core::hasher::Fingerprint;
use std::collections::HashMap;
use std::path::PathBuf;

/// Accumulates `(path, fingerprint)` pairs during one scan pass.
///
/// There is exactly one writer. Nothing can be read out until
/// [`DuplicateIndex::finish`] consumes the index, so no partially built
/// state is ever observable.
#[derive(Debug, Default)]
pub struct DuplicateIndex {
    /// Fingerprints in first-seen order
    order: Vec<Fingerprint>,
    /// Paths per fingerprint in arrival order
    members: HashMap<Fingerprint, Vec<PathBuf>>,
    recorded: usize,
}

impl DuplicateIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one file. A missing fingerprint records nothing.
    pub fn record(&mut self, path: PathBuf, fingerprint: Option<Fingerprint>) {
        let Some(fingerprint) = fingerprint else {
            return;
        };

        self.recorded += 1;
        match self.members.get_mut(&fingerprint) {
            Some(paths) => paths.push(path),
            None => {
                self.order.push(fingerprint.clone());
                self.members.insert(fingerprint, vec![path]);
            }
        }
    }

    /// Number of fingerprinted files recorded so far
    pub fn recorded(&self) -> usize {
        self.recorded
    }

    /// Produce the snapshot: only fingerprints with two or more paths
    pub fn finish(mut self) -> ScanResult {
        let groups = self.order.into_iter().filter_map(|fingerprint| {
            let paths = self.members.remove(&fingerprint)?;
            Some(DuplicateGroup::new(
                fingerprint,
                paths.into_iter().map(ImageFile::new).collect(),
            ))
        });

        ScanResult::from_groups(groups)
    }
}

impl Extend<(PathBuf, Option<Fingerprint>)> for DuplicateIndex {
    fn extend<I: IntoIterator<Item = (PathBuf, Option<Fingerprint>)>>(&mut self, iter: I) {
        for (path, fingerprint) in iter {
            self.record(path, fingerprint);
        }
    }
}

impl FromIterator<(PathBuf, Option<Fingerprint>)> for ScanResult {
    fn from_iter<I: IntoIterator<Item = (PathBuf, Option<Fingerprint>)>>(iter: I) -> Self {
        let mut index = DuplicateIndex::new();
        index.extend(iter);
        index.finish()
    }
}
