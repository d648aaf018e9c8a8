//! # Comparator Module
//!
//! Groups fingerprinted files into duplicate groups.
//!
//! Grouping is by exact fingerprint equality: two files are duplicates when
//! their fingerprints are the same string, and no distance metric is
//! applied. Near-identical images whose fingerprints differ in a few bits
//! are deliberately never grouped.
//!
//! ## Types
//! - [`ImageFile`] - a path with a lazily checked existence flag
//! - [`DuplicateGroup`] - files sharing one fingerprint, in discovery order
//! - [`ScanResult`] - every group with at least two members
//! - [`DuplicateIndex`] - the single-writer accumulator that builds a result

mod index;

pub use index::DuplicateIndex;

use crate::core::hasher::Fingerprint;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// A file referenced by path.
///
/// Existence is checked on first request and remembered for the lifetime
/// of this value; a fresh `ImageFile` checks again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageFile {
    path: PathBuf,
    #[serde(skip)]
    exists: OnceLock<bool>,
}

impl ImageFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            exists: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the file was present when first asked
    pub fn exists(&self) -> bool {
        *self.exists.get_or_init(|| self.path.exists())
    }
}

impl PartialEq for ImageFile {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for ImageFile {}

/// Files that share one fingerprint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    fingerprint: Fingerprint,
    files: Vec<ImageFile>,
}

impl DuplicateGroup {
    pub(crate) fn new(fingerprint: Fingerprint, files: Vec<ImageFile>) -> Self {
        Self { fingerprint, files }
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    /// Members in discovery order
    pub fn files(&self) -> &[ImageFile] {
        &self.files
    }

    /// Member paths in discovery order
    pub fn paths(&self) -> impl Iterator<Item = &Path> + '_ {
        self.files.iter().map(ImageFile::path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Always false for a group taken from a [`ScanResult`]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.files.iter().any(|f| f.path() == path)
    }

    /// Members beyond the first, i.e. what could go while keeping one copy
    pub fn redundant_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }
}

/// Immutable snapshot of duplicate groups.
///
/// Groups appear in the order their fingerprint was first seen, and every
/// group has at least two members. A new snapshot is produced by each scan
/// and by each reconciliation; an existing one is never modified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SerializedScanResult")]
pub struct ScanResult {
    groups: Vec<DuplicateGroup>,
}

/// Wire form of [`ScanResult`]; deserialising goes through
/// [`ScanResult::from_groups`] so undersized groups are dropped.
#[derive(Deserialize)]
struct SerializedScanResult {
    groups: Vec<DuplicateGroup>,
}

impl From<SerializedScanResult> for ScanResult {
    fn from(serialized: SerializedScanResult) -> Self {
        Self::from_groups(serialized.groups)
    }
}

impl ScanResult {
    /// An empty result
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a snapshot, dropping any group with fewer than two members
    pub(crate) fn from_groups(groups: impl IntoIterator<Item = DuplicateGroup>) -> Self {
        Self {
            groups: groups.into_iter().filter(|g| g.len() >= 2).collect(),
        }
    }

    pub fn groups(&self) -> &[DuplicateGroup] {
        &self.groups
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DuplicateGroup> {
        self.groups.iter()
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Look up the group for a fingerprint
    pub fn get(&self, fingerprint: &Fingerprint) -> Option<&DuplicateGroup> {
        self.groups.iter().find(|g| g.fingerprint() == fingerprint)
    }

    /// Whether any group lists `path`
    pub fn contains_path(&self, path: &Path) -> bool {
        self.groups.iter().any(|g| g.contains(path))
    }

    /// Total files across all groups
    pub fn file_count(&self) -> usize {
        self.groups.iter().map(DuplicateGroup::len).sum()
    }

    /// Files removable while keeping one copy per group
    pub fn redundant_count(&self) -> usize {
        self.groups.iter().map(DuplicateGroup::redundant_count).sum()
    }
}

impl<'a> IntoIterator for &'a ScanResult {
    type Item = &'a DuplicateGroup;
    type IntoIter = std::slice::Iter<'a, DuplicateGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}
