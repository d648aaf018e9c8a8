//! # Selection Module
//!
//! Derived views for choosing which group members to delete.
//!
//! A selection is computed from a snapshot by group membership and position
//! ("every second copy", "everything but the first"); the engine keeps no
//! selection state of its own. Positions are 1-based, matching how groups
//! are presented.

use crate::core::comparator::ScanResult;
use std::path::PathBuf;

/// Paths at the given 1-based positions in every group, in group order.
///
/// Positions past the end of a group are ignored; position 0 never matches.
pub fn select_by_position(result: &ScanResult, positions: &[usize]) -> Vec<PathBuf> {
    result
        .iter()
        .flat_map(|group| {
            group
                .paths()
                .enumerate()
                .filter(|(index, _)| positions.contains(&(index + 1)))
                .map(|(_, path)| path.to_path_buf())
        })
        .collect()
}

/// Every member except the first of each group
pub fn select_all_but_first(result: &ScanResult) -> Vec<PathBuf> {
    result
        .iter()
        .flat_map(|group| group.paths().skip(1).map(|path| path.to_path_buf()))
        .collect()
}

/// Whether deleting `selection` would remove every copy of some group
pub fn removes_whole_group(result: &ScanResult, selection: &[PathBuf]) -> bool {
    result
        .iter()
        .any(|group| group.paths().all(|path| selection.iter().any(|s| s.as_path() == path)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hasher::Fingerprint;

    fn sample() -> ScanResult {
        vec![
            ("/a1.png", "aa"),
            ("/a2.png", "aa"),
            ("/a3.png", "aa"),
            ("/b1.png", "bb"),
            ("/b2.png", "bb"),
        ]
        .into_iter()
        .map(|(p, f)| (PathBuf::from(p), Some(Fingerprint::from_hex(f))))
        .collect()
    }

    #[test]
    fn selects_positions_across_groups() {
        let selected = select_by_position(&sample(), &[2]);
        assert_eq!(
            selected,
            vec![PathBuf::from("/a2.png"), PathBuf::from("/b2.png")]
        );
    }

    #[test]
    fn out_of_range_positions_are_ignored() {
        let selected = select_by_position(&sample(), &[0, 3, 4]);
        assert_eq!(selected, vec![PathBuf::from("/a3.png")]);
    }

    #[test]
    fn all_but_first_keeps_one_per_group() {
        let result = sample();
        let selected = select_all_but_first(&result);
        assert_eq!(selected.len(), result.redundant_count());
        assert!(!removes_whole_group(&result, &selected));
    }

    #[test]
    fn detects_selection_that_empties_a_group() {
        let result = sample();
        let selected = select_by_position(&result, &[1, 2]);
        assert!(removes_whole_group(&result, &selected));
    }
}
