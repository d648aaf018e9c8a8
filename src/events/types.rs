//! Event type definitions for progress reporting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the duplicate finder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Candidate discovery events
    Scan(ScanEvent),
    /// Fingerprinting events
    Hash(HashEvent),
    /// Whole-pass events
    Pipeline(PipelineEvent),
    /// Deletion events
    Delete(DeleteEvent),
}

/// Events while walking the scan root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Walking has started
    Started { root: PathBuf },
    /// A candidate image was found
    CandidateFound { path: PathBuf },
    /// An entry could not be read but walking continues
    Error { path: PathBuf, message: String },
    /// Walking completed
    Completed { total_candidates: usize },
}

/// Events while fingerprinting candidates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HashEvent {
    /// Progress update after a file was processed
    Progress(HashProgress),
    /// A file produced no fingerprint and was skipped
    Skipped { path: PathBuf, message: String },
    /// Fingerprinting completed
    Completed { total_hashed: usize, skipped: usize },
}

/// Progress information during fingerprinting
///
/// There is no total: candidates are discovered lazily while hashing runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashProgress {
    /// Number of files processed so far (hashed or skipped)
    pub completed: usize,
    /// Number of files skipped so far
    pub skipped: usize,
    /// Most recently processed file
    pub current_path: PathBuf,
}

/// Whole-pass events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// A scan pass has started
    Started { root: PathBuf },
    /// The pass completed and produced a result
    Completed { summary: PipelineSummary },
    /// The pass observed a cancellation request and stopped
    Cancelled,
    /// The pass failed before any work began
    Error { message: String },
}

/// Aggregate outcome of a scan pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Candidate files examined
    pub files_scanned: usize,
    /// Files that produced a fingerprint
    pub files_hashed: usize,
    /// Files skipped (not an image, unreadable, or failed)
    pub files_skipped: usize,
    /// Number of duplicate groups
    pub duplicate_groups: usize,
    /// Files that could be removed while keeping one copy per group
    pub redundant_files: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

/// Events while deleting a batch of files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DeleteEvent {
    /// Deletion of `total` files has started
    Started { total: usize },
    /// A file was removed
    Deleted { path: PathBuf },
    /// A file could not be removed; the batch continues
    Failed { path: PathBuf, message: String },
    /// Every requested file has been attempted
    Completed { deleted: usize, failed: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_serializable() {
        let event = Event::Hash(HashEvent::Progress(HashProgress {
            completed: 10,
            skipped: 2,
            current_path: PathBuf::from("/photos/a.png"),
        }));

        let json = serde_json::to_string(&event).unwrap();
        let deserialized: Event = serde_json::from_str(&json).unwrap();

        match deserialized {
            Event::Hash(HashEvent::Progress(p)) => {
                assert_eq!(p.completed, 10);
                assert_eq!(p.skipped, 2);
            }
            _ => panic!("Wrong event type"),
        }
    }

    #[test]
    fn pipeline_summary_is_serializable() {
        let summary = PipelineSummary {
            files_scanned: 1000,
            files_hashed: 990,
            files_skipped: 10,
            duplicate_groups: 50,
            redundant_files: 75,
            duration_ms: 5000,
        };

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"redundant_files\":75"));
    }
}
