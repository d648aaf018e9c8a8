//! # Deleter Module
//!
//! Removes user-selected files, one attempt per file.
//!
//! Every path is attempted regardless of earlier failures; failures are
//! logged with path and cause and collected in the [`DeleteReport`]. After
//! deleting, [`apply_deletions`] reconciles the previous snapshot against
//! the files that actually went away.

use crate::core::comparator::ScanResult;
use crate::core::reconcile::reconcile;
use crate::error::DeleteError;
use crate::events::{null_sender, DeleteEvent, Event, EventSender};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// How a file is removed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeleteMode {
    /// Unlink the file
    #[default]
    Permanent,
    /// Move it to the platform recycle bin
    Trash,
}

/// Per-file outcome of a deletion batch
#[derive(Debug, Default)]
pub struct DeleteReport {
    /// Paths that were removed
    pub deleted: Vec<PathBuf>,
    /// Paths that could not be removed, with the reason
    pub failed: Vec<(PathBuf, DeleteError)>,
}

impl DeleteReport {
    pub fn deleted_count(&self) -> usize {
        self.deleted.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }

    /// One-line summary for the controlling surface
    pub fn summary(&self) -> String {
        if self.all_succeeded() {
            format!("Deleted {} file(s)", self.deleted_count())
        } else {
            format!(
                "Deleted {} file(s), {} failed",
                self.deleted_count(),
                self.failed_count()
            )
        }
    }
}

/// Remove one file
pub fn delete_file(path: &Path, mode: DeleteMode) -> Result<(), DeleteError> {
    match mode {
        DeleteMode::Permanent => {
            fs::remove_file(path).map_err(|e| DeleteError::from_io(path.to_path_buf(), e))
        }
        DeleteMode::Trash => {
            // trash reports a missing file as a generic error; check first
            if fs::symlink_metadata(path).is_err() {
                return Err(DeleteError::NotFound {
                    path: path.to_path_buf(),
                });
            }
            trash::delete(path).map_err(|e| DeleteError::Trash {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        }
    }
}

/// Attempt every path independently
pub fn delete_files<P: AsRef<Path>>(paths: &[P], mode: DeleteMode) -> DeleteReport {
    delete_files_with_events(paths, mode, &null_sender())
}

/// Attempt every path independently, reporting each outcome as an event
pub fn delete_files_with_events<P: AsRef<Path>>(
    paths: &[P],
    mode: DeleteMode,
    events: &EventSender,
) -> DeleteReport {
    events.send(Event::Delete(DeleteEvent::Started { total: paths.len() }));

    let mut report = DeleteReport::default();

    for path in paths.iter().map(AsRef::as_ref) {
        match delete_file(path, mode) {
            Ok(()) => {
                events.send(Event::Delete(DeleteEvent::Deleted {
                    path: path.to_path_buf(),
                }));
                report.deleted.push(path.to_path_buf());
            }
            Err(error) => {
                warn!(path = %path.display(), error = %error, "failed to delete file");
                events.send(Event::Delete(DeleteEvent::Failed {
                    path: path.to_path_buf(),
                    message: error.to_string(),
                }));
                report.failed.push((path.to_path_buf(), error));
            }
        }
    }

    events.send(Event::Delete(DeleteEvent::Completed {
        deleted: report.deleted_count(),
        failed: report.failed_count(),
    }));
    info!(
        deleted = report.deleted_count(),
        failed = report.failed_count(),
        "deletion batch finished"
    );

    report
}

/// Delete `paths` and derive the next snapshot from `result`
pub fn apply_deletions<P: AsRef<Path>>(
    result: &ScanResult,
    paths: &[P],
    mode: DeleteMode,
    events: &EventSender,
) -> (DeleteReport, ScanResult) {
    let report = delete_files_with_events(paths, mode, events);
    let updated = reconcile(result, &report.deleted);
    (report, updated)
}
