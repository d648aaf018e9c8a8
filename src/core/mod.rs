//! # Core Module
//!
//! The UI-agnostic duplicate detection engine.
//!
//! ## Modules
//! - `scanner` - Enumerates candidate images under a root
//! - `hasher` - Computes perceptual fingerprints, skipping bad files
//! - `comparator` - Groups files by identical fingerprint
//! - `reconcile` - Updates a result after files were deleted
//! - `deleter` - Removes selected files one by one
//! - `selection` - Position-based selection views over a result
//! - `pipeline` - Runs a scan pass, in the foreground or background

pub mod comparator;
pub mod deleter;
pub mod hasher;
pub mod pipeline;
pub mod reconcile;
pub mod scanner;
pub mod selection;

// Re-export commonly used types
pub use comparator::{DuplicateGroup, DuplicateIndex, ImageFile, ScanResult};
pub use deleter::{DeleteMode, DeleteReport};
pub use hasher::{Fingerprint, HashComputer, HashOutcome, HasherConfig};
pub use pipeline::{CancellationToken, Pipeline, ScanController, ScanHandle, ScanRun};
pub use reconcile::reconcile;
pub use scanner::{ImageWalker, ScanConfig};
