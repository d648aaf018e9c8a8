//! # Pipeline Module
//!
//! Runs one scan pass: walk, fingerprint, group.
//!
//! ## Stages
//! 1. **Walk** - lazily enumerate candidates under the root
//! 2. **Hash** - fingerprint candidates in batches, in parallel with rayon,
//!    keeping discovery order
//! 3. **Group** - feed the single-writer [`DuplicateIndex`] and produce the
//!    snapshot once the pass ends
//!
//! A pass checks its [`CancellationToken`] before every file. A cancelled
//! pass yields an empty result rather than a partial one.
//!
//! [`ScanController`] runs passes on a dedicated background thread, at most
//! one at a time.
//!
//! [`DuplicateIndex`]: crate::core::comparator::DuplicateIndex

mod cancel;
mod controller;
mod executor;

pub use cancel::CancellationToken;
pub use controller::{ScanController, ScanHandle};
pub use executor::{Pipeline, PipelineBuilder, PipelineConfig, ScanRun};
