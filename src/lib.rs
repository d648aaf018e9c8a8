//! # Duplicate Image Finder
//!
//! Finds visually identical images in a directory tree and removes the
//! redundant copies on request.
//!
//! ## Core Philosophy
//! - **Never auto-delete** - deletion only happens for paths the caller names
//! - **One bad file never stops a scan** - unreadable or corrupt files are
//!   skipped and logged
//! - **Snapshots, not shared state** - every scan and every deletion produces
//!   a fresh, immutable [`core::ScanResult`]
//!
//! ## Architecture
//! - `core` - The duplicate detection engine
//! - `events` - Channel-based progress reporting
//! - `error` - Error types

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{DuplicateFinderError, Result};

/// Initialize tracing for the library
///
/// This should be called by the application entry point. `RUST_LOG`
/// overrides `default_filter` when set.
pub fn init_tracing(default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default tracing subscriber");
}
