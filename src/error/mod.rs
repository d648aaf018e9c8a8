//! # Error Module
//!
//! Error types for the duplicate image finder.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, file names, what went wrong
//! - **Contain per-file faults** - only a bad scan root is fatal to a scan

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum DuplicateFinderError {
    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Scan worker failed: {0}")]
    Worker(String),
}

/// Errors that occur while enumerating candidate files
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    RootNotFound { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to read {path}: {source}")]
    ReadEntry {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Reasons a single file produced no fingerprint
#[derive(Error, Debug)]
pub enum HashError {
    #[error("Not a decodable image {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("Failed to read image file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unexpected failure hashing {path}: {reason}")]
    Unexpected { path: PathBuf, reason: String },
}

impl HashError {
    /// Whether this is the silent "not an image" case
    pub fn is_decode(&self) -> bool {
        matches!(self, HashError::Decode { .. })
    }
}

/// Errors removing a single file
#[derive(Error, Debug)]
pub enum DeleteError {
    #[error("File not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Permission denied deleting: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to delete {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to move {path} to trash: {reason}")]
    Trash { path: PathBuf, reason: String },
}

impl DeleteError {
    /// Classify an I/O failure from removing `path`
    pub fn from_io(path: PathBuf, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => DeleteError::NotFound { path },
            std::io::ErrorKind::PermissionDenied => DeleteError::PermissionDenied { path },
            _ => DeleteError::Io { path, source },
        }
    }
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, DuplicateFinderError>;
