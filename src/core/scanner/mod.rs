//! # Scanner Module
//!
//! Discovers candidate image files under a root directory.
//!
//! ## Contract
//! - Traversal is recursive with no depth limit
//! - Only regular files whose extension is on the allow-list are yielded
//!   (case-insensitive; default png, jpg, jpeg, gif, bmp)
//! - Entries are visited in file-name order, so an unmodified tree always
//!   yields the same sequence
//! - A root that is missing or not a directory fails up front with
//!   [`ScanError::RootNotFound`] instead of yielding nothing
//! - Symlink cycles are not detected when `follow_symlinks` is enabled
//!
//! ## Example
//! ```rust,ignore
//! use duplicate_image_finder::core::scanner::{ImageWalker, ScanConfig};
//!
//! let walker = ImageWalker::new(ScanConfig::default());
//! for path in walker.walk("/home/me/Pictures".as_ref())? {
//!     println!("{}", path.display());
//! }
//! ```

mod filter;
mod walker;

pub use filter::ImageFilter;
pub use walker::{ImagePaths, ImageWalker};

use crate::error::DuplicateFinderError;
use serde::{Deserialize, Serialize};

/// Extensions scanned when none are configured
pub const DEFAULT_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp"];

/// Configuration for candidate discovery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Allowed file extensions, lowercase, without the leading dot
    pub extensions: Vec<String>,
    /// Whether to follow symbolic links (cycles are not detected)
    pub follow_symlinks: bool,
    /// Whether to descend into hidden directories and yield hidden files
    pub include_hidden: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            follow_symlinks: false,
            include_hidden: true,
        }
    }
}

impl ScanConfig {
    /// Replace the extension allow-list.
    ///
    /// Entries are normalised: surrounding whitespace and a leading dot are
    /// stripped and the result is lowercased, so `".JPG"` and `"jpg"` are
    /// the same entry.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for ext in extensions {
            let ext = normalize_extension(ext.as_ref());
            if !ext.is_empty() && !normalized.contains(&ext) {
                normalized.push(ext);
            }
        }
        self.extensions = normalized;
        self
    }

    /// Exclude hidden files and directories
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Follow symbolic links while walking
    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Reject configurations that could never match a file
    pub fn validate(&self) -> Result<(), DuplicateFinderError> {
        if self.extensions.is_empty() {
            return Err(DuplicateFinderError::Config(
                "extension allow-list is empty".to_string(),
            ));
        }
        Ok(())
    }
}

pub(crate) fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}
