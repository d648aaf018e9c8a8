//! Extension and visibility filtering for the scanner.

use super::{normalize_extension, ScanConfig};
use std::collections::HashSet;
use std::path::Path;

/// Decides whether a path is an image candidate
#[derive(Debug, Clone)]
pub struct ImageFilter {
    /// Lowercase extensions to include
    extensions: HashSet<String>,
    /// Whether to include hidden files
    include_hidden: bool,
}

impl ImageFilter {
    /// Build a filter from a scan configuration
    pub fn from_config(config: &ScanConfig) -> Self {
        Self {
            extensions: config
                .extensions
                .iter()
                .map(|e| normalize_extension(e))
                .collect(),
            include_hidden: config.include_hidden,
        }
    }

    /// Check if a file should be yielded as a candidate
    pub fn should_include(&self, path: &Path) -> bool {
        if !self.include_hidden && is_hidden(path) {
            return false;
        }

        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| self.extensions.contains(&ext.to_lowercase()))
            .unwrap_or(false)
    }

    /// Check if the walker should descend into a directory
    pub fn should_descend(&self, dir: &Path) -> bool {
        self.include_hidden || !is_hidden(dir)
    }
}

impl Default for ImageFilter {
    fn default() -> Self {
        Self::from_config(&ScanConfig::default())
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}
