//! Lazy directory walking using walkdir.

use super::{filter::ImageFilter, ScanConfig};
use crate::error::ScanError;
use crate::events::{Event, EventSender, ScanEvent};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Produces candidate image paths under a root
#[derive(Debug, Clone)]
pub struct ImageWalker {
    config: ScanConfig,
    filter: ImageFilter,
}

impl ImageWalker {
    /// Create a walker with the given configuration
    pub fn new(config: ScanConfig) -> Self {
        let filter = ImageFilter::from_config(&config);
        Self { config, filter }
    }

    /// Start a fresh walk of `root`.
    ///
    /// Fails immediately if `root` is missing or not a directory. Calling
    /// this again restarts the traversal from the beginning.
    pub fn walk(&self, root: &Path) -> Result<ImagePaths, ScanError> {
        match fs::metadata(root) {
            Ok(metadata) if metadata.is_dir() => {}
            _ => {
                return Err(ScanError::RootNotFound {
                    path: root.to_path_buf(),
                })
            }
        }

        let inner = WalkDir::new(root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name()
            .into_iter();

        Ok(ImagePaths {
            inner,
            filter: self.filter.clone(),
            events: None,
            errors: Vec::new(),
            yielded: 0,
        })
    }
}

/// Lazy sequence of candidate image paths.
///
/// Unreadable entries are logged, recorded and skipped; they never end the
/// iteration.
pub struct ImagePaths {
    inner: walkdir::IntoIter,
    filter: ImageFilter,
    events: Option<EventSender>,
    errors: Vec<ScanError>,
    yielded: usize,
}

impl ImagePaths {
    /// Report discoveries and walk errors on `events`
    pub fn with_events(mut self, events: EventSender) -> Self {
        self.events = Some(events);
        self
    }

    /// Entries that could not be read so far
    pub fn errors(&self) -> &[ScanError] {
        &self.errors
    }

    /// Number of candidates yielded so far
    pub fn yielded(&self) -> usize {
        self.yielded
    }

    fn record_error(&mut self, error: ScanError, path: PathBuf) {
        warn!(path = %path.display(), error = %error, "skipping unreadable entry");
        if let Some(sender) = &self.events {
            sender.send(Event::Scan(ScanEvent::Error {
                path,
                message: error.to_string(),
            }));
        }
        self.errors.push(error);
    }
}

impl Iterator for ImagePaths {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        loop {
            match self.inner.next()? {
                Ok(entry) => {
                    let path = entry.path();

                    if entry.file_type().is_dir() {
                        if entry.depth() > 0 && !self.filter.should_descend(path) {
                            debug!(path = %path.display(), "skipping hidden directory");
                            self.inner.skip_current_dir();
                        }
                        continue;
                    }

                    if !self.filter.should_include(path) {
                        continue;
                    }

                    // Follows symlinks: a link to a regular file counts as one
                    match fs::metadata(path) {
                        Ok(metadata) if metadata.is_file() => {
                            let path = path.to_path_buf();
                            if let Some(sender) = &self.events {
                                sender.send(Event::Scan(ScanEvent::CandidateFound {
                                    path: path.clone(),
                                }));
                            }
                            self.yielded += 1;
                            return Some(path);
                        }
                        Ok(_) => continue,
                        Err(e) => {
                            let path = path.to_path_buf();
                            let error = ScanError::ReadEntry {
                                path: path.clone(),
                                source: e,
                            };
                            self.record_error(error, path);
                        }
                    }
                }
                Err(e) => {
                    let path = e.path().map(|p| p.to_path_buf()).unwrap_or_default();

                    let error = if e.io_error().map(|e| e.kind())
                        == Some(std::io::ErrorKind::PermissionDenied)
                    {
                        ScanError::PermissionDenied { path: path.clone() }
                    } else {
                        ScanError::ReadEntry {
                            path: path.clone(),
                            source: std::io::Error::other(e.to_string()),
                        }
                    };

                    self.record_error(error, path);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(&[0xFF, 0xD8, 0xFF, 0xE0]).unwrap();
        path
    }

    fn walk_all(root: &Path, config: ScanConfig) -> Vec<PathBuf> {
        ImageWalker::new(config).walk(root).unwrap().collect()
    }

    #[test]
    fn walk_empty_directory_yields_nothing() {
        let temp_dir = TempDir::new().unwrap();
        assert!(walk_all(temp_dir.path(), ScanConfig::default()).is_empty());
    }

    #[test]
    fn walk_missing_root_fails_before_yielding() {
        let walker = ImageWalker::new(ScanConfig::default());
        let result = walker.walk(Path::new("/nonexistent/path/12345"));
        assert!(matches!(result, Err(ScanError::RootNotFound { .. })));
    }

    #[test]
    fn walk_file_root_fails() {
        let temp_dir = TempDir::new().unwrap();
        let file = touch(temp_dir.path(), "a.png");

        let walker = ImageWalker::new(ScanConfig::default());
        assert!(matches!(
            walker.walk(&file),
            Err(ScanError::RootNotFound { .. })
        ));
    }

    #[test]
    fn walk_filters_by_extension() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "photo.JPG");
        touch(temp_dir.path(), "notes.txt");
        touch(temp_dir.path(), "clip.mp4");

        let paths = walk_all(temp_dir.path(), ScanConfig::default());

        assert_eq!(paths.len(), 1);
        assert!(paths[0].ends_with("photo.JPG"));
    }

    #[test]
    fn walk_recurses_in_stable_order() {
        let temp_dir = TempDir::new().unwrap();
        let deep = temp_dir.path().join("b").join("c");
        fs::create_dir_all(&deep).unwrap();
        touch(temp_dir.path(), "z.png");
        touch(temp_dir.path(), "a.png");
        touch(&deep, "m.gif");

        let first = walk_all(temp_dir.path(), ScanConfig::default());
        let second = walk_all(temp_dir.path(), ScanConfig::default());

        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
        assert!(first[0].ends_with("a.png"));
        assert!(first[1].ends_with("b/c/m.gif"));
        assert!(first[2].ends_with("z.png"));
    }

    #[test]
    fn walk_skips_directories_named_like_images() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("album.png")).unwrap();
        touch(temp_dir.path(), "real.png");

        let paths = walk_all(temp_dir.path(), ScanConfig::default());

        assert_eq!(paths.len(), 1);
        assert!(paths[0].ends_with("real.png"));
    }

    #[test]
    fn walk_can_exclude_hidden_entries() {
        let temp_dir = TempDir::new().unwrap();
        let hidden_dir = temp_dir.path().join(".cache");
        fs::create_dir(&hidden_dir).unwrap();
        touch(&hidden_dir, "inside.png");
        touch(temp_dir.path(), ".hidden.png");
        touch(temp_dir.path(), "visible.png");

        let all = walk_all(temp_dir.path(), ScanConfig::default());
        assert_eq!(all.len(), 3);

        let visible = walk_all(temp_dir.path(), ScanConfig::default().include_hidden(false));
        assert_eq!(visible.len(), 1);
        assert!(visible[0].ends_with("visible.png"));
    }

    #[test]
    fn walk_reports_candidates_as_events() {
        use crate::events::EventChannel;

        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "a.png");

        let (sender, receiver) = EventChannel::new();
        let mut paths = ImageWalker::new(ScanConfig::default())
            .walk(temp_dir.path())
            .unwrap()
            .with_events(sender);

        assert!(paths.next().is_some());
        assert!(paths.next().is_none());
        assert_eq!(paths.yielded(), 1);
        assert!(paths.errors().is_empty());
        drop(paths);

        let events: Vec<_> = receiver.iter().collect();
        assert!(matches!(
            events.as_slice(),
            [Event::Scan(ScanEvent::CandidateFound { .. })]
        ));
    }
}
