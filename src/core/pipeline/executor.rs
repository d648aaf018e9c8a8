//! Scan pass execution.

use super::CancellationToken;
use crate::core::comparator::{DuplicateIndex, ScanResult};
use crate::core::hasher::{HashComputer, HashOutcome, HasherConfig};
use crate::core::scanner::{ImageWalker, ScanConfig};
use crate::error::DuplicateFinderError;
use crate::events::{
    null_sender, Event, EventSender, HashEvent, HashProgress, PipelineEvent, PipelineSummary,
    ScanEvent,
};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// Outcome of one scan pass
#[derive(Debug, Clone)]
pub struct ScanRun {
    /// Duplicate groups; empty when the pass was cancelled
    pub result: ScanResult,
    /// Candidate files examined
    pub files_scanned: usize,
    /// Files that produced a fingerprint
    pub files_hashed: usize,
    /// Files that produced no fingerprint
    pub files_skipped: usize,
    /// Directory entries that could not be read
    pub walk_errors: usize,
    /// Whether the pass stopped on a cancellation request
    pub cancelled: bool,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

/// Configuration for a scan pass
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory to scan
    pub root: PathBuf,
    /// Candidate discovery
    pub scan: ScanConfig,
    /// Fingerprinting
    pub hasher: HasherConfig,
    /// Candidates pulled from the walker per parallel batch
    pub batch_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::new(),
            scan: ScanConfig::default(),
            hasher: HasherConfig::default(),
            batch_size: 64,
        }
    }
}

/// Builder for pipeline configuration
#[derive(Debug, Default)]
pub struct PipelineBuilder {
    config: PipelineConfig,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the directory to scan
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.root = root.into();
        self
    }

    /// Replace the extension allow-list
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.config.scan = self.config.scan.with_extensions(extensions);
        self
    }

    /// Include hidden files and directories
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.config.scan.include_hidden = include;
        self
    }

    /// Follow symbolic links
    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.config.scan.follow_symlinks = follow;
        self
    }

    /// Set the scanner configuration wholesale
    pub fn scan_config(mut self, config: ScanConfig) -> Self {
        self.config.scan = config;
        self
    }

    /// Set the normalisation bound
    pub fn max_dimension(mut self, max_dimension: u32) -> Self {
        self.config.hasher.max_dimension = max_dimension;
        self
    }

    /// Set the pHash grid size
    pub fn hash_size(mut self, hash_size: u32) -> Self {
        self.config.hasher.hash_size = hash_size;
        self
    }

    /// Set how many candidates are hashed per parallel batch
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.config.batch_size = batch_size;
        self
    }

    /// Validate the configuration and build the pipeline
    pub fn build(self) -> Result<Pipeline, DuplicateFinderError> {
        let config = self.config;
        config.scan.validate()?;
        if config.batch_size == 0 {
            return Err(DuplicateFinderError::Config(
                "batch size must be at least 1".to_string(),
            ));
        }

        Ok(Pipeline {
            walker: ImageWalker::new(config.scan.clone()),
            computer: HashComputer::new(config.hasher)?,
            config,
        })
    }
}

/// One configured scan over one root
pub struct Pipeline {
    config: PipelineConfig,
    walker: ImageWalker,
    computer: HashComputer,
}

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn root(&self) -> &Path {
        &self.config.root
    }

    /// Run to completion without events or cancellation
    pub fn run(&self) -> Result<ScanRun, DuplicateFinderError> {
        self.run_with(&CancellationToken::new(), &null_sender())
    }

    /// Run one pass.
    ///
    /// Fails only when the root is missing or not a directory, before any
    /// file is hashed. Per-file problems are counted, logged and skipped.
    pub fn run_with(
        &self,
        cancel: &CancellationToken,
        events: &EventSender,
    ) -> Result<ScanRun, DuplicateFinderError> {
        let start_time = Instant::now();
        let root = self.config.root.clone();

        events.send(Event::Pipeline(PipelineEvent::Started { root: root.clone() }));

        let mut candidates = match self.walker.walk(&root) {
            Ok(paths) => paths.with_events(events.clone()),
            Err(error) => {
                warn!(root = %root.display(), error = %error, "scan root rejected");
                events.send(Event::Pipeline(PipelineEvent::Error {
                    message: error.to_string(),
                }));
                return Err(error.into());
            }
        };

        events.send(Event::Scan(ScanEvent::Started { root: root.clone() }));
        info!(root = %root.display(), "scan started");

        let mut index = DuplicateIndex::new();
        let mut files_scanned = 0usize;
        let mut files_hashed = 0usize;
        let mut files_skipped = 0usize;
        let mut cancelled = false;

        while !cancelled {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            let batch: Vec<PathBuf> = candidates.by_ref().take(self.config.batch_size).collect();
            if batch.is_empty() {
                break;
            }

            // Indexed parallel collect keeps discovery order
            let outcomes: Vec<(PathBuf, Option<HashOutcome>)> = batch
                .into_par_iter()
                .map(|path| {
                    if cancel.is_cancelled() {
                        return (path, None);
                    }
                    let outcome = self.computer.hash_file(&path);
                    (path, Some(outcome))
                })
                .collect();

            for (path, outcome) in outcomes {
                let Some(outcome) = outcome else {
                    cancelled = true;
                    continue;
                };

                files_scanned += 1;
                match outcome {
                    HashOutcome::Hashed(fingerprint) => {
                        files_hashed += 1;
                        index.record(path.clone(), Some(fingerprint));
                    }
                    HashOutcome::Skipped(error) => {
                        files_skipped += 1;
                        events.send(Event::Hash(HashEvent::Skipped {
                            path: path.clone(),
                            message: error.to_string(),
                        }));
                    }
                }

                events.send(Event::Hash(HashEvent::Progress(HashProgress {
                    completed: files_scanned,
                    skipped: files_skipped,
                    current_path: path,
                })));
            }
        }

        let walk_errors = candidates.errors().len();
        events.send(Event::Scan(ScanEvent::Completed {
            total_candidates: candidates.yielded(),
        }));
        events.send(Event::Hash(HashEvent::Completed {
            total_hashed: files_hashed,
            skipped: files_skipped,
        }));

        let duration_ms = start_time.elapsed().as_millis() as u64;

        if cancelled {
            drop(index);
            info!(root = %root.display(), files_scanned, "scan cancelled");
            events.send(Event::Pipeline(PipelineEvent::Cancelled));

            return Ok(ScanRun {
                result: ScanResult::empty(),
                files_scanned,
                files_hashed,
                files_skipped,
                walk_errors,
                cancelled: true,
                duration_ms,
            });
        }

        let result = index.finish();

        info!(
            root = %root.display(),
            files_scanned,
            files_hashed,
            files_skipped,
            groups = result.len(),
            duration_ms,
            "scan completed"
        );

        events.send(Event::Pipeline(PipelineEvent::Completed {
            summary: PipelineSummary {
                files_scanned,
                files_hashed,
                files_skipped,
                duplicate_groups: result.len(),
                redundant_files: result.redundant_count(),
                duration_ms,
            },
        }));

        Ok(ScanRun {
            result,
            files_scanned,
            files_hashed,
            files_skipped,
            walk_errors,
            cancelled: false,
            duration_ms,
        })
    }
}
