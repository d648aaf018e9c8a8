//! Background scan ownership.

use super::{CancellationToken, Pipeline, ScanRun};
use crate::core::comparator::ScanResult;
use crate::error::DuplicateFinderError;
use crate::events::{EventChannel, EventReceiver, EventSender};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::debug;

/// Runs scan passes off the caller's thread, one at a time.
///
/// Starting a scan cancels whichever scan this controller started before,
/// so a stale pass can never be mistaken for the current one: waiting on a
/// superseded handle yields a cancelled run with an empty result, even if
/// that pass had already finished.
#[derive(Debug, Default)]
pub struct ScanController {
    active: Option<CancellationToken>,
    generation: Arc<AtomicU64>,
}

impl ScanController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `pipeline` on a dedicated thread and return its handle plus a
    /// receiver for its progress events.
    pub fn start(
        &mut self,
        pipeline: Pipeline,
    ) -> Result<(ScanHandle, EventReceiver), DuplicateFinderError> {
        let (sender, receiver) = EventChannel::new();
        let handle = self.start_with_events(pipeline, sender)?;
        Ok((handle, receiver))
    }

    /// Start `pipeline`, reporting progress on an existing sender
    pub fn start_with_events(
        &mut self,
        pipeline: Pipeline,
        events: EventSender,
    ) -> Result<ScanHandle, DuplicateFinderError> {
        self.cancel_active();

        let token = CancellationToken::new();
        let worker_token = token.clone();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let join = thread::Builder::new()
            .name(format!("scan-{generation}"))
            .spawn(move || pipeline.run_with(&worker_token, &events))
            .map_err(|e| DuplicateFinderError::Worker(format!("failed to spawn scan thread: {e}")))?;

        debug!(generation, "scan thread started");
        self.active = Some(token.clone());

        Ok(ScanHandle {
            token,
            join,
            generation,
            current: Arc::clone(&self.generation),
        })
    }

    /// Cancel the running scan, if any
    pub fn cancel_active(&mut self) {
        if let Some(token) = self.active.take() {
            debug!(
                generation = self.generation.load(Ordering::SeqCst),
                "cancelling previous scan"
            );
            token.cancel();
        }
    }

    /// Whether `handle` belongs to the most recently started scan
    pub fn is_current(&self, handle: &ScanHandle) -> bool {
        self.active.is_some()
            && Arc::ptr_eq(&self.generation, &handle.current)
            && !handle.is_superseded()
    }
}

impl Drop for ScanController {
    fn drop(&mut self) {
        self.cancel_active();
    }
}

/// Handle to one background scan
#[derive(Debug)]
pub struct ScanHandle {
    token: CancellationToken,
    join: JoinHandle<Result<ScanRun, DuplicateFinderError>>,
    generation: u64,
    current: Arc<AtomicU64>,
}

impl ScanHandle {
    /// Ask the scan to stop after the file it is currently hashing
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// A token that cancels this scan, e.g. for a signal handler
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Whether a later scan was started on the same controller
    pub fn is_superseded(&self) -> bool {
        self.current.load(Ordering::SeqCst) != self.generation
    }

    /// Block until the scan ends and take its single result.
    ///
    /// A superseded scan reports `cancelled` with an empty result; its
    /// counters are kept.
    pub fn wait(self) -> Result<ScanRun, DuplicateFinderError> {
        let run = match self.join.join() {
            Ok(result) => result?,
            Err(_) => {
                return Err(DuplicateFinderError::Worker(
                    "scan thread panicked".to_string(),
                ))
            }
        };

        if self.current.load(Ordering::SeqCst) != self.generation {
            debug!(generation = self.generation, "discarding superseded scan result");
            return Ok(ScanRun {
                result: ScanResult::empty(),
                cancelled: true,
                ..run
            });
        }

        Ok(run)
    }
}
