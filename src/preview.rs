//! Background preview rendering for interactive shells.
//!
//! A slider drag produces a burst of recompute requests, and an event loop
//! must not block on the backend for any of them. [`PreviewPipeline`] moves
//! the backend onto a worker thread: submissions are sequence-numbered, the
//! newest sequence supersedes everything before it, and the worker discards
//! any job that is already stale when it dequeues it. A burst therefore
//! collapses to at most the job already in flight plus the newest one.
//!
//! Updates come back in sequence order from the single worker, and the
//! receiving side can always drain to the newest with
//! [`try_latest`](PreviewPipeline::try_latest) — so a stale result can
//! never overwrite a fresher one the shell has already applied.
//!
//! One-shot callers (like the CLI) don't need any of this; they drive an
//! [`Engine`](crate::engine::Engine) directly.

use crate::filtering::{BackendError, FilterBackend, FilterKind, RawImage, Strength, map_parameters};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// One recompute request: which source, which look.
///
/// The source rides in an `Arc` so a burst of jobs over the same picture
/// shares one buffer.
#[derive(Debug, Clone)]
pub struct PreviewJob {
    pub source: Arc<RawImage>,
    pub filter: FilterKind,
    pub strength: Strength,
}

/// A result delivered by the worker.
#[derive(Debug)]
pub enum PreviewUpdate {
    /// The preview for the job with this sequence number.
    Rendered { sequence: u64, image: RawImage },
    /// The backend failed for this job; the shell keeps its last preview.
    Failed {
        sequence: u64,
        error: BackendError,
    },
    /// The worker is gone; no further updates will arrive.
    Disconnected,
}

/// A worker thread owning a filter backend, fed over a channel.
pub struct PreviewPipeline {
    next_sequence: AtomicU64,
    latest_sequence: Arc<AtomicU64>,
    dropped: Arc<AtomicU64>,
    jobs: mpsc::Sender<(u64, PreviewJob)>,
    updates: mpsc::Receiver<PreviewUpdate>,
}

impl PreviewPipeline {
    /// Start a pipeline around `backend`.
    ///
    /// The worker exits when the pipeline is dropped.
    pub fn spawn<B>(backend: B) -> Self
    where
        B: FilterBackend + Send + 'static,
    {
        let (jobs_tx, jobs_rx) = mpsc::channel::<(u64, PreviewJob)>();
        let (updates_tx, updates_rx) = mpsc::channel();
        let latest_sequence = Arc::new(AtomicU64::new(0));
        let dropped = Arc::new(AtomicU64::new(0));

        let worker_latest = Arc::clone(&latest_sequence);
        let worker_dropped = Arc::clone(&dropped);
        thread::spawn(move || {
            while let Ok((sequence, job)) = jobs_rx.recv() {
                // A newer submission supersedes this job; skip the render.
                if sequence < worker_latest.load(Ordering::SeqCst) {
                    worker_dropped.fetch_add(1, Ordering::SeqCst);
                    continue;
                }
                let params = map_parameters(job.filter, job.strength);
                let update = match backend.apply(&job.source, job.filter, &params) {
                    Ok(image) => PreviewUpdate::Rendered { sequence, image },
                    Err(error) => PreviewUpdate::Failed { sequence, error },
                };
                if updates_tx.send(update).is_err() {
                    break;
                }
            }
        });

        Self {
            next_sequence: AtomicU64::new(0),
            latest_sequence,
            dropped,
            jobs: jobs_tx,
            updates: updates_rx,
        }
    }

    /// Enqueue a recompute and return its sequence number.
    ///
    /// Marks every earlier submission as superseded. Never blocks; if the
    /// worker has died the failure surfaces on the next poll as
    /// [`PreviewUpdate::Disconnected`].
    pub fn submit(&self, job: PreviewJob) -> u64 {
        let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst) + 1;
        self.latest_sequence.store(sequence, Ordering::SeqCst);
        let _ = self.jobs.send((sequence, job));
        sequence
    }

    /// Drain pending updates and return the newest, without blocking.
    pub fn try_latest(&self) -> Option<PreviewUpdate> {
        let mut newest = None;
        loop {
            match self.updates.try_recv() {
                Ok(update) => newest = Some(update),
                Err(mpsc::TryRecvError::Empty) => return newest,
                Err(mpsc::TryRecvError::Disconnected) => {
                    return Some(newest.unwrap_or(PreviewUpdate::Disconnected));
                }
            }
        }
    }

    /// Wait up to `timeout` for an update, then drain to the newest.
    pub fn wait_latest(&self, timeout: Duration) -> Option<PreviewUpdate> {
        match self.updates.recv_timeout(timeout) {
            Ok(update) => {
                // Something newer may already be queued behind it.
                match self.try_latest() {
                    Some(newer) => Some(newer),
                    None => Some(update),
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => None,
            Err(mpsc::RecvTimeoutError::Disconnected) => Some(PreviewUpdate::Disconnected),
        }
    }

    /// How many submissions were superseded before rendering.
    pub fn dropped_jobs(&self) -> u64 {
        self.dropped.load(Ordering::SeqCst)
    }
}
