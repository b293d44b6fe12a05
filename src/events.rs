//! Shred log events and the single-consumer log channel.
//!
//! Workers never write to a log sink directly. Each event is sent over a
//! channel and one drain thread forwards events, in arrival order, to the
//! caller's [`LogSink`].

use crossbeam_channel::{Receiver, Sender};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::time::Duration;

/// Something worth logging that happened during a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum ShredEvent {
    /// A batch was started.
    BatchStarted { files: usize, algorithm: String },
    /// One overwrite pass finished.
    Pass {
        path: PathBuf,
        index: usize,
        total: usize,
        bytes: u64,
    },
    /// A file was moved to a random name before removal.
    Renamed { from: PathBuf, to: PathBuf },
    /// A file was overwritten and removed.
    Shredded { path: PathBuf },
    /// Dry run: the file would have been shredded.
    DryRun { path: PathBuf },
    /// A zero-length file was removed without overwriting.
    RemovedEmpty { path: PathBuf },
    /// The target did not exist.
    NotFound { path: PathBuf },
    /// The file could not be shredded.
    Failed { path: PathBuf, detail: String },
    /// The control loop observed cancellation.
    Cancelled,
    /// A batch finished.
    BatchFinished {
        succeeded: usize,
        total: usize,
        elapsed: Duration,
    },
}

impl ShredEvent {
    /// Whether the event reports a problem.
    pub fn is_error(&self) -> bool {
        matches!(self, ShredEvent::Failed { .. } | ShredEvent::NotFound { .. })
    }
}

impl fmt::Display for ShredEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShredEvent::BatchStarted { files, algorithm } => write!(
                f,
                "Starting shredding of {} file(s) using {}",
                files, algorithm
            ),
            ShredEvent::Pass {
                path,
                index,
                total,
                bytes,
            } => write!(
                f,
                "Pass {}/{} on {} ({} bytes)",
                index,
                total,
                path.display(),
                bytes
            ),
            ShredEvent::Renamed { from, to } => {
                write!(f, "Renamed {} -> {}", from.display(), to.display())
            }
            ShredEvent::Shredded { path } => write!(f, "Successfully shredded: {}", path.display()),
            ShredEvent::DryRun { path } => write!(f, "[DRY RUN] Would shred {}", path.display()),
            ShredEvent::RemovedEmpty { path } => {
                write!(f, "Removed empty file: {}", path.display())
            }
            ShredEvent::NotFound { path } => write!(f, "File not found: {}", path.display()),
            ShredEvent::Failed { path, detail } => {
                write!(f, "Error shredding {}: {}", path.display(), detail)
            }
            ShredEvent::Cancelled => f.write_str("Operation cancelled by user."),
            ShredEvent::BatchFinished {
                succeeded,
                total,
                elapsed,
            } => write!(
                f,
                "Done: {}/{} files in {:.2}s",
                succeeded,
                total,
                elapsed.as_secs_f64()
            ),
        }
    }
}

/// Receives log events from the drain thread.
pub trait LogSink: Send {
    /// Handle one event.
    fn log(&mut self, event: &ShredEvent);
}

impl<F> LogSink for F
where
    F: FnMut(&ShredEvent) + Send,
{
    fn log(&mut self, event: &ShredEvent) {
        self(event)
    }
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&mut self, event: &ShredEvent) {
        match event {
            ShredEvent::Failed { .. } => tracing::error!("{}", event),
            ShredEvent::NotFound { .. } | ShredEvent::Cancelled => tracing::warn!("{}", event),
            ShredEvent::Pass { .. } => tracing::debug!("{}", event),
            _ => tracing::info!("{}", event),
        }
    }
}

/// Cloneable handle workers use to emit events.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: Option<Sender<ShredEvent>>,
}

impl EventSender {
    /// A sender that drops every event.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    /// Emit an event. Events sent after the drain has stopped are dropped.
    pub fn send(&self, event: ShredEvent) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }
}

/// Create a log channel. Pass the receiver to [`drain`] on a dedicated thread.
pub fn channel() -> (EventSender, Receiver<ShredEvent>) {
    let (tx, rx) = crossbeam_channel::unbounded();
    (EventSender { tx: Some(tx) }, rx)
}

/// Forward events to `sink` until every sender has been dropped.
///
/// A panicking sink is reported through `tracing` and the event skipped;
/// draining continues.
pub fn drain<S: LogSink + ?Sized>(rx: Receiver<ShredEvent>, sink: &mut S) {
    for event in rx {
        if panic::catch_unwind(AssertUnwindSafe(|| sink.log(&event))).is_err() {
            tracing::warn!("log sink panicked while handling: {}", event);
        }
    }
}
