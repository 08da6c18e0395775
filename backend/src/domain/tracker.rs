//! Elapsed-time trackers for feeding and sleep sessions.
//!
//! A tracker only remembers when it was started. Elapsed time is always
//! recomputed from that instant and the clock, so nothing drifts and there is
//! nothing to pause or resume. Feeding and sleep each get their own tracker
//! and may run at the same time.

use chrono::{DateTime, Local};
use log::info;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::clock::Clock;
use crate::domain::models::tracker::{elapsed_minutes, TrackerKind, TrackerStop};
use crate::errors::InvalidStateError;

pub struct ElapsedTracker {
    kind: TrackerKind,
    clock: Arc<dyn Clock>,
    started_at: Option<DateTime<Local>>,
}

impl ElapsedTracker {
    pub fn new(kind: TrackerKind, clock: Arc<dyn Clock>) -> Self {
        Self {
            kind,
            clock,
            started_at: None,
        }
    }

    pub fn kind(&self) -> TrackerKind {
        self.kind
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn started_at(&self) -> Option<DateTime<Local>> {
        self.started_at
    }

    /// Capture the current time and start running
    pub fn start(&mut self) -> Result<DateTime<Local>, InvalidStateError> {
        if self.started_at.is_some() {
            return Err(InvalidStateError::TrackerAlreadyRunning { tracker: self.kind });
        }
        let now = self.clock.now();
        self.started_at = Some(now);
        info!("Started {} tracker at {}", self.kind, now.format("%H:%M:%S"));
        Ok(now)
    }

    /// Whole minutes since start, `None` while idle
    pub fn elapsed_minutes(&self) -> Option<u32> {
        self.started_at
            .map(|started_at| elapsed_minutes(started_at, self.clock.now()))
    }

    /// Stop and hand back the session
    pub fn stop(&mut self) -> Result<TrackerStop, InvalidStateError> {
        let started_at = self
            .started_at
            .take()
            .ok_or(InvalidStateError::TrackerNotRunning { tracker: self.kind })?;
        let stopped_at = self.clock.now();
        let stop = TrackerStop {
            kind: self.kind,
            started_at,
            stopped_at,
            duration_minutes: elapsed_minutes(started_at, stopped_at),
        };
        info!("Stopped {} tracker after {} min", self.kind, stop.duration_minutes);
        Ok(stop)
    }

    /// Start a background ticker publishing this tracker's elapsed minutes
    pub fn spawn_ticker(&self, period: Duration) -> Result<ElapsedTicker, InvalidStateError> {
        let started_at = self
            .started_at
            .ok_or(InvalidStateError::TrackerNotRunning { tracker: self.kind })?;
        Ok(ElapsedTicker::spawn(started_at, self.clock.clone(), period))
    }
}

/// Polls the clock on a fixed cadence while a session runs.
///
/// Must be created inside a tokio runtime. The task is aborted when the
/// ticker is stopped or dropped.
pub struct ElapsedTicker {
    receiver: watch::Receiver<u32>,
    handle: JoinHandle<()>,
}

impl ElapsedTicker {
    pub fn spawn(started_at: DateTime<Local>, clock: Arc<dyn Clock>, period: Duration) -> Self {
        let (sender, receiver) = watch::channel(elapsed_minutes(started_at, clock.now()));

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                let minutes = elapsed_minutes(started_at, clock.now());
                // Only wake watchers when the minute count changes
                let changed = sender.send_if_modified(|current| {
                    if *current != minutes {
                        *current = minutes;
                        true
                    } else {
                        false
                    }
                });
                if !changed && sender.is_closed() {
                    break;
                }
            }
        });

        Self { receiver, handle }
    }

    /// Latest published value
    pub fn elapsed_minutes(&self) -> u32 {
        *self.receiver.borrow()
    }

    /// A handle for watching updates
    pub fn subscribe(&self) -> watch::Receiver<u32> {
        self.receiver.clone()
    }

    pub fn stop(self) {
        self.handle.abort();
    }
}

impl Drop for ElapsedTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
