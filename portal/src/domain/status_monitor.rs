//! Background refresh of the signed-in user's alumni status.
//!
//! A single task owns all resolution runs. Mounting runs one check
//! immediately; afterwards the interval, explicit refreshes and regained
//! visibility all feed the same loop. Triggers that arrive while a check is
//! in flight collapse into one follow-up check.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use mockable::Clock;
use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::domain::ports::AlumniStatusQuery;
use crate::domain::{AlumniIdentity, AlumniStatus};

/// Poll period used when none is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(120);

/// Monitor tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusMonitorConfig {
    /// Time between checks when nothing else triggers one.
    pub poll_interval: Duration,
}

impl Default for StatusMonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Latest published view of the user's status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    /// Normalized status; `None` means not registered (or not yet known).
    pub status: Option<AlumniStatus>,
    /// Whether a check is running.
    pub loading: bool,
    /// When the last completed check finished.
    pub checked_at: Option<DateTime<Utc>>,
}

impl StatusSnapshot {
    /// Snapshot before the first check completes.
    pub const fn initial() -> Self {
        Self {
            status: None,
            loading: true,
            checked_at: None,
        }
    }

    /// Whether at least one check has completed.
    pub fn is_settled(&self) -> bool {
        self.checked_at.is_some()
    }
}

impl Default for StatusSnapshot {
    fn default() -> Self {
        Self::initial()
    }
}

/// Spawns monitors.
pub struct StatusMonitor {
    query: Arc<dyn AlumniStatusQuery>,
    clock: Arc<dyn Clock>,
    config: StatusMonitorConfig,
}

impl StatusMonitor {
    /// Build a monitor over `query`.
    pub fn new(
        query: Arc<dyn AlumniStatusQuery>,
        clock: Arc<dyn Clock>,
        config: StatusMonitorConfig,
    ) -> Self {
        Self {
            query,
            clock,
            config,
        }
    }

    /// Start watching `identity` on the current Tokio runtime.
    pub fn spawn(&self, identity: AlumniIdentity) -> StatusMonitorHandle {
        let (publisher, receiver) = watch::channel(StatusSnapshot::initial());
        let trigger = Arc::new(Notify::new());
        let cancel = CancellationToken::new();
        let worker = MonitorTask {
            query: Arc::clone(&self.query),
            clock: Arc::clone(&self.clock),
            identity,
            poll_interval: self.config.poll_interval,
            publisher,
            trigger: Arc::clone(&trigger),
            cancel: cancel.clone(),
        };
        let task = tokio::spawn(worker.run());
        StatusMonitorHandle {
            receiver,
            trigger,
            visible: AtomicBool::new(true),
            cancel,
            task: Some(task),
        }
    }
}

struct MonitorTask {
    query: Arc<dyn AlumniStatusQuery>,
    clock: Arc<dyn Clock>,
    identity: AlumniIdentity,
    poll_interval: Duration,
    publisher: watch::Sender<StatusSnapshot>,
    trigger: Arc<Notify>,
    cancel: CancellationToken,
}

impl MonitorTask {
    async fn run(self) {
        let mut interval =
            tokio::time::interval_at(Instant::now() + self.poll_interval, self.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(
            email = %self.identity.email,
            poll_secs = self.poll_interval.as_secs(),
            "alumni status monitor started"
        );

        loop {
            if !self.check().await {
                break;
            }
            // Anything that ticked during the check is covered by it.
            interval.reset();
            tokio::select! {
                biased;
                () = self.cancel.cancelled() => break,
                () = self.trigger.notified() => debug!("alumni status refresh requested"),
                _ = interval.tick() => debug!("alumni status poll due"),
            }
        }
        debug!(email = %self.identity.email, "alumni status monitor stopped");
    }

    /// Run one resolution. Returns `false` once cancelled.
    async fn check(&self) -> bool {
        self.publisher.send_if_modified(|snapshot| {
            let was_loading = snapshot.loading;
            snapshot.loading = true;
            !was_loading
        });
        let status = tokio::select! {
            biased;
            () = self.cancel.cancelled() => return false,
            status = self.query.resolve(&self.identity) => status,
        };
        if self.cancel.is_cancelled() {
            return false;
        }
        self.publisher.send_replace(StatusSnapshot {
            status,
            loading: false,
            checked_at: Some(self.clock.utc()),
        });
        true
    }
}

/// Control surface for a running monitor. Dropping it stops the monitor.
pub struct StatusMonitorHandle {
    receiver: watch::Receiver<StatusSnapshot>,
    trigger: Arc<Notify>,
    visible: AtomicBool,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl StatusMonitorHandle {
    /// Receiver for snapshot updates.
    pub fn subscribe(&self) -> watch::Receiver<StatusSnapshot> {
        self.receiver.clone()
    }

    /// Latest snapshot.
    pub fn current(&self) -> StatusSnapshot {
        self.receiver.borrow().clone()
    }

    /// Ask for a check as soon as the monitor is idle.
    pub fn refresh(&self) {
        self.trigger.notify_one();
    }

    /// Report a visibility change; becoming visible triggers a check.
    pub fn visibility_changed(&self, visible: bool) {
        let was_visible = self.visible.swap(visible, Ordering::AcqRel);
        if visible && !was_visible {
            self.refresh();
        }
    }

    /// Whether the monitor has been stopped.
    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Stop without waiting for the task to finish.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Stop and wait for the task to exit.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                debug!(error = %err, "alumni status monitor task ended abnormally");
            }
        }
    }
}

impl Drop for StatusMonitorHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
