//! Fixed-interval polling coordinator.
//!
//! This module provides the minimal periodic-task primitive around the
//! refresh pipeline:
//! - a fixed refresh interval (default one day), with no jitter and no
//!   backoff — a failed cycle is simply retried at the next interval
//! - serialized refreshes: the loop runs one cycle at a time, and manual
//!   triggers that arrive while a cycle is in flight are collapsed once it
//!   completes
//! - a last-good-result cache published on a watch channel for listeners
//! - shared state carrying the last failure (kind + placeholder map) for a
//!   UI layer to surface

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use icalendar::Calendar;
use tokio::sync::{RwLock, mpsc, watch};
use tracing::{debug, info, warn};

use crate::config::PollerConfig;
use crate::error::{UpdateError, UpdateErrorKind, UpdateResult};
use crate::pipeline::RefreshPipeline;

/// Commands that can be sent to the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorCommand {
    /// Trigger an immediate refresh.
    Refresh,
    /// Stop the coordinator.
    Stop,
}

/// The last failed refresh, as surfaced to a UI layer.
#[derive(Debug, Clone)]
pub struct LastFailure {
    /// Machine-readable failure kind.
    pub kind: UpdateErrorKind,
    /// Human-readable placeholders (`err`, and `timeout_s` for timeouts).
    pub placeholders: BTreeMap<String, String>,
    /// When the failure happened.
    pub at: DateTime<Utc>,
}

/// Coordinator state.
#[derive(Debug, Clone, Default)]
pub struct CoordinatorState {
    /// Last successful refresh time.
    pub last_success: Option<DateTime<Utc>>,
    /// Last refresh attempt time.
    pub last_attempt: Option<DateTime<Utc>>,
    /// Last failure, cleared on the next success.
    pub last_failure: Option<LastFailure>,
}

impl CoordinatorState {
    /// Records a successful refresh.
    pub fn record_success(&mut self) {
        self.last_success = Some(Utc::now());
        self.last_attempt = self.last_success;
        self.last_failure = None;
    }

    /// Records a failed refresh.
    pub fn record_failure(&mut self, err: &UpdateError) {
        self.last_attempt = Some(Utc::now());
        self.last_failure = Some(LastFailure {
            kind: err.kind(),
            placeholders: err.placeholders(),
            at: Utc::now(),
        });
    }

    /// Returns true if the source is currently unavailable.
    pub fn is_failing(&self) -> bool {
        self.last_failure.is_some()
    }
}

/// Shared coordinator state.
pub type SharedCoordinatorState = Arc<RwLock<CoordinatorState>>;

/// The coordinator drives the refresh pipeline on a fixed interval.
pub struct Coordinator {
    config: PollerConfig,
    pipeline: RefreshPipeline,
    state: SharedCoordinatorState,
    command_tx: mpsc::Sender<CoordinatorCommand>,
    command_rx: Option<mpsc::Receiver<CoordinatorCommand>>,
    data_tx: watch::Sender<Option<Arc<Calendar>>>,
}

impl Coordinator {
    /// Creates a coordinator with a fresh pipeline for the configured
    /// source.
    pub fn new(config: PollerConfig) -> UpdateResult<Self> {
        let pipeline = RefreshPipeline::new(config.source.clone())?;
        Ok(Self::with_pipeline(config, pipeline))
    }

    /// Creates a coordinator around an existing pipeline.
    pub fn with_pipeline(config: PollerConfig, pipeline: RefreshPipeline) -> Self {
        let (command_tx, command_rx) = mpsc::channel(16);
        let (data_tx, _) = watch::channel(None);
        Self {
            config,
            pipeline,
            state: Arc::new(RwLock::new(CoordinatorState::default())),
            command_tx,
            command_rx: Some(command_rx),
            data_tx,
        }
    }

    /// Returns a handle for commands, state, and data subscription.
    pub fn handle(&self) -> CoordinatorHandle {
        CoordinatorHandle {
            command_tx: self.command_tx.clone(),
            state: Arc::clone(&self.state),
            data_rx: self.data_tx.subscribe(),
        }
    }

    /// Runs the coordinator loop until stopped.
    ///
    /// An initial refresh runs immediately; after that, one refresh per
    /// interval, plus any manually triggered cycles.
    pub async fn run(mut self) {
        let mut command_rx = match self.command_rx.take() {
            Some(rx) => rx,
            None => return,
        };

        info!(
            url = %self.config.source.url,
            interval_secs = self.config.interval.as_secs(),
            "Coordinator started"
        );

        self.do_refresh().await;

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.config.interval) => {
                    debug!("Scheduled refresh");
                    self.do_refresh().await;
                }
                cmd = command_rx.recv() => {
                    match cmd {
                        Some(CoordinatorCommand::Refresh) => {
                            debug!("Manual refresh");
                            self.do_refresh().await;
                            // Collapse triggers that queued up while the
                            // cycle was in flight.
                            if drain_refreshes(&mut command_rx) {
                                break;
                            }
                        }
                        Some(CoordinatorCommand::Stop) | None => break,
                    }
                }
            }
        }

        info!("Coordinator stopped");
    }

    async fn do_refresh(&mut self) {
        match self.pipeline.refresh().await {
            Ok(calendar) => {
                self.state.write().await.record_success();
                self.data_tx.send_replace(Some(calendar));
            }
            Err(e) => {
                warn!(kind = e.kind().as_str(), error = %e, "Refresh failed");
                self.state.write().await.record_failure(&e);
            }
        }
    }
}

/// Discards queued refresh commands; returns true if a stop was queued.
fn drain_refreshes(rx: &mut mpsc::Receiver<CoordinatorCommand>) -> bool {
    while let Ok(cmd) = rx.try_recv() {
        if cmd == CoordinatorCommand::Stop {
            return true;
        }
    }
    false
}

/// Handle for interacting with a running coordinator.
#[derive(Debug, Clone)]
pub struct CoordinatorHandle {
    command_tx: mpsc::Sender<CoordinatorCommand>,
    state: SharedCoordinatorState,
    data_rx: watch::Receiver<Option<Arc<Calendar>>>,
}

impl CoordinatorHandle {
    /// Triggers an immediate refresh.
    pub async fn refresh(&self) -> Result<(), mpsc::error::SendError<CoordinatorCommand>> {
        self.command_tx.send(CoordinatorCommand::Refresh).await
    }

    /// Stops the coordinator.
    pub async fn stop(&self) -> Result<(), mpsc::error::SendError<CoordinatorCommand>> {
        self.command_tx.send(CoordinatorCommand::Stop).await
    }

    /// Returns a snapshot of the coordinator state.
    pub async fn state(&self) -> CoordinatorState {
        self.state.read().await.clone()
    }

    /// Returns the latest successfully parsed calendar, if any.
    pub fn latest(&self) -> Option<Arc<Calendar>> {
        self.data_rx.borrow().clone()
    }

    /// Returns a receiver notified whenever a refresh succeeds.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<Calendar>>> {
        self.data_rx.clone()
    }
}
