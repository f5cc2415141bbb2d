//! Scheduled refresh of the dashboard board.
//!
//! The refresh task belongs to the [`PollerHandle`] returned by
//! [`DashboardPoller::spawn`]; dropping the handle cancels the task, so no timer
//! outlives the component that started it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::repository::{ApplicationRepository, EvaluationTrigger};
use super::service::{ReviewService, ReviewServiceError};
use super::views::{ApplicationRowView, Badge, ConnectionState, DashboardBoard};

/// Shortest refresh period `spawn` accepts; shorter periods are raised to it.
pub const MIN_POLL_PERIOD: Duration = Duration::from_millis(10);

/// Anything that can produce the rows of the dashboard table.
pub trait BoardSource: Send + Sync + 'static {
    fn load_rows(&self, limit: usize) -> Result<Vec<ApplicationRowView>, ReviewServiceError>;
}

impl<R, E> BoardSource for ReviewService<R, E>
where
    R: ApplicationRepository + 'static,
    E: EvaluationTrigger + 'static,
{
    fn load_rows(&self, limit: usize) -> Result<Vec<ApplicationRowView>, ReviewServiceError> {
        self.list(limit)
    }
}

#[derive(Debug)]
struct BoardState {
    generation: u64,
    connection: ConnectionState,
    last_error: Option<String>,
    refreshed_at: Option<DateTime<Utc>>,
    rows: Vec<ApplicationRowView>,
}

/// Shared, read-mostly view of the latest board.
#[derive(Debug, Clone)]
pub struct SharedBoard {
    state: Arc<RwLock<BoardState>>,
}

impl Default for SharedBoard {
    fn default() -> Self {
        Self {
            state: Arc::new(RwLock::new(BoardState {
                generation: 0,
                connection: ConnectionState::Connecting,
                last_error: None,
                refreshed_at: None,
                rows: Vec::new(),
            })),
        }
    }
}

impl SharedBoard {
    pub async fn snapshot(&self) -> DashboardBoard {
        let state = self.state.read().await;
        DashboardBoard {
            generation: state.generation,
            connection: Badge::connection(state.connection),
            last_error: state.last_error.clone(),
            refreshed_at: state.refreshed_at,
            rows: state.rows.clone(),
        }
    }

    pub async fn connection(&self) -> ConnectionState {
        self.state.read().await.connection
    }

    /// Applies a poll result unless a newer one has already been applied.
    pub(crate) async fn apply(
        &self,
        generation: u64,
        result: Result<Vec<ApplicationRowView>, String>,
    ) -> bool {
        let mut state = self.state.write().await;
        if generation <= state.generation {
            debug!(generation, applied = state.generation, "discarding stale board refresh");
            return false;
        }

        state.generation = generation;
        match result {
            Ok(rows) => {
                state.connection = ConnectionState::Connected;
                state.last_error = None;
                state.refreshed_at = Some(Utc::now());
                state.rows = rows;
            }
            Err(message) => {
                state.connection = ConnectionState::Disconnected;
                state.last_error = Some(message);
            }
        }
        true
    }
}

/// Periodically reloads the board from a [`BoardSource`].
pub struct DashboardPoller<S> {
    source: Arc<S>,
    board: SharedBoard,
    limit: usize,
    next_generation: AtomicU64,
}

impl<S: BoardSource> DashboardPoller<S> {
    pub fn new(source: Arc<S>, limit: usize) -> Self {
        Self {
            source,
            board: SharedBoard::default(),
            limit,
            next_generation: AtomicU64::new(1),
        }
    }

    pub fn board(&self) -> SharedBoard {
        self.board.clone()
    }

    /// Reloads immediately; also serves as the manual reconnect action.
    pub async fn refresh_now(&self) -> DashboardBoard {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let source = self.source.clone();
        let limit = self.limit;

        let result = match tokio::task::spawn_blocking(move || source.load_rows(limit)).await {
            Ok(Ok(rows)) => Ok(rows),
            Ok(Err(err)) => Err(err.to_string()),
            Err(err) => Err(format!("board refresh task failed: {err}")),
        };

        if let Err(message) = &result {
            warn!(generation, error = %message, "board refresh failed");
        }
        self.board.apply(generation, result).await;
        self.board.snapshot().await
    }

    /// Starts the refresh loop. The first refresh runs immediately. Periods below
    /// [`MIN_POLL_PERIOD`] are clamped.
    pub fn spawn(self: Arc<Self>, period: Duration) -> PollerHandle {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let period = period.max(MIN_POLL_PERIOD);

        info!(interval_ms = period.as_millis() as u64, "starting dashboard poller");
        let task = tokio::spawn(async move {
            let mut timer = interval(period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = timer.tick() => {
                        self.refresh_now().await;
                    }
                }
            }
            debug!("dashboard poller stopped");
        });

        PollerHandle {
            cancel,
            task: Some(task),
        }
    }
}

/// Owns a running poller; cancelling happens on `shutdown` or drop.
#[derive(Debug)]
pub struct PollerHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Cancels the loop and waits for it to exit.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                warn!(error = %err, "dashboard poller ended abnormally");
            }
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
