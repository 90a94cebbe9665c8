/// The game board model and its pure transition rules.
pub mod board;
/// Positional round resolution and final-mode slot assignment.
pub mod resolver;
mod sse;

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock, watch};
use tokio::task::JoinHandle;

use crate::{
    config::AppConfig, dao::board_store::BoardStore, error::ServiceError, state::board::GameBoard,
};

pub use self::sse::SseHub;
use self::sse::SseState;

/// Cheaply clonable handle to the [`AppState`].
pub type SharedState = Arc<AppState>;

/// Central application state: the live board, storage handle, and SSE hubs.
pub struct AppState {
    store: RwLock<Option<Arc<dyn BoardStore>>>,
    sse: SseState,
    board: RwLock<GameBoard>,
    /// Serializes every board mutation so read-modify-write cycles never interleave.
    board_gate: Mutex<()>,
    timer_task: Mutex<Option<JoinHandle<()>>>,
    degraded: watch::Sender<bool>,
    config: AppConfig,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is
    /// installed; the board starts from the seed value and is replaced by the
    /// persisted record once storage connects.
    pub fn new(config: AppConfig) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        let board = GameBoard::seed(
            config.default_team_a_name().to_owned(),
            config.default_team_b_name().to_owned(),
        );
        Arc::new(Self {
            store: RwLock::new(None),
            sse: SseState::new(16, 16),
            board: RwLock::new(board),
            board_gate: Mutex::new(()),
            timer_task: Mutex::new(None),
            degraded: degraded_tx,
            config,
        })
    }

    /// Immutable runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Obtain a handle to the current board store, if one is installed.
    pub async fn store(&self) -> Option<Arc<dyn BoardStore>> {
        let guard = self.store.read().await;
        guard.as_ref().cloned()
    }

    /// Obtain the board store or fail with a degraded-mode error.
    pub async fn require_store(&self) -> Result<Arc<dyn BoardStore>, ServiceError> {
        self.store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new board store implementation and leave degraded mode.
    pub async fn set_store(&self, store: Arc<dyn BoardStore>) {
        {
            let mut guard = self.store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false).await;
    }

    /// Current degraded flag.
    pub async fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Update and broadcast the degraded flag when the value changes.
    pub async fn update_degraded(&self, value: bool) {
        if *self.degraded.borrow() == value {
            return;
        }
        let _ = self.degraded.send(value);
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Broadcast hub used for the public SSE stream.
    pub fn public_sse(&self) -> &SseHub {
        self.sse.public()
    }

    /// Broadcast hub used for the admin SSE stream.
    pub fn admin_sse(&self) -> &SseHub {
        self.sse.admin().hub()
    }

    /// Token guard that ensures a single admin SSE subscriber at a time.
    pub fn admin_token(&self) -> &Mutex<Option<String>> {
        self.sse.admin().token()
    }

    /// Snapshot the current board value.
    pub async fn board(&self) -> GameBoard {
        self.board.read().await.clone()
    }

    /// Replace the in-memory board with a newly committed value.
    pub async fn install_board(&self, board: GameBoard) {
        *self.board.write().await = board;
    }

    /// Gate serializing all board mutations, including timer ticks.
    pub fn board_gate(&self) -> &Mutex<()> {
        &self.board_gate
    }

    /// Swap in a new countdown task (or none), aborting the previous one.
    pub async fn replace_timer_task(&self, handle: Option<JoinHandle<()>>) {
        let mut guard = self.timer_task.lock().await;
        if let Some(previous) = guard.take() {
            previous.abort();
        }
        *guard = handle;
    }
}
