//! Keeps the local board in step with the engine's canonical position.

use crate::{EngineBackend, EngineError};
use chess::GameState;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Syncing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Empty history: the initial setup is already canonical, no engine call.
    Skipped,
    /// The board was replaced with the engine's dump.
    Replaced,
}

/// Holds `Syncing` for as long as a query is in flight, including when the
/// sync future is dropped mid-await.
struct SyncingGuard<'a>(&'a mut SyncState);

impl<'a> SyncingGuard<'a> {
    fn enter(state: &'a mut SyncState) -> Self {
        *state = SyncState::Syncing;
        Self(state)
    }
}

impl Drop for SyncingGuard<'_> {
    fn drop(&mut self) {
        *self.0 = SyncState::Idle;
    }
}

/// Pushes the full kifu to the engine and pulls back its board.
///
/// Sync is all-or-nothing: on any failure the position is left as it was.
pub struct PositionSync {
    backend: Arc<dyn EngineBackend>,
    timeout: Duration,
    state: SyncState,
    last_error: Option<EngineError>,
}

impl PositionSync {
    pub fn new(backend: Arc<dyn EngineBackend>, timeout: Duration) -> Self {
        Self {
            backend,
            timeout,
            state: SyncState::Idle,
            last_error: None,
        }
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Cause of the most recent failed sync, cleared by a successful one.
    pub fn last_error(&self) -> Option<&EngineError> {
        self.last_error.as_ref()
    }

    /// Sync and report the failure cause.
    #[tracing::instrument(level = "debug", skip_all, fields(plies = game.history().len()))]
    pub async fn sync_checked(&mut self, game: &mut GameState) -> Result<SyncOutcome, EngineError> {
        let kifu = game.kifu();
        if kifu.is_empty() {
            tracing::debug!("Empty history, nothing to sync");
            return Ok(SyncOutcome::Skipped);
        }

        let result = {
            let _syncing = SyncingGuard::enter(&mut self.state);
            tokio::time::timeout(self.timeout, self.backend.query_position(&kifu))
                .await
                .unwrap_or_else(|_| Err(EngineError::Timeout(self.timeout)))
        };

        let position = result?;
        game.replace_position(*position.grid());
        tracing::info!("Synced position after {} plies", game.history().len());
        Ok(SyncOutcome::Replaced)
    }

    /// Sync, turning every engine failure into `false`. The last good
    /// position stays on the board.
    pub async fn sync(&mut self, game: &mut GameState) -> bool {
        match self.sync_checked(game).await {
            Ok(_) => {
                self.last_error = None;
                true
            }
            Err(e) => {
                tracing::warn!("Position sync failed, keeping current board: {}", e);
                self.last_error = Some(e);
                false
            }
        }
    }
}
