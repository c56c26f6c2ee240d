//! A game session wired to the engine: selection events, resync after every
//! move attempt, advisory suggestions.

use crate::config::EngineConfig;
use crate::search::{BestMoveQuery, Suggestion};
use crate::sync::PositionSync;
use crate::{EngineBackend, EngineError};
use chess::{GameState, Selection, Square};
use std::sync::Arc;

pub struct Session {
    game: GameState,
    sync: PositionSync,
    search: BestMoveQuery,
}

impl Session {
    pub fn new(backend: Arc<dyn EngineBackend>, config: &EngineConfig) -> Self {
        Self {
            game: GameState::new(),
            sync: PositionSync::new(Arc::clone(&backend), config.sync_timeout),
            search: BestMoveQuery::new(backend, config.policy.clone()),
        }
    }

    /// Start from a persisted kifu. The board is rebuilt by the engine, not
    /// by replaying moves locally; if that fails the initial setup stays.
    pub async fn open(backend: Arc<dyn EngineBackend>, config: &EngineConfig, kifu: &str) -> Self {
        let mut session = Self::new(backend, config);
        session.game = GameState::from_kifu(kifu);
        if !session.sync.sync(&mut session.game).await {
            tracing::warn!("Could not rebuild position for loaded kifu");
        }
        session
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn last_sync_error(&self) -> Option<&EngineError> {
        self.sync.last_error()
    }

    /// Feed a square click. Any move attempt is followed by a resync.
    pub async fn click(&mut self, sq: Square) -> Selection {
        let selection = self.game.select(sq);
        if matches!(selection, Selection::Moved(_) | Selection::Rejected) {
            self.sync.sync(&mut self.game).await;
        }
        selection
    }

    pub fn reset(&mut self) {
        tracing::info!("Resetting game");
        self.game.reset();
    }

    pub async fn suggest(&self) -> Option<Suggestion> {
        self.search.suggest(self.game.history()).await
    }
}
