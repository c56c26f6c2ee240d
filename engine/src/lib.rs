pub mod config;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod process;
pub mod protocol;
pub mod search;
pub mod session;
pub mod sync;

pub use config::{EngineCommand, EngineConfig};
pub use process::ProcessEngine;
pub use search::{BestMoveQuery, DepthProbe, ProbeOutcome, SearchPolicy, SearchReport, Suggestion};
pub use session::Session;
pub use sync::{PositionSync, SyncOutcome, SyncState};

use async_trait::async_trait;
use chess::Position;
use std::time::Duration;

/// How long a search query may think.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchBudget {
    Depth(u8),
    Time(Duration),
}

impl SearchBudget {
    pub fn depth(self) -> Option<u8> {
        match self {
            Self::Depth(depth) => Some(depth),
            Self::Time(_) => None,
        }
    }
}

/// The external engine as a capability. Every call is independent and
/// receives the full kifu; implementations keep no state between calls.
///
/// Implemented by [`ProcessEngine`] for the real binary and by stubs in
/// tests.
#[async_trait]
pub trait EngineBackend: Send + Sync {
    /// Replay `kifu` and return the engine's canonical board.
    async fn query_position(&self, kifu: &str) -> Result<Position, EngineError>;

    /// Replay `kifu` and return the engine's preferred next move token.
    async fn query_search(&self, kifu: &str, budget: SearchBudget) -> Result<String, EngineError>;
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Failed to launch engine `{program}`: {source}")]
    LaunchFailure {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Engine did not finish within {0:?}")]
    Timeout(Duration),
    #[error("Engine protocol error: {0}")]
    Protocol(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Engine has no stdin")]
    NoStdin,
    #[error("Engine has no stdout")]
    NoStdout,
    #[error("Engine has no stderr")]
    NoStderr,
    #[error("Board error: {0}")]
    Board(#[from] chess::ChessError),
}
