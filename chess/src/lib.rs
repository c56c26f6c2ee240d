//! Position, notation and move history for the kifu viewer.
//!
//! Nothing here validates chess rules; the external engine is the authority
//! and its board dump overwrites the local [`Position`] after every move.

pub mod board_display;
pub mod game;
pub mod history;
pub mod notation;
pub mod position;
pub mod share;
pub mod types;

pub use game::{GameState, MoveRecord, Selection};
pub use history::History;
pub use position::{Grid, Position};
pub use types::{Piece, PieceColor, PieceKind, Square};

#[derive(Debug, thiserror::Error)]
pub enum ChessError {
    #[error("Invalid coordinate: rank {rank}, file {file}")]
    InvalidCoordinate { rank: u8, file: u8 },
    #[error("Invalid square name: {0}")]
    InvalidSquareName(String),
    #[error("No piece on {0}")]
    NoPieceOn(Square),
    #[error("Malformed history string: {0}")]
    MalformedHistoryString(String),
}
