use crate::history::History;
use crate::notation::{self, MoveShape};
use crate::position::{Grid, Position};
use crate::types::{Piece, PieceColor, PieceKind, Square};
use crate::ChessError;

/// Position, history and pending selection of one session. They are created,
/// mutated and reset together; callers own the value and pass it down.
#[derive(Debug, Clone, Default)]
pub struct GameState {
    position: Position,
    history: History,
    selection: Option<Square>,
}

/// A move accepted into the history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub from: Square,
    pub to: Square,
    pub piece: Piece,            // Piece that made the move
    pub captured: Option<Piece>, // Whatever stood on `to` before the move
    pub token: String,
}

/// Result of a square selection event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// No source was pending; the square is now the source.
    Selected(Square),
    /// No source was pending and the square is empty.
    Ignored,
    /// The pending source was selected again.
    Cancelled,
    /// A move was attempted and recorded.
    Moved(MoveRecord),
    /// A move was attempted but the source square was empty.
    Rejected,
}

impl GameState {
    /// Standard starting position, empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// History taken from a kifu. The position stays at the initial setup
    /// until the engine sync replaces it.
    pub fn from_kifu(kifu: &str) -> Self {
        Self {
            position: Position::initial(),
            history: History::deserialize(kifu),
            selection: None,
        }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn selection(&self) -> Option<Square> {
        self.selection
    }

    pub fn kifu(&self) -> String {
        self.history.serialize()
    }

    /// Side to move, from history parity.
    pub fn side_to_move(&self) -> PieceColor {
        if self.history.len() % 2 == 0 {
            PieceColor::White
        } else {
            PieceColor::Black
        }
    }

    /// Handle a click on `sq`. The selection is always cleared after a move
    /// attempt, successful or not.
    pub fn select(&mut self, sq: Square) -> Selection {
        match self.selection.take() {
            None => {
                if self.position.piece_at(sq).is_some() {
                    self.selection = Some(sq);
                    Selection::Selected(sq)
                } else {
                    Selection::Ignored
                }
            }
            Some(from) if from == sq => Selection::Cancelled,
            Some(from) => match self.apply_move(from, sq) {
                Ok(record) => Selection::Moved(record),
                Err(_) => Selection::Rejected,
            },
        }
    }

    /// Move whatever stands on `from` to `to` and record the token.
    ///
    /// No legality checks. Promotions place a queen; castling moves only the
    /// king, the rook follows when the engine dump comes back.
    pub fn apply_move(&mut self, from: Square, to: Square) -> Result<MoveRecord, ChessError> {
        let piece = self
            .position
            .piece_at(from)
            .ok_or(ChessError::NoPieceOn(from))?;
        let captured = self.position.piece_at(to);

        let token = notation::encode_move(piece, from, to, captured.is_some());
        let landed = match notation::classify(piece, from, to, captured.is_some()) {
            MoveShape::Normal {
                promotion: true, ..
            } => Piece::new(PieceKind::Queen, piece.color),
            _ => piece,
        };

        self.position.put(from, None);
        self.position.put(to, Some(landed));
        self.history.append(token.clone());

        tracing::debug!("Recorded move {} ({} -> {})", token, from, to);

        Ok(MoveRecord {
            from,
            to,
            piece,
            captured,
            token,
        })
    }

    /// Overwrite the board with the engine's canonical dump.
    pub fn replace_position(&mut self, grid: Grid) {
        self.position.replace_all(grid);
    }

    /// Back to the starting position with an empty history.
    pub fn reset(&mut self) {
        self.position = Position::initial();
        self.history.clear();
        self.selection = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    #[test]
    fn test_opening_moves_build_kifu() {
        let mut game = GameState::new();
        assert_eq!(game.select(sq("e2")), Selection::Selected(sq("e2")));
        let Selection::Moved(record) = game.select(sq("e4")) else {
            panic!("expected a move");
        };
        assert_eq!(record.token, "e2e4");
        assert_eq!(game.selection(), None);

        game.select(sq("e7"));
        game.select(sq("e5"));

        assert_eq!(game.kifu(), "e2e4 e7e5");
        assert_eq!(game.side_to_move(), PieceColor::White);
        assert!(game.position().piece_at(sq("e2")).is_none());
        assert_eq!(
            game.position().piece_at(sq("e5")),
            Some(Piece::new(PieceKind::Pawn, PieceColor::Black))
        );
    }

    #[test]
    fn test_empty_square_selection_is_ignored() {
        let mut game = GameState::new();
        assert_eq!(game.select(sq("e4")), Selection::Ignored);
        assert_eq!(game.selection(), None);
        assert!(game.history().is_empty());
    }

    #[test]
    fn test_reselecting_source_cancels() {
        let mut game = GameState::new();
        game.select(sq("g1"));
        assert_eq!(game.select(sq("g1")), Selection::Cancelled);
        assert_eq!(game.selection(), None);
        assert!(game.history().is_empty());
    }

    #[test]
    fn test_capture_token() {
        let mut game = GameState::from_kifu("");
        game.apply_move(sq("e2"), sq("e4")).unwrap();
        game.apply_move(sq("d7"), sq("d5")).unwrap();
        let record = game.apply_move(sq("e4"), sq("d5")).unwrap();
        assert_eq!(record.token, "e4xd5");
        assert_eq!(
            record.captured,
            Some(Piece::new(PieceKind::Pawn, PieceColor::Black))
        );
    }

    #[test]
    fn test_promotion_places_queen() {
        let mut game = GameState::new();
        let mut grid = [[None; 8]; 8];
        grid[6][4] = Some(Piece::new(PieceKind::Pawn, PieceColor::White));
        game.replace_position(grid);

        let record = game.apply_move(sq("e7"), sq("e8")).unwrap();
        assert_eq!(record.token, "e7e8=Q");
        assert_eq!(
            game.position().piece_at(sq("e8")),
            Some(Piece::new(PieceKind::Queen, PieceColor::White))
        );
    }

    #[test]
    fn test_castling_moves_king_only() {
        let mut game = GameState::new();
        let mut grid = [[None; 8]; 8];
        grid[0][4] = Some(Piece::new(PieceKind::King, PieceColor::White));
        grid[0][7] = Some(Piece::new(PieceKind::Rook, PieceColor::White));
        game.replace_position(grid);

        let record = game.apply_move(sq("e1"), sq("g1")).unwrap();
        assert_eq!(record.token, "O-O");
        assert_eq!(
            game.position().piece_at(sq("g1")),
            Some(Piece::new(PieceKind::King, PieceColor::White))
        );
        assert_eq!(
            game.position().piece_at(sq("h1")),
            Some(Piece::new(PieceKind::Rook, PieceColor::White))
        );
    }

    #[test]
    fn test_move_from_empty_square_is_rejected() {
        let mut game = GameState::new();
        assert!(matches!(
            game.apply_move(sq("e4"), sq("e5")),
            Err(ChessError::NoPieceOn(_))
        ));
        assert!(game.history().is_empty());
    }

    #[test]
    fn test_reset() {
        let mut game = GameState::from_kifu("e2e4 e7e5");
        game.select(sq("g1"));
        game.reset();
        assert!(game.history().is_empty());
        assert_eq!(game.selection(), None);
        assert_eq!(*game.position(), Position::initial());
    }
}
