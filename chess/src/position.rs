//! The 8x8 piece grid a game session displays and mutates.

use crate::types::{Piece, Square};
use crate::ChessError;

/// Raw grid, indexed `[rank][file]`.
pub type Grid = [[Option<Piece>; 8]; 8];

/// Board state. Holds no legality invariants; the engine's board dump is the
/// only source of truth and replaces it wholesale via [`Position::replace_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    squares: Grid,
}

impl Position {
    /// Empty board.
    pub fn empty() -> Self {
        Self {
            squares: [[None; 8]; 8],
        }
    }

    /// Standard starting setup.
    pub fn initial() -> Self {
        let board = cozy_chess::Board::default();
        let mut squares: Grid = [[None; 8]; 8];
        for sq in cozy_chess::Square::ALL {
            if let (Some(kind), Some(color)) = (board.piece_on(sq), board.color_on(sq)) {
                squares[sq.rank() as usize][sq.file() as usize] =
                    Some(Piece::new(kind.into(), color.into()));
            }
        }
        Self { squares }
    }

    pub fn get(&self, rank: u8, file: u8) -> Result<Option<Piece>, ChessError> {
        let sq = Square::new(rank, file)?;
        Ok(self.piece_at(sq))
    }

    pub fn set(&mut self, rank: u8, file: u8, piece: Option<Piece>) -> Result<(), ChessError> {
        let sq = Square::new(rank, file)?;
        self.put(sq, piece);
        Ok(())
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.rank() as usize][sq.file() as usize]
    }

    pub fn put(&mut self, sq: Square, piece: Option<Piece>) {
        self.squares[sq.rank() as usize][sq.file() as usize] = piece;
    }

    /// Swap in a complete grid. Only the engine sync calls this.
    pub fn replace_all(&mut self, squares: Grid) {
        self.squares = squares;
    }

    pub fn grid(&self) -> &Grid {
        &self.squares
    }

    pub fn piece_count(&self) -> usize {
        self.squares.iter().flatten().filter(|p| p.is_some()).count()
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::initial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PieceColor, PieceKind};

    #[test]
    fn test_initial_setup() {
        let pos = Position::initial();
        assert_eq!(pos.piece_count(), 32);
        assert_eq!(
            pos.get(0, 4).unwrap(),
            Some(Piece::new(PieceKind::King, PieceColor::White))
        );
        assert_eq!(
            pos.get(7, 3).unwrap(),
            Some(Piece::new(PieceKind::Queen, PieceColor::Black))
        );
        for file in 0..8 {
            assert_eq!(
                pos.get(1, file).unwrap(),
                Some(Piece::new(PieceKind::Pawn, PieceColor::White))
            );
            assert_eq!(
                pos.get(6, file).unwrap(),
                Some(Piece::new(PieceKind::Pawn, PieceColor::Black))
            );
            assert_eq!(pos.get(4, file).unwrap(), None);
        }
    }

    #[test]
    fn test_out_of_range_access() {
        let mut pos = Position::empty();
        assert!(matches!(
            pos.get(8, 0),
            Err(ChessError::InvalidCoordinate { rank: 8, file: 0 })
        ));
        assert!(matches!(
            pos.set(0, 9, None),
            Err(ChessError::InvalidCoordinate { rank: 0, file: 9 })
        ));
    }

    #[test]
    fn test_set_then_replace_all() {
        let mut pos = Position::empty();
        let rook = Piece::new(PieceKind::Rook, PieceColor::Black);
        pos.set(3, 3, Some(rook)).unwrap();
        assert_eq!(pos.get(3, 3).unwrap(), Some(rook));

        pos.replace_all(*Position::initial().grid());
        assert_eq!(pos, Position::initial());
    }
}
