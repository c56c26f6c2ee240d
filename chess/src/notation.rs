//! Move notation tokens as recorded in the kifu.
//!
//! A token is `prefix + from + [x] + to + [=Q]`, e.g. `Ng1f3`, `e4xd5`,
//! `e7e8=Q`. Castling is written `O-O` / `O-O-O` and carries no squares.
//! Only the encoding direction exists here; replaying tokens is the
//! engine's job.

use crate::types::{Piece, PieceColor, PieceKind, Square};

pub const CASTLE_KINGSIDE: &str = "O-O";
pub const CASTLE_QUEENSIDE: &str = "O-O-O";

/// Classification of a (from, to) pair given the moving piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveShape {
    Castle { kingside: bool },
    Normal { capture: bool, promotion: bool },
}

/// Piece letter used as token prefix. Pawns have none.
pub fn piece_prefix(kind: PieceKind) -> Option<char> {
    match kind {
        PieceKind::King => Some('K'),
        PieceKind::Queen => Some('Q'),
        PieceKind::Rook => Some('R'),
        PieceKind::Bishop => Some('B'),
        PieceKind::Knight => Some('N'),
        PieceKind::Pawn => None,
    }
}

/// A pawn reaching the far rank for its side. Always promotes to a queen.
pub fn is_promotion(piece: Piece, to: Square) -> bool {
    if piece.kind != PieceKind::Pawn {
        return false;
    }
    match piece.color {
        PieceColor::White => to.rank() == 7,
        PieceColor::Black => to.rank() == 0,
    }
}

/// King moving exactly two files along its rank.
pub fn castling_side(piece: Piece, from: Square, to: Square) -> Option<bool> {
    if piece.kind != PieceKind::King || from.rank() != to.rank() {
        return None;
    }
    match to.file() as i8 - from.file() as i8 {
        2 => Some(true),
        -2 => Some(false),
        _ => None,
    }
}

/// Classify a move. `capture` is whether the destination was occupied
/// before the move was applied.
pub fn classify(piece: Piece, from: Square, to: Square, capture: bool) -> MoveShape {
    match castling_side(piece, from, to) {
        Some(kingside) => MoveShape::Castle { kingside },
        None => MoveShape::Normal {
            capture,
            promotion: is_promotion(piece, to),
        },
    }
}

/// Build the notation token for a move.
pub fn encode_move(piece: Piece, from: Square, to: Square, capture: bool) -> String {
    match classify(piece, from, to, capture) {
        MoveShape::Castle { kingside: true } => CASTLE_KINGSIDE.to_string(),
        MoveShape::Castle { kingside: false } => CASTLE_QUEENSIDE.to_string(),
        MoveShape::Normal { capture, promotion } => {
            let mut token = String::with_capacity(8);
            if let Some(prefix) = piece_prefix(piece.kind) {
                token.push(prefix);
            }
            token.push_str(&from.to_string());
            if capture {
                token.push('x');
            }
            token.push_str(&to.to_string());
            if promotion {
                token.push_str("=Q");
            }
            token
        }
    }
}
