use crate::EngineError;
use chess::{Piece, Position};

/// Prefix of commentary and board-row lines.
pub const MARKER: char = ';';

/// Marker, rank number and eight piece codes.
const BOARD_ROW_FIELDS: usize = 10;

/// Parse the engine's board dump into a fresh position.
///
/// Each row looks like `; 8 r n b q k b n r` and sets the rank it names, in
/// whatever order the rows arrive. Non-marker lines and short lines are
/// skipped, as are rows whose rank is not 1..=8. Unknown piece codes leave
/// the cell empty. A dump without a single usable row is a protocol error.
pub fn parse_board_dump(output: &str) -> Result<Position, EngineError> {
    let mut position = Position::empty();
    let mut rows = 0;

    for line in output.lines() {
        if !line.starts_with(MARKER) {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < BOARD_ROW_FIELDS {
            continue;
        }

        let rank = match fields[1].parse::<u8>() {
            Ok(n @ 1..=8) => n - 1,
            _ => {
                tracing::trace!("Skipping dump line with bad rank: {}", line);
                continue;
            }
        };

        for (file, code) in fields[2..BOARD_ROW_FIELDS].iter().enumerate() {
            position.set(rank, file as u8, parse_piece_code(code))?;
        }
        rows += 1;
    }

    if rows == 0 {
        return Err(EngineError::Protocol(
            "board dump contained no board rows".to_string(),
        ));
    }

    Ok(position)
}

fn parse_piece_code(code: &str) -> Option<Piece> {
    let mut chars = code.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Piece::from_code(c),
        _ => None,
    }
}

/// The first line of the trimmed output that is not marker commentary.
///
/// Only that line counts: if it is blank the engine gave no move, even when
/// a later line holds text.
pub fn parse_answer(output: &str) -> Result<String, EngineError> {
    let answer = output
        .trim()
        .lines()
        .find(|line| !line.starts_with(MARKER))
        .map(str::trim)
        .unwrap_or_default();

    if answer.is_empty() {
        return Err(EngineError::Protocol("engine printed no move".to_string()));
    }
    Ok(answer.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess::{PieceColor, PieceKind};

    const START_DUMP: &str = "\
;
; 8 r n b q k b n r
; 7 p p p p p p p p
; 6 . . . . . . . .
; 5 . . . . . . . .
; 4 . . . . . . . .
; 3 . . . . . . . .
; 2 P P P P P P P P
; 1 R N B Q K B N R
";

    #[test]
    fn test_starting_dump() {
        let position = parse_board_dump(START_DUMP).unwrap();
        assert_eq!(position, Position::initial());
    }

    #[test]
    fn test_rows_in_any_order() {
        let dump = "; 1 R . . . K . . R\nnoise line\n; 8 r n b q k b n r\n";
        let position = parse_board_dump(dump).unwrap();

        let back_rank = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for (file, kind) in back_rank.into_iter().enumerate() {
            assert_eq!(
                position.get(7, file as u8).unwrap(),
                Some(Piece::new(kind, PieceColor::Black))
            );
        }
        assert_eq!(
            position.get(0, 4).unwrap(),
            Some(Piece::new(PieceKind::King, PieceColor::White))
        );
        assert_eq!(position.get(0, 1).unwrap(), None);
        assert_eq!(position.piece_count(), 11);
    }

    #[test]
    fn test_skips_unusable_lines() {
        let dump = "\
e2e4
; 8 r n b
; x r n b q k b n r
; 9 r n b q k b n r
; 4 . . . . P . . .
";
        let position = parse_board_dump(dump).unwrap();
        assert_eq!(position.piece_count(), 1);
        assert_eq!(
            position.get(3, 4).unwrap(),
            Some(Piece::new(PieceKind::Pawn, PieceColor::White))
        );
    }

    #[test]
    fn test_unknown_codes_are_empty() {
        let position = parse_board_dump("; 2 P ? P xx P P P P").unwrap();
        assert_eq!(position.get(1, 1).unwrap(), None);
        assert_eq!(position.get(1, 3).unwrap(), None);
        assert_eq!(position.piece_count(), 6);
    }

    #[test]
    fn test_dump_without_rows() {
        assert!(matches!(
            parse_board_dump("Failed at ply 1\n"),
            Err(EngineError::Protocol(_))
        ));
    }

    #[test]
    fn test_answer_skips_commentary() {
        let output = "; Using opening book\nNg1f3\n;\n; 8 r n b q k b n r\n";
        assert_eq!(parse_answer(output).unwrap(), "Ng1f3");
        assert_eq!(parse_answer("  e7e5  \r\n").unwrap(), "e7e5");
        assert_eq!(parse_answer("\n\n  d2d4\n").unwrap(), "d2d4");
    }

    #[test]
    fn test_blank_answer_line_is_no_move() {
        let output = "; Using opening book\n\nNg1f3\n";
        assert!(matches!(parse_answer(output), Err(EngineError::Protocol(_))));
    }

    #[test]
    fn test_answer_missing() {
        assert!(matches!(
            parse_answer(";\n; 8 r n b q k b n r\n"),
            Err(EngineError::Protocol(_))
        ));
        assert!(parse_answer("").is_err());
    }
}
