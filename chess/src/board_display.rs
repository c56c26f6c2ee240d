//! Plain-text board rendering for terminal output.

use crate::position::Position;
use crate::types::{PieceColor, Square};

const FILE_LABELS: &str = "  a b c d e f g h";

/// Render `position` with rank 8 on top. A selected square is bracketed.
pub fn render(position: &Position, selection: Option<Square>) -> String {
    let mut out = String::new();
    out.push_str(FILE_LABELS);
    out.push('\n');

    for (rank, row) in position.grid().iter().enumerate().rev() {
        out.push_str(&format!("{} ", rank + 1));
        for (file, cell) in row.iter().enumerate() {
            let glyph = match cell {
                Some(piece) => piece.glyph(),
                None if (rank + file) % 2 == 0 => '·',
                None => ' ',
            };
            let selected = selection
                .map(|sq| sq.rank() as usize == rank && sq.file() as usize == file)
                .unwrap_or(false);
            if selected {
                out.push('[');
                out.push(glyph);
                out.push(']');
            } else {
                out.push(glyph);
                out.push(' ');
            }
        }
        out.push_str(&format!("{}\n", rank + 1));
    }

    out.push_str(FILE_LABELS);
    out.push('\n');
    out
}

/// "White to move" / "Black to move".
pub fn turn_label(side: PieceColor) -> String {
    match side {
        PieceColor::White => "White to move".to_string(),
        PieceColor::Black => "Black to move".to_string(),
    }
}
