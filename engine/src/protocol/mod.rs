//! Line protocol spoken by the external engine.
//!
//! The engine is launched once per query with mode arguments, reads the kifu
//! from stdin until EOF, and writes its answer to stdout. Lines starting
//! with [`MARKER`] are commentary or board rows, never the answer.

pub mod parser;

pub use parser::{parse_answer, parse_board_dump, MARKER};

use crate::SearchBudget;

/// Arguments that put the engine in board-dump mode.
pub const POSITION_DUMP_ARGS: &[&str] = &["-p"];

/// Flag followed by a fixed search depth.
pub const DEPTH_FLAG: &str = "-d";

/// Flag followed by a search time budget in whole seconds.
pub const TIME_FLAG: &str = "-t";

/// Mode arguments for a search query.
pub fn search_args(budget: SearchBudget) -> Vec<String> {
    match budget {
        SearchBudget::Depth(depth) => vec![DEPTH_FLAG.to_string(), depth.to_string()],
        SearchBudget::Time(limit) => {
            // The engine only understands whole seconds; never ask for zero.
            let secs = limit.as_secs().max(1);
            vec![TIME_FLAG.to_string(), secs.to_string()]
        }
    }
}

pub fn position_args() -> Vec<String> {
    POSITION_DUMP_ARGS.iter().map(|s| s.to_string()).collect()
}
