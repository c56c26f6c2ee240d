//! Configuration for the kifuview CLI.
//!
//! Every value has a compile-time default and can be overridden at runtime
//! via a dedicated environment variable. Command-line flags override both.

use engine::EngineCommand;
use std::path::PathBuf;

/// Default seconds allowed for a position sync.
const DEFAULT_SYNC_TIMEOUT_SECS: u64 = 5;

/// Default search policy name.
const DEFAULT_SEARCH_POLICY: &str = "multi";

/// Default time budget for the single-search policy (in seconds).
const DEFAULT_SEARCH_BUDGET_SECS: u64 = 3;

/// Default address of the viewer page that share links point at.
const DEFAULT_BASE_ADDRESS: &str = "http://localhost:8501/";

/// Get the command line that launches the engine.
///
/// Priority:
/// 1. `KIFUVIEW_ENGINE_CMD` env variable if set and not blank
/// 2. `cargo run --release --` as fallback
pub fn get_engine_command() -> EngineCommand {
    std::env::var("KIFUVIEW_ENGINE_CMD")
        .ok()
        .and_then(|line| EngineCommand::parse(&line))
        .unwrap_or_default()
}

/// Get the directory the engine is launched from, if configured.
///
/// Reads `KIFUVIEW_ENGINE_DIR`; `None` means the current directory.
pub fn get_engine_dir() -> Option<PathBuf> {
    std::env::var("KIFUVIEW_ENGINE_DIR").ok().map(PathBuf::from)
}

/// Get the position sync timeout in seconds.
///
/// Priority:
/// 1. `KIFUVIEW_SYNC_TIMEOUT_SECS` env variable if set (falls back to default
///    if the value cannot be parsed as a `u64`)
/// 2. `5` seconds as fallback
pub fn get_sync_timeout_secs() -> u64 {
    if let Ok(timeout) = std::env::var("KIFUVIEW_SYNC_TIMEOUT_SECS") {
        return timeout.parse().unwrap_or(DEFAULT_SYNC_TIMEOUT_SECS);
    }

    DEFAULT_SYNC_TIMEOUT_SECS
}

/// Get the search policy name: `multi` or `single`.
pub fn get_search_policy() -> String {
    std::env::var("KIFUVIEW_SEARCH_POLICY").unwrap_or_else(|_| DEFAULT_SEARCH_POLICY.to_string())
}

/// Get the single-search time budget in seconds.
///
/// Priority:
/// 1. `KIFUVIEW_SEARCH_BUDGET_SECS` env variable if set (falls back to
///    default if unparsable)
/// 2. `3` seconds as fallback
pub fn get_search_budget_secs() -> u64 {
    if let Ok(budget) = std::env::var("KIFUVIEW_SEARCH_BUDGET_SECS") {
        return budget.parse().unwrap_or(DEFAULT_SEARCH_BUDGET_SECS);
    }

    DEFAULT_SEARCH_BUDGET_SECS
}

/// Get the directory for rolling log files.
///
/// Reads `KIFUVIEW_LOG_DIR`. When unset, logs go to stderr.
pub fn get_log_dir() -> Option<PathBuf> {
    std::env::var("KIFUVIEW_LOG_DIR").ok().map(PathBuf::from)
}

/// Get the viewer page address used for share links.
///
/// Priority:
/// 1. `KIFUVIEW_BASE_ADDRESS` env variable if set
/// 2. `http://localhost:8501/` as fallback
pub fn get_base_address() -> String {
    std::env::var("KIFUVIEW_BASE_ADDRESS").unwrap_or_else(|_| DEFAULT_BASE_ADDRESS.to_string())
}
