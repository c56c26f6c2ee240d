//! Engine launch and query tunables.

use crate::search::SearchPolicy;
use std::path::PathBuf;
use std::time::Duration;

/// Default command line used to launch the engine: build and run it from
/// its project directory.
pub const DEFAULT_ENGINE_COMMAND: &str = "cargo run --release --";

/// Default time allowed for a position sync.
pub const DEFAULT_SYNC_TIMEOUT: Duration = Duration::from_secs(5);

/// Program plus leading arguments. Mode arguments are appended per query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl EngineCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Split a command line on whitespace. Returns `None` for a blank line.
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace().map(str::to_string);
        let program = words.next()?;
        Some(Self {
            program,
            args: words.collect(),
        })
    }
}

impl Default for EngineCommand {
    fn default() -> Self {
        Self::parse(DEFAULT_ENGINE_COMMAND).unwrap_or_else(|| Self::new("cargo"))
    }
}

impl std::fmt::Display for EngineCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Configuration for talking to the engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub command: EngineCommand,
    /// Directory the engine is launched from. `None` inherits ours.
    pub working_dir: Option<PathBuf>,
    pub sync_timeout: Duration,
    pub policy: SearchPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            command: EngineCommand::default(),
            working_dir: None,
            sync_timeout: DEFAULT_SYNC_TIMEOUT,
            policy: SearchPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command() {
        let command = EngineCommand::default();
        assert_eq!(command.program, "cargo");
        assert_eq!(command.args, vec!["run", "--release", "--"]);
        assert_eq!(command.to_string(), DEFAULT_ENGINE_COMMAND);
    }

    #[test]
    fn test_parse_blank_command() {
        assert_eq!(EngineCommand::parse("   "), None);
        assert_eq!(
            EngineCommand::parse(" /usr/local/bin/kifu-engine "),
            Some(EngineCommand::new("/usr/local/bin/kifu-engine"))
        );
    }
}
