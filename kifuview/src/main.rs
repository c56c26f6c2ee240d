//! kifuview - terminal front end for the kifu viewer core.
//!
//! Loads a move history (the "kifu"), lets the engine rebuild the board from
//! it, and asks the engine for an advisory next move. The engine is an
//! external program launched once per query; see [`config`] for how it is
//! located.
//!
//! Subcommands:
//! - **show**: print the synced board, history, share link and suggestion.
//! - **suggest**: print only the suggested move.
//! - **play**: interactive loop; type squares to select and move pieces.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chess::{share, History};
use clap::{Args, Parser, Subcommand, ValueEnum};
use engine::{
    BestMoveQuery, EngineBackend, EngineCommand, EngineConfig, ProcessEngine, SearchPolicy, Session,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod play;

#[derive(Parser)]
#[command(name = "kifuview", about = "Chess position viewer kept in sync with an external engine")]
struct Cli {
    #[command(flatten)]
    engine: EngineArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Engine overrides. Each falls back to its environment variable.
#[derive(Args)]
struct EngineArgs {
    /// Command line that launches the engine (KIFUVIEW_ENGINE_CMD).
    #[arg(long)]
    engine_cmd: Option<String>,

    /// Directory to launch the engine from (KIFUVIEW_ENGINE_DIR).
    #[arg(long)]
    engine_dir: Option<PathBuf>,

    /// Search policy (KIFUVIEW_SEARCH_POLICY).
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,

    /// Time budget for the single policy (KIFUVIEW_SEARCH_BUDGET_SECS).
    #[arg(long)]
    budget_secs: Option<u64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    /// Race depths 3, 4 and 5; take the deepest result in time.
    Multi,
    /// One search with a time budget.
    Single,
}

#[derive(Subcommand)]
enum Commands {
    /// Sync the board for a kifu and print it with a suggestion.
    Show {
        /// Space-separated move tokens.
        #[arg(long, conflicts_with = "address")]
        kifu: Option<String>,

        /// A viewer address carrying the kifu as its `kifu` parameter.
        #[arg(long)]
        address: Option<String>,
    },
    /// Print the engine's suggested next move.
    Suggest {
        #[arg(long, default_value = "")]
        kifu: String,
    },
    /// Interactive play on stdin.
    Play {
        #[arg(long, default_value = "")]
        kifu: String,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("unknown search policy `{0}` (expected `multi` or `single`)")]
    UnknownPolicy(String),

    #[error("engine command is empty")]
    EmptyEngineCommand,
}

fn parse_policy(name: &str) -> Result<PolicyArg, CliError> {
    match name.trim().to_ascii_lowercase().as_str() {
        "multi" => Ok(PolicyArg::Multi),
        "single" => Ok(PolicyArg::Single),
        other => Err(CliError::UnknownPolicy(other.to_string())),
    }
}

/// Merge flags over environment over defaults.
fn build_config(args: &EngineArgs) -> Result<EngineConfig, CliError> {
    let command = match &args.engine_cmd {
        Some(line) => EngineCommand::parse(line).ok_or(CliError::EmptyEngineCommand)?,
        None => config::get_engine_command(),
    };

    let policy = match args.policy {
        Some(policy) => policy,
        None => parse_policy(&config::get_search_policy())?,
    };
    let policy = match policy {
        PolicyArg::Multi => SearchPolicy::default(),
        PolicyArg::Single => {
            let secs = args.budget_secs.unwrap_or_else(config::get_search_budget_secs);
            SearchPolicy::single(Duration::from_secs(secs))
        }
    };

    Ok(EngineConfig {
        command,
        working_dir: args.engine_dir.clone().or_else(config::get_engine_dir),
        sync_timeout: Duration::from_secs(config::get_sync_timeout_secs()),
        policy,
    })
}

/// Log to a daily rolling file when `KIFUVIEW_LOG_DIR` is set, else stderr.
/// The returned guard must live until exit so buffered lines are flushed.
fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match config::get_log_dir() {
        Some(log_dir) => {
            std::fs::create_dir_all(&log_dir).ok();
            let file_appender = tracing_appender::rolling::daily(&log_dir, "kifuview");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false)
                        .with_target(true)
                        .with_line_number(true),
                )
                .with(filter)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
            None
        }
    }
}

async fn show(
    backend: Arc<dyn EngineBackend>,
    engine_config: &EngineConfig,
    history: History,
) -> anyhow::Result<()> {
    let session = Session::open(backend, engine_config, &history.serialize()).await;
    if let Some(err) = session.last_sync_error() {
        println!("(engine sync failed, showing last known board: {})", err);
    }
    play::print_game(session.game());

    let link = share::address_with_kifu(&config::get_base_address(), session.game().history())
        .context("building share link")?;
    println!("Link: {}", link);

    play::print_suggestion(session.suggest().await);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging();

    let engine_config = build_config(&cli.engine)?;
    tracing::info!("Engine command: {}", engine_config.command);
    let backend: Arc<dyn EngineBackend> = Arc::new(ProcessEngine::from_config(&engine_config));

    match cli.command {
        Commands::Show { kifu, address } => {
            let history = match (kifu, address) {
                (Some(kifu), _) => History::deserialize(&kifu),
                (None, Some(address)) => share::kifu_from_address_lossy(&address),
                (None, None) => History::new(),
            };
            show(backend, &engine_config, history).await?;
        }
        Commands::Suggest { kifu } => {
            let query = BestMoveQuery::new(backend, engine_config.policy.clone());
            match query.suggest(&History::deserialize(&kifu)).await {
                Some(suggestion) => println!("{}", suggestion.mv),
                None => println!("(no suggestion)"),
            }
        }
        Commands::Play { kifu } => {
            let session = Session::open(backend, &engine_config, &kifu).await;
            play::run(session).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_overrides() -> EngineArgs {
        EngineArgs {
            engine_cmd: None,
            engine_dir: None,
            policy: None,
            budget_secs: None,
        }
    }

    #[test]
    fn test_parse_policy() {
        assert!(matches!(parse_policy("Multi"), Ok(PolicyArg::Multi)));
        assert!(matches!(parse_policy(" single "), Ok(PolicyArg::Single)));
        assert!(matches!(parse_policy("fastest"), Err(CliError::UnknownPolicy(_))));
    }

    #[test]
    fn test_flags_override_environment() {
        let args = EngineArgs {
            engine_cmd: Some("/opt/engine/kifu-ai --quiet".to_string()),
            engine_dir: Some(PathBuf::from("/opt/engine")),
            policy: Some(PolicyArg::Single),
            budget_secs: Some(7),
        };
        let config = build_config(&args).unwrap();
        assert_eq!(config.command.program, "/opt/engine/kifu-ai");
        assert_eq!(config.command.args, vec!["--quiet"]);
        assert_eq!(config.working_dir, Some(PathBuf::from("/opt/engine")));
        assert_eq!(config.policy, SearchPolicy::single(Duration::from_secs(7)));
    }

    #[test]
    fn test_blank_engine_command_is_rejected() {
        let args = EngineArgs {
            engine_cmd: Some("  ".to_string()),
            ..no_overrides()
        };
        assert!(matches!(build_config(&args), Err(CliError::EmptyEngineCommand)));
    }

    #[test]
    fn test_cli_parses_show_with_address() {
        let cli = Cli::try_parse_from([
            "kifuview",
            "--policy",
            "multi",
            "show",
            "--address",
            "http://localhost:8501/?kifu=e2e4",
        ])
        .unwrap();
        assert!(matches!(cli.engine.policy, Some(PolicyArg::Multi)));
        assert!(matches!(cli.command, Commands::Show { address: Some(_), kifu: None }));
    }
}
