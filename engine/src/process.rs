use crate::config::{EngineCommand, EngineConfig};
use crate::protocol::{parse_answer, parse_board_dump, position_args, search_args};
use crate::{EngineBackend, EngineError, SearchBudget};
use async_trait::async_trait;
use chess::Position;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};

/// Engine reached by spawning a fresh process per query.
///
/// The child is spawned with `kill_on_drop`, so dropping a query future
/// (timeout, aborted task) terminates the process rather than leaking it.
#[derive(Debug, Clone)]
pub struct ProcessEngine {
    command: EngineCommand,
    working_dir: Option<PathBuf>,
}

impl ProcessEngine {
    pub fn new(command: EngineCommand) -> Self {
        Self {
            command,
            working_dir: None,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            command: config.command.clone(),
            working_dir: config.working_dir.clone(),
        }
    }

    /// Spawn the engine with `mode_args`, feed it `payload`, close stdin and
    /// collect stdout until the process exits.
    #[tracing::instrument(level = "debug", skip(self, payload), fields(program = %self.command.program))]
    pub async fn run(&self, mode_args: &[String], payload: &str) -> Result<String, EngineError> {
        let mut command = tokio::process::Command::new(&self.command.program);
        command
            .args(&self.command.args)
            .args(mode_args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        tracing::debug!("Spawning engine: {} {:?}", self.command, mode_args);
        let mut child = command.spawn().map_err(|e| {
            tracing::error!("Failed to spawn engine {}: {}", self.command.program, e);
            EngineError::LaunchFailure {
                program: self.command.program.clone(),
                source: e,
            }
        })?;

        let mut stdin = child.stdin.take().ok_or(EngineError::NoStdin)?;
        let stdout = child.stdout.take().ok_or(EngineError::NoStdout)?;
        let stderr = child.stderr.take().ok_or(EngineError::NoStderr)?;

        tracing::trace!("ENGINE >> {}", payload);
        let write = async move {
            match stdin.write_all(payload.as_bytes()).await {
                // The engine may exit without reading; its exit status tells the story.
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                    tracing::debug!("Engine closed stdin early");
                }
                Err(e) => return Err(EngineError::Io(e)),
                Ok(()) => {}
            }
            drop(stdin);
            Ok(())
        };
        let wait = async { child.wait().await.map_err(EngineError::from) };

        let ((), status, out, err) =
            tokio::try_join!(write, wait, read_all(stdout), read_all(stderr))?;

        for line in out.lines() {
            tracing::trace!("ENGINE << {}", line);
        }
        if !err.trim().is_empty() {
            tracing::debug!("Engine stderr: {}", err.trim());
        }

        if !status.success() {
            tracing::warn!("Engine exited with {}", status);
            return Err(EngineError::Protocol(format!(
                "engine exited with {}: {}",
                status,
                err.trim()
            )));
        }

        Ok(out)
    }
}

async fn read_all(mut reader: impl AsyncRead + Unpin) -> Result<String, EngineError> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).await?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[async_trait]
impl EngineBackend for ProcessEngine {
    async fn query_position(&self, kifu: &str) -> Result<Position, EngineError> {
        let output = self.run(&position_args(), kifu).await?;
        parse_board_dump(&output)
    }

    async fn query_search(&self, kifu: &str, budget: SearchBudget) -> Result<String, EngineError> {
        let output = self.run(&search_args(budget), kifu).await?;
        let answer = parse_answer(&output)?;
        tracing::info!("Engine suggests {} ({:?})", answer, budget);
        Ok(answer)
    }
}
