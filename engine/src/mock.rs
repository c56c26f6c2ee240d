//! Scripted in-memory engine for testing

use crate::protocol::parse_board_dump;
use crate::{EngineBackend, EngineError, SearchBudget};
use async_trait::async_trait;
use chess::Position;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How the mock answers one kind of query.
#[derive(Debug, Clone)]
pub struct MockReply {
    pub delay: Duration,
    /// Raw stdout the engine would print; `None` behaves like a nonzero exit.
    pub output: Option<String>,
}

impl MockReply {
    pub fn output(output: impl Into<String>) -> Self {
        Self {
            delay: Duration::ZERO,
            output: Some(output.into()),
        }
    }

    pub fn failure() -> Self {
        Self {
            delay: Duration::ZERO,
            output: None,
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Position { kifu: String },
    Search { kifu: String, budget: SearchBudget },
}

/// Mock engine - only compiled in test mode or with the mock feature.
/// Unscripted queries fail with a launch failure.
#[derive(Default)]
pub struct MockEngine {
    position: Option<MockReply>,
    searches: HashMap<SearchBudget, MockReply>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the board dump printed for position queries.
    pub fn with_position_reply(mut self, reply: MockReply) -> Self {
        self.position = Some(reply);
        self
    }

    /// Configure the reply for searches with `budget`.
    pub fn with_search_reply(mut self, budget: SearchBudget, reply: MockReply) -> Self {
        self.searches.insert(budget, reply);
        self
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    fn record(&self, call: MockCall) {
        self.call_log.lock().unwrap().push(call);
    }

    async fn play(reply: Option<&MockReply>) -> Result<String, EngineError> {
        let reply = reply.ok_or_else(|| EngineError::LaunchFailure {
            program: "mock".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no reply configured"),
        })?;
        tokio::time::sleep(reply.delay).await;
        reply
            .output
            .clone()
            .ok_or_else(|| EngineError::Protocol("engine exited with exit status: 1".to_string()))
    }
}

#[async_trait]
impl EngineBackend for MockEngine {
    async fn query_position(&self, kifu: &str) -> Result<Position, EngineError> {
        self.record(MockCall::Position {
            kifu: kifu.to_string(),
        });
        let output = Self::play(self.position.as_ref()).await?;
        parse_board_dump(&output)
    }

    async fn query_search(&self, kifu: &str, budget: SearchBudget) -> Result<String, EngineError> {
        self.record(MockCall::Search {
            kifu: kifu.to_string(),
            budget,
        });
        let output = Self::play(self.searches.get(&budget)).await?;
        crate::protocol::parse_answer(&output)
    }
}
