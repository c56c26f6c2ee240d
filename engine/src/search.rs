//! Best-move queries: one budgeted search, or a race of fixed-depth searches.

use crate::{EngineBackend, EngineError, SearchBudget};
use chess::History;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

/// One fixed-depth search in a multi-depth race.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthProbe {
    pub depth: u8,
    /// `None` lets the probe run until the race ceiling.
    pub timeout: Option<Duration>,
}

impl DepthProbe {
    pub fn new(depth: u8, timeout: Option<Duration>) -> Self {
        Self { depth, timeout }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPolicy {
    /// One search with a time budget, accepted within `budget + grace`.
    SingleBudget { budget: Duration, grace: Duration },
    /// Concurrent fixed-depth searches; the deepest result in by `ceiling` wins.
    MultiDepth {
        probes: Vec<DepthProbe>,
        ceiling: Duration,
    },
}

impl SearchPolicy {
    pub fn single(budget: Duration) -> Self {
        Self::SingleBudget {
            budget,
            grace: Duration::from_millis(500),
        }
    }
}

impl Default for SearchPolicy {
    /// Depth 3 is expected to be quick and gets no timeout of its own;
    /// depths 4 and 5 get three seconds.
    fn default() -> Self {
        Self::MultiDepth {
            probes: vec![
                DepthProbe::new(3, None),
                DepthProbe::new(4, Some(Duration::from_secs(3))),
                DepthProbe::new(5, Some(Duration::from_secs(3))),
            ],
            ceiling: Duration::from_millis(5500),
        }
    }
}

/// An advisory move for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub mv: String,
    /// Depth that produced the move; `None` for time-budget searches.
    pub depth: Option<u8>,
}

#[derive(Debug)]
pub struct ProbeOutcome {
    pub budget: SearchBudget,
    pub result: Result<String, EngineError>,
}

/// Every query of one batch with its result or failure cause.
#[derive(Debug, Default)]
pub struct SearchReport {
    pub outcomes: Vec<ProbeOutcome>,
}

impl SearchReport {
    /// Deepest successful answer. Completion order plays no part.
    pub fn best(&self) -> Option<Suggestion> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().map(|mv| (o.budget, mv)))
            .max_by_key(|(budget, _)| budget.depth())
            .map(|(budget, mv)| Suggestion {
                mv: mv.clone(),
                depth: budget.depth(),
            })
    }

    pub fn failures(&self) -> impl Iterator<Item = (&SearchBudget, &EngineError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (&o.budget, e)))
    }
}

/// Runs search queries under a [`SearchPolicy`].
pub struct BestMoveQuery {
    backend: Arc<dyn EngineBackend>,
    policy: SearchPolicy,
}

impl BestMoveQuery {
    pub fn new(backend: Arc<dyn EngineBackend>, policy: SearchPolicy) -> Self {
        Self { backend, policy }
    }

    /// Best available suggestion for `history`, or `None` when every query
    /// failed.
    pub async fn suggest(&self, history: &History) -> Option<Suggestion> {
        let report = self.run(&history.serialize()).await;
        for (budget, err) in report.failures() {
            tracing::debug!("Search {:?} contributed nothing: {}", budget, err);
        }
        let best = report.best();
        match &best {
            Some(s) => tracing::info!("Suggesting {} (depth {:?})", s.mv, s.depth),
            None => tracing::warn!("No search produced a move"),
        }
        best
    }

    /// Run the policy and report every query's outcome.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn run(&self, kifu: &str) -> SearchReport {
        match &self.policy {
            SearchPolicy::SingleBudget { budget, grace } => {
                self.run_single(kifu, *budget, *grace).await
            }
            SearchPolicy::MultiDepth { probes, ceiling } => {
                self.run_race(kifu, probes, *ceiling).await
            }
        }
    }

    async fn run_single(&self, kifu: &str, budget: Duration, grace: Duration) -> SearchReport {
        let limit = budget + grace;
        let search = SearchBudget::Time(budget);
        let result = tokio::time::timeout(limit, self.backend.query_search(kifu, search))
            .await
            .unwrap_or_else(|_| Err(EngineError::Timeout(limit)));

        SearchReport {
            outcomes: vec![ProbeOutcome {
                budget: search,
                result,
            }],
        }
    }

    /// One task per probe, each owning its own engine query. Probes still
    /// running at the ceiling are aborted, which drops (and kills) their
    /// engine processes.
    async fn run_race(&self, kifu: &str, probes: &[DepthProbe], ceiling: Duration) -> SearchReport {
        let deadline = tokio::time::Instant::now() + ceiling;
        let kifu: Arc<str> = Arc::from(kifu);
        let mut tasks = JoinSet::new();

        for probe in probes.iter().copied() {
            let backend = Arc::clone(&self.backend);
            let kifu = Arc::clone(&kifu);
            tasks.spawn(async move {
                let budget = SearchBudget::Depth(probe.depth);
                let query = backend.query_search(&kifu, budget);
                let result = match probe.timeout {
                    Some(limit) => tokio::time::timeout(limit, query)
                        .await
                        .unwrap_or_else(|_| Err(EngineError::Timeout(limit))),
                    None => query.await,
                };
                ProbeOutcome { budget, result }
            });
        }

        let mut report = SearchReport::default();
        loop {
            match tokio::time::timeout_at(deadline, tasks.join_next()).await {
                Ok(Some(Ok(outcome))) => {
                    tracing::debug!(
                        "Probe {:?} finished: {}",
                        outcome.budget,
                        if outcome.result.is_ok() { "ok" } else { "failed" }
                    );
                    report.outcomes.push(outcome);
                }
                Ok(Some(Err(e))) => tracing::error!("Search task panicked or was cancelled: {}", e),
                Ok(None) => break,
                Err(_) => {
                    tracing::debug!("Search ceiling of {:?} reached, aborting stragglers", ceiling);
                    tasks.abort_all();
                    break;
                }
            }
        }

        for probe in probes {
            let budget = SearchBudget::Depth(probe.depth);
            if !report.outcomes.iter().any(|o| o.budget == budget) {
                report.outcomes.push(ProbeOutcome {
                    budget,
                    result: Err(EngineError::Timeout(ceiling)),
                });
            }
        }

        report
    }
}
