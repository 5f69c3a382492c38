//! Run Debate use case
//!
//! The top-level state machine. Sequences the rounds of a [`DebateSpec`],
//! enforces the step budget and applies the round failure policy.
//!
//! ```text
//! INIT ──▶ ROUND(0) ──▶ ROUND(1) ──▶ … ──▶ ROUND(N-1) ──▶ END
//!              │            │                  │
//!              └────────────┴──── fatal ───────┴──▶ ERROR
//! ```
//!
//! END emits `status_update{END}` then `debate_complete`, exactly once.
//! ERROR emits a single debate-level `error` event. Cancellation is checked
//! at round boundaries (and between sequential turns) and leads to END.

use super::execute_round::{DebateState, RoundExecutor};
use super::shared::is_cancelled;
use super::turn_runner::TurnRunner;
use crate::config::{ContinueOnFailure, DebateParams, FailurePolicy, RoundOutcome};
use crate::ports::event_sink::{EventSink, NoEvents};
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::search_tool::SearchTool;
use parliament_domain::{
    BudgetExceeded, BudgetState, DebateEvent, DebateSpec, DomainError, EndReason, Panel, Topic,
    Transcript, TranscriptError,
};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Errors that end a debate
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RunDebateError {
    #[error("Invalid debate input: {0}")]
    InvalidInput(#[from] DomainError),

    #[error(transparent)]
    BudgetExceeded(#[from] BudgetExceeded),

    #[error("Round {round} halted by the '{policy}' failure policy: {failures} turn(s) failed")]
    RoundHalted {
        /// 1-based round number
        round: usize,
        failures: usize,
        policy: &'static str,
    },

    #[error("Transcript error: {0}")]
    Transcript(#[from] TranscriptError),
}

/// Input for the RunDebate use case
#[derive(Debug, Clone)]
pub struct RunDebateInput {
    pub topic: String,
    pub panel: Panel,
    pub spec: Arc<DebateSpec>,
}

impl RunDebateInput {
    pub fn new(topic: impl Into<String>, panel: Panel, spec: Arc<DebateSpec>) -> Self {
        Self {
            topic: topic.into(),
            panel,
            spec,
        }
    }
}

/// Result of a debate that reached END
#[derive(Debug, Clone)]
pub struct DebateOutcome {
    pub topic: Topic,
    pub transcript: Transcript,
    pub budget: BudgetState,
    pub end_reason: EndReason,
}

impl DebateOutcome {
    pub fn is_cancelled(&self) -> bool {
        self.end_reason == EndReason::Cancelled
    }
}

/// Use case for running a debate
pub struct RunDebateUseCase {
    runner: TurnRunner,
    step_limit: usize,
    policy: Arc<dyn FailurePolicy>,
    cancellation_token: Option<CancellationToken>,
}

impl RunDebateUseCase {
    pub fn new(gateway: Arc<dyn LlmGateway>, params: DebateParams) -> Self {
        Self {
            step_limit: params.step_limit,
            runner: TurnRunner::new(gateway, params),
            policy: Arc::new(ContinueOnFailure),
            cancellation_token: None,
        }
    }

    /// Attach a search tool; `None` bypasses the research loop.
    pub fn with_search(mut self, search: Option<Arc<dyn SearchTool>>) -> Self {
        self.runner = self.runner.with_search(search);
        self
    }

    pub fn with_failure_policy(mut self, policy: Arc<dyn FailurePolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Execute the use case without an event consumer
    pub async fn execute(&self, input: RunDebateInput) -> Result<DebateOutcome, RunDebateError> {
        self.execute_with_events(input, &NoEvents).await
    }

    /// Execute the use case, streaming events to `sink`
    pub async fn execute_with_events(
        &self,
        input: RunDebateInput,
        sink: &dyn EventSink,
    ) -> Result<DebateOutcome, RunDebateError> {
        // INIT: validate, set up state; no events.
        let topic = Topic::new(input.topic)?;
        if input.panel.is_empty() {
            return Err(DomainError::EmptyPanel.into());
        }
        let spec = input.spec;
        let mut state = DebateState::new(topic, input.panel, self.step_limit);

        info!(
            "Starting debate: {} round(s), {} agent(s), step limit {}, research {}",
            spec.len(),
            state.panel.len(),
            self.step_limit,
            if self.runner.has_search() { "on" } else { "off" }
        );

        let executor = RoundExecutor::new(self.runner.clone());

        for round in spec.rounds() {
            if is_cancelled(&self.cancellation_token) {
                info!("Cancelled before round {}", round.number());
                return Ok(finish(state, EndReason::Cancelled, sink));
            }

            let report = match executor
                .execute(round, &mut state, sink, &self.cancellation_token)
                .await
            {
                Ok(report) => report,
                Err(e) => return Err(fail(e, sink)),
            };

            if report.cancelled {
                info!("Cancelled during round {}", round.number());
                return Ok(finish(state, EndReason::Cancelled, sink));
            }

            let outcome = RoundOutcome {
                round_index: round.index,
                attempted: report.attempted,
                failed: report.failed,
            };
            if self.policy.should_halt(&outcome) {
                return Err(fail(
                    RunDebateError::RoundHalted {
                        round: round.number(),
                        failures: report.failed,
                        policy: self.policy.name(),
                    },
                    sink,
                ));
            }
        }

        Ok(finish(state, EndReason::Completed, sink))
    }
}

/// Enter END: emit the end status and the terminal `debate_complete`.
fn finish(state: DebateState, reason: EndReason, sink: &dyn EventSink) -> DebateOutcome {
    info!(
        "Debate ended ({:?}): {} turn(s), {} failed, {}/{} steps, {} search(es)",
        reason,
        state.transcript.len(),
        state.transcript.failure_count(),
        state.budget.steps_taken,
        state.budget.step_limit,
        state.budget.tool_calls
    );
    sink.emit(&DebateEvent::end(reason));
    sink.emit(&DebateEvent::DebateComplete {
        total_turns: state.transcript.len(),
        failed_turns: state.transcript.failure_count(),
        steps_taken: state.budget.steps_taken,
    });
    DebateOutcome {
        topic: state.topic,
        transcript: state.transcript,
        budget: state.budget,
        end_reason: reason,
    }
}

/// Enter ERROR: emit one terminal error event.
fn fail(error: RunDebateError, sink: &dyn EventSink) -> RunDebateError {
    warn!("Debate failed: {}", error);
    sink.emit(&DebateEvent::fatal(error.to_string()));
    error
}
