//! Round executor: runs one [`RoundDef`] against the debate state.
//!
//! - **Parallel**: every panel agent reads the same pre-round context; turns
//!   run concurrently and are appended in panel order after fan-in.
//! - **Sequential**: agents speak in panel order, each seeing the turns
//!   appended earlier in the round.
//! - **Moderator**: one synthesis turn over the full transcript.
//!
//! A failed turn is recorded as a failed [`Turn`] plus a turn-scoped error
//! event; it never aborts the rest of the round.

use super::run_debate::RunDebateError;
use super::shared::is_cancelled;
use super::turn_runner::{TurnOutcome, TurnRunner};
use crate::ports::event_sink::EventSink;
use parliament_domain::debate::transcript::MODERATOR_NAME;
use parliament_domain::{
    Agent, AgentDisplay, BudgetState, ContextStrategy, DebateEvent, Panel, RoundDef, RoundKind,
    Topic, Transcript, Turn, render_context,
};
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Mutable state of a running debate.
///
/// The transcript and the budget are only ever touched by the orchestrating
/// task; spawned turns get owned copies of what they read.
#[derive(Debug, Clone)]
pub struct DebateState {
    pub topic: Topic,
    pub panel: Panel,
    pub transcript: Transcript,
    pub budget: BudgetState,
}

impl DebateState {
    pub fn new(topic: Topic, panel: Panel, step_limit: usize) -> Self {
        Self {
            topic,
            panel,
            transcript: Transcript::new(),
            budget: BudgetState::new(step_limit),
        }
    }
}

/// What happened in one round
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundReport {
    pub attempted: usize,
    pub failed: usize,
    /// Cancellation was observed between sequential turns
    pub cancelled: bool,
}

/// Executes single rounds
pub struct RoundExecutor {
    runner: TurnRunner,
}

impl RoundExecutor {
    pub fn new(runner: TurnRunner) -> Self {
        Self { runner }
    }

    /// Run `round` to completion.
    ///
    /// The whole round's step cost is checked before anything is emitted,
    /// so a round that cannot finish never starts.
    pub async fn execute(
        &self,
        round: &RoundDef,
        state: &mut DebateState,
        sink: &dyn EventSink,
        cancellation: &Option<CancellationToken>,
    ) -> Result<RoundReport, RunDebateError> {
        state.budget.ensure(round.steps(state.panel.len()))?;

        info!(
            "Round {} '{}' ({}, {})",
            round.number(),
            round.title,
            round.kind.as_str(),
            round.effective_context_strategy().as_str()
        );
        sink.emit(&DebateEvent::round_starting(round));

        let report = match round.kind {
            RoundKind::Parallel => self.parallel(round, state, sink).await?,
            RoundKind::Sequential => self.sequential(round, state, sink, cancellation).await?,
            RoundKind::Moderator => self.moderator(round, state, sink).await?,
        };

        debug!(
            "Round {} finished: {}/{} turn(s) failed, {} step(s) left",
            round.number(),
            report.failed,
            report.attempted,
            state.budget.remaining()
        );
        Ok(report)
    }

    async fn parallel(
        &self,
        round: &RoundDef,
        state: &mut DebateState,
        sink: &dyn EventSink,
    ) -> Result<RoundReport, RunDebateError> {
        let agents: Vec<Arc<Agent>> = state.panel.agents().to_vec();
        state.budget.try_consume(agents.len())?;

        // One snapshot for the whole round: no agent sees a peer's turn.
        let context = render_context(&state.topic, round, &state.transcript);

        for agent in &agents {
            sink.emit(&DebateEvent::agent_turn_starting(
                round,
                AgentDisplay::from(agent.as_ref()),
            ));
        }

        let mut join_set = JoinSet::new();
        for (index, agent) in agents.iter().enumerate() {
            let runner = self.runner.clone();
            let agent = Arc::clone(agent);
            let context = context.clone();
            let prompt = round.prompt_template.clone();

            join_set.spawn(async move {
                let outcome = runner
                    .run(Some(agent.system_prompt.as_str()), &prompt, &context, true)
                    .await;
                (index, outcome)
            });
        }

        let mut outcomes: Vec<Option<TurnOutcome>> = vec![None; agents.len()];
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, outcome)) => outcomes[index] = Some(outcome),
                Err(e) => warn!("Turn task join error: {}", e),
            }
        }

        let mut report = RoundReport::default();
        for (agent, outcome) in agents.iter().zip(outcomes) {
            let outcome =
                outcome.unwrap_or_else(|| TurnOutcome::from_error("turn task aborted"));
            record(round, Some(agent.as_ref()), outcome, state, sink, &mut report)?;
        }
        Ok(report)
    }

    async fn sequential(
        &self,
        round: &RoundDef,
        state: &mut DebateState,
        sink: &dyn EventSink,
        cancellation: &Option<CancellationToken>,
    ) -> Result<RoundReport, RunDebateError> {
        let agents: Vec<Arc<Agent>> = state.panel.agents().to_vec();
        let mut report = RoundReport::default();

        for agent in &agents {
            if is_cancelled(cancellation) {
                report.cancelled = true;
                break;
            }
            state.budget.try_consume(1)?;
            sink.emit(&DebateEvent::agent_turn_starting(
                round,
                AgentDisplay::from(agent.as_ref()),
            ));

            let context = render_context(&state.topic, round, &state.transcript);
            let outcome = self
                .runner
                .run(Some(agent.system_prompt.as_str()), &round.prompt_template, &context, true)
                .await;
            record(round, Some(agent.as_ref()), outcome, state, sink, &mut report)?;
        }
        Ok(report)
    }

    async fn moderator(
        &self,
        round: &RoundDef,
        state: &mut DebateState,
        sink: &dyn EventSink,
    ) -> Result<RoundReport, RunDebateError> {
        state.budget.try_consume(1)?;
        if round.context_strategy == ContextStrategy::TopicOnly {
            warn!(
                "Round {} is a moderator round configured with topic_only; using the full transcript",
                round.number()
            );
        }
        sink.emit(&DebateEvent::synthesis(round));

        let context = render_context(&state.topic, round, &state.transcript);
        let outcome = self
            .runner
            .run(None, &round.prompt_template, &context, false)
            .await;

        let mut report = RoundReport::default();
        record(round, None, outcome, state, sink, &mut report)?;
        Ok(report)
    }
}

/// Append the turn for `outcome` and emit its events: research steps first,
/// then the content (or error) event.
fn record(
    round: &RoundDef,
    speaker: Option<&Agent>,
    outcome: TurnOutcome,
    state: &mut DebateState,
    sink: &dyn EventSink,
    report: &mut RoundReport,
) -> Result<(), RunDebateError> {
    let name = speaker.map_or(MODERATOR_NAME, |a| a.name.as_str());

    for step in &outcome.research_steps {
        sink.emit(&DebateEvent::ResearchStep {
            agent: name.to_string(),
            round: round.number(),
            query: step.query.clone(),
            result_count: step.result_count,
            failed: step.failed,
        });
    }
    state.budget.record_tool_calls(outcome.tool_calls());

    let turn = match outcome.content {
        Ok(content) => new_turn(round, speaker, content).with_citations(outcome.citations),
        Err(error) => {
            warn!("{} failed in round {}: {}", name, round.number(), error);
            new_turn(round, speaker, String::new())
                .into_failed(format!("Error generating response for {name}: {error}"))
        }
    };

    report.attempted += 1;
    if turn.is_failed() {
        report.failed += 1;
    }

    let turn = state.transcript.append(turn)?;
    sink.emit(&DebateEvent::from_turn(turn));
    Ok(())
}

fn new_turn(round: &RoundDef, speaker: Option<&Agent>, content: String) -> Turn {
    match speaker {
        Some(agent) => Turn::from_agent(round.index, agent, content),
        None => Turn::from_moderator(round.index, content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DebateParams;
    use crate::ports::event_sink::NoEvents;
    use crate::ports::llm_gateway::{CompletionRequest, LlmGateway, ProviderError};
    use async_trait::async_trait;
    use parliament_domain::LlmResponse;
    use std::time::{Duration, Instant};

    /// Replies after a per-speaker delay; speakers are told apart by their
    /// `persona:<name>` system prompt.
    struct DelayedGateway {
        delays: Vec<(&'static str, Duration)>,
    }

    #[async_trait]
    impl LlmGateway for DelayedGateway {
        async fn complete(&self, request: &CompletionRequest) -> Result<LlmResponse, ProviderError> {
            let who = request
                .messages
                .iter()
                .find_map(|m| m.content.strip_prefix("persona:"))
                .unwrap_or("Moderator")
                .to_string();
            let delay = self
                .delays
                .iter()
                .find(|(name, _)| *name == who)
                .map(|(_, d)| *d)
                .unwrap_or_default();
            tokio::time::sleep(delay).await;
            Ok(LlmResponse::from_text(format!("{who} speaks")))
        }

        fn name(&self) -> &str {
            "delayed"
        }
    }

    fn executor(alice: u64, bob: u64) -> RoundExecutor {
        let gateway = Arc::new(DelayedGateway {
            delays: vec![
                ("Alice", Duration::from_millis(alice)),
                ("Bob", Duration::from_millis(bob)),
            ],
        });
        RoundExecutor::new(TurnRunner::new(gateway, DebateParams::default()))
    }

    fn state() -> DebateState {
        let panel = Panel::from_agents([
            Agent::new("alice", "Alice", "persona:Alice"),
            Agent::new("bob", "Bob", "persona:Bob"),
        ])
        .unwrap();
        DebateState::new(Topic::new("X").unwrap(), panel, 10)
    }

    fn speakers(state: &DebateState) -> Vec<String> {
        state
            .transcript
            .turns()
            .iter()
            .map(|t| t.speaker_name.clone())
            .collect()
    }

    #[tokio::test]
    async fn test_parallel_turns_overlap_and_keep_panel_order() {
        // Bob finishes first, but Alice is first in the panel
        let executor = executor(250, 150);
        let round = RoundDef::new(0, "Opening", RoundKind::Parallel, ContextStrategy::TopicOnly, "");
        let mut state = state();

        let started = Instant::now();
        let report = executor
            .execute(&round, &mut state, &NoEvents, &None)
            .await
            .unwrap();
        let elapsed = started.elapsed();

        // Back to back would take 400ms
        assert!(elapsed < Duration::from_millis(380), "took {elapsed:?}");
        assert_eq!(report.attempted, 2);
        assert_eq!(report.failed, 0);
        assert_eq!(speakers(&state), vec!["Alice", "Bob"]);
        assert_eq!(state.budget.steps_taken, 2);
    }

    #[tokio::test]
    async fn test_sequential_turns_run_one_at_a_time() {
        let executor = executor(100, 100);
        let round = RoundDef::new(
            0,
            "Rebuttal",
            RoundKind::Sequential,
            ContextStrategy::FullTranscript,
            "",
        );
        let mut state = state();

        let started = Instant::now();
        executor
            .execute(&round, &mut state, &NoEvents, &None)
            .await
            .unwrap();

        assert!(started.elapsed() >= Duration::from_millis(200));
        assert_eq!(speakers(&state), vec!["Alice", "Bob"]);
    }

    #[tokio::test]
    async fn test_round_over_budget_does_not_start() {
        let executor = executor(0, 0);
        let round = RoundDef::new(0, "Opening", RoundKind::Parallel, ContextStrategy::TopicOnly, "");
        let mut state = state();
        state.budget = BudgetState::new(1);

        let err = executor
            .execute(&round, &mut state, &NoEvents, &None)
            .await
            .unwrap_err();

        assert!(matches!(err, RunDebateError::BudgetExceeded(_)));
        assert!(state.transcript.turns().is_empty());
        assert_eq!(state.budget.steps_taken, 0);
    }
}
