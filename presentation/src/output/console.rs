//! Console output formatter for finished debates

use crate::output::color::paint;
use colored::Colorize;
use parliament_application::DebateOutcome;
use parliament_domain::{BudgetState, DebateSpec, EndReason, OutputFormat, Turn};
use serde::Serialize;

/// Formats debate transcripts for console display
pub struct ConsoleFormatter;

/// JSON shape of a finished debate
#[derive(Serialize)]
struct TranscriptReport<'a> {
    topic: &'a str,
    end_reason: EndReason,
    budget: &'a BudgetState,
    rounds: Vec<RoundReport<'a>>,
}

#[derive(Serialize)]
struct RoundReport<'a> {
    number: usize,
    title: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    turns: Vec<&'a Turn>,
}

impl ConsoleFormatter {
    /// Render `outcome` in the requested format
    pub fn render(format: OutputFormat, outcome: &DebateOutcome, spec: &DebateSpec) -> String {
        match format {
            OutputFormat::Full => Self::format(outcome, spec),
            OutputFormat::Synthesis => Self::format_synthesis_only(outcome),
            OutputFormat::Json => Self::format_json(outcome, spec),
        }
    }

    /// Format the complete debate, round by round
    pub fn format(outcome: &DebateOutcome, spec: &DebateSpec) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Parliament Debate"));
        output.push('\n');
        output.push_str(&format!(
            "{} {}\n",
            "Topic:".cyan().bold(),
            outcome.topic.content()
        ));

        for round in spec.rounds() {
            let turns: Vec<&Turn> = outcome.transcript.round_turns(round.index).collect();
            if turns.is_empty() {
                continue;
            }
            output.push_str(&Self::section_header(&format!(
                "Round {}: {}",
                round.number(),
                round.title
            )));
            for turn in turns {
                output.push_str(&Self::format_turn(turn));
            }
        }

        output.push_str(&Self::footer());
        output.push_str(&Self::summary(outcome));
        output.push('\n');
        output
    }

    /// One turn: colored speaker banner, content, cited sources
    pub fn format_turn(turn: &Turn) -> String {
        let banner = if turn.icon.is_empty() {
            format!("── {} ({}) ──", turn.speaker_name, turn.role)
        } else {
            format!("── {} {} ({}) ──", turn.icon, turn.speaker_name, turn.role)
        };

        let mut output = if turn.is_failed() {
            format!("\n{}\n{}\n", banner.red().bold(), turn.content.red())
        } else {
            format!("\n{}\n{}\n", paint(&banner, &turn.color), turn.content)
        };

        if !turn.citations.is_empty() {
            output.push_str(&format!("\n{}\n", "Sources:".dimmed()));
            for citation in &turn.citations {
                output.push_str(&format!(
                    "  [{}] {} - {}\n",
                    citation.marker, citation.title, citation.url
                ));
            }
        }
        output
    }

    /// Format as JSON
    pub fn format_json(outcome: &DebateOutcome, spec: &DebateSpec) -> String {
        let report = TranscriptReport {
            topic: outcome.topic.content(),
            end_reason: outcome.end_reason,
            budget: &outcome.budget,
            rounds: spec
                .rounds()
                .iter()
                .map(|round| RoundReport {
                    number: round.number(),
                    title: &round.title,
                    kind: round.kind.as_str(),
                    turns: outcome.transcript.round_turns(round.index).collect(),
                })
                .filter(|round| !round.turns.is_empty())
                .collect(),
        };
        serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the moderator's synthesis only (concise output)
    pub fn format_synthesis_only(outcome: &DebateOutcome) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n\n",
            "=== Parliament Synthesis ===".cyan().bold()
        ));
        output.push_str(&format!(
            "{} {}\n\n",
            "Topic:".bold(),
            outcome.topic.content()
        ));

        let synthesis: Vec<&Turn> = outcome
            .transcript
            .turns()
            .iter()
            .filter(|t| t.speaker.is_moderator())
            .collect();

        if synthesis.is_empty() {
            output.push_str(
                &"No synthesis: the debate ended before the moderator spoke."
                    .yellow()
                    .to_string(),
            );
            output.push('\n');
        }
        for turn in synthesis {
            output.push_str(&turn.content);
            output.push('\n');
        }

        output
    }

    /// One-line run statistics
    pub fn summary(outcome: &DebateOutcome) -> String {
        let mut line = format!(
            "{} turn(s), {} failed, {}/{} steps, {} search(es)",
            outcome.transcript.len(),
            outcome.transcript.failure_count(),
            outcome.budget.steps_taken,
            outcome.budget.step_limit,
            outcome.budget.tool_calls
        );
        if outcome.is_cancelled() {
            line.push_str(" - cancelled");
        }
        line.dimmed().to_string()
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}
