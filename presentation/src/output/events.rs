//! Live console rendering of the debate event stream

use crate::output::color::paint;
use colored::Colorize;
use indicatif::MultiProgress;
use parliament_application::EventSink;
use parliament_domain::{DebateEvent, EndReason, StatusCode};

/// Prints debate events as they arrive.
///
/// With `show_content` every agent response is printed in full (the live
/// transcript); without it only round headers, research steps and errors
/// are shown and the transcript is printed after the debate.
pub struct ConsoleEventSink {
    show_content: bool,
    progress: Option<MultiProgress>,
}

impl ConsoleEventSink {
    pub fn new(show_content: bool) -> Self {
        Self {
            show_content,
            progress: None,
        }
    }

    /// Print above the spinners of a [`ProgressEventSink`](crate::ProgressEventSink)
    pub fn with_progress(mut self, multi: MultiProgress) -> Self {
        self.progress = Some(multi);
        self
    }

    /// Text for one event, `None` when the event has no console line
    pub fn render(&self, event: &DebateEvent) -> Option<String> {
        match event {
            DebateEvent::StatusUpdate {
                code: StatusCode::RoundStarting,
                round_number,
                round_title,
                round_type,
                ..
            } => Some(format!(
                "\n{} {}",
                format!(
                    "▶ Round {}: {}",
                    round_number.unwrap_or_default(),
                    round_title.as_deref().unwrap_or_default()
                )
                .cyan()
                .bold(),
                round_type
                    .map(|kind| format!("({})", kind.as_str()))
                    .unwrap_or_default()
                    .dimmed()
            )),
            DebateEvent::StatusUpdate {
                code: StatusCode::End,
                reason: Some(EndReason::Cancelled),
                ..
            } => Some(format!("\n{}", "Debate cancelled.".yellow().bold())),
            DebateEvent::StatusUpdate { .. } => None,
            DebateEvent::AgentResponse {
                agent,
                role,
                content,
                color,
                icon,
                sources,
                ..
            } => {
                if !self.show_content {
                    return None;
                }
                let banner = if icon.is_empty() {
                    format!("── {agent} ({role}) ──")
                } else {
                    format!("── {icon} {agent} ({role}) ──")
                };
                let mut text = format!("\n{}\n{}", paint(&banner, color), content);
                if !sources.is_empty() {
                    text.push_str(&format!("\n\n{}", "Sources:".dimmed()));
                    for source in sources {
                        text.push_str(&format!(
                            "\n  [{}] {} - {}",
                            source.marker, source.title, source.url
                        ));
                    }
                }
                Some(text)
            }
            DebateEvent::ResearchStep {
                agent,
                query,
                result_count,
                failed,
                ..
            } => {
                let result = if *failed {
                    "search failed".red().to_string()
                } else {
                    format!("{result_count} result(s)")
                };
                Some(
                    format!("  🔎 {agent} searched \"{query}\": {result}")
                        .dimmed()
                        .to_string(),
                )
            }
            DebateEvent::Error {
                content,
                agent: Some(agent),
                ..
            } => Some(format!("{} {}", format!("✗ {agent}:").red().bold(), content.red())),
            DebateEvent::Error { content, .. } => {
                Some(format!("\n{} {}", "Error:".red().bold(), content))
            }
            DebateEvent::DebateComplete {
                total_turns,
                failed_turns,
                steps_taken,
            } => Some(
                format!(
                    "\nDebate complete: {total_turns} turn(s), {failed_turns} failed, {steps_taken} step(s)"
                )
                .green()
                .to_string(),
            ),
        }
    }

    fn print(&self, text: &str) {
        match &self.progress {
            Some(multi) if !multi.is_hidden() => {
                let _ = multi.println(text);
            }
            _ => println!("{text}"),
        }
    }
}

impl EventSink for ConsoleEventSink {
    fn emit(&self, event: &DebateEvent) {
        if let Some(text) = self.render(event) {
            self.print(&text);
        }
    }
}

impl ConsoleEventSink {
    /// Header printed before the first event
    pub fn banner(topic: &str, panel: &[&str]) -> String {
        format!(
            "{} {}\n{}",
            "Topic:".cyan().bold(),
            topic,
            format!("Panel: {}", panel.join(", ")).dimmed()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parliament_domain::{
        AgentDisplay, Citation, ContextStrategy, RoundDef, RoundKind,
    };

    fn round() -> RoundDef {
        RoundDef::new(1, "Rebuttal", RoundKind::Sequential, ContextStrategy::FullTranscript, "")
    }

    fn response() -> DebateEvent {
        DebateEvent::AgentResponse {
            agent: "The Economist".into(),
            agent_id: "economist".into(),
            role: "economist".into(),
            content: "Taxes shift incentives [1].".into(),
            round: 2,
            color: "#2563eb".into(),
            icon: "💰".into(),
            sources: vec![Citation {
                marker: 1,
                title: "IMF".into(),
                url: "https://imf.org".into(),
            }],
        }
    }

    #[test]
    fn test_banner() {
        colored::control::set_override(false);
        assert_eq!(
            ConsoleEventSink::banner("Tax carbon?", &["A", "B"]),
            "Topic: Tax carbon?\nPanel: A, B"
        );
    }

    #[test]
    fn test_round_header() {
        colored::control::set_override(false);
        let sink = ConsoleEventSink::new(true);
        let text = sink.render(&DebateEvent::round_starting(&round())).unwrap();
        assert_eq!(text, "\n▶ Round 2: Rebuttal (sequential)");
    }

    #[test]
    fn test_agent_response_respects_show_content() {
        colored::control::set_override(false);
        let live = ConsoleEventSink::new(true).render(&response()).unwrap();
        assert!(live.contains("── 💰 The Economist (economist) ──"));
        assert!(live.contains("[1] IMF - https://imf.org"));
        assert!(ConsoleEventSink::new(false).render(&response()).is_none());
    }

    #[test]
    fn test_turn_starting_is_silent() {
        let sink = ConsoleEventSink::new(true);
        let event = DebateEvent::agent_turn_starting(
            &round(),
            AgentDisplay::moderator(),
        );
        assert!(sink.render(&event).is_none());
        assert!(sink.render(&DebateEvent::end(EndReason::Completed)).is_none());
    }

    #[test]
    fn test_errors_and_research() {
        colored::control::set_override(false);
        let sink = ConsoleEventSink::new(false);
        let turn_error = DebateEvent::Error {
            content: "Timeout".into(),
            agent: Some("Bob".into()),
            round: Some(1),
        };
        assert_eq!(sink.render(&turn_error).unwrap(), "✗ Bob: Timeout");
        assert!(
            sink.render(&DebateEvent::fatal("budget"))
                .unwrap()
                .contains("Error: budget")
        );

        let step = DebateEvent::ResearchStep {
            agent: "Bob".into(),
            round: 1,
            query: "carbon tax".into(),
            result_count: 3,
            failed: false,
        };
        assert_eq!(
            sink.render(&step).unwrap(),
            "  🔎 Bob searched \"carbon tax\": 3 result(s)"
        );
        assert!(
            sink.render(&DebateEvent::end(EndReason::Cancelled))
                .unwrap()
                .contains("cancelled")
        );
    }
}
