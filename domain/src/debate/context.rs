//! Context rendering for agent prompts
//!
//! The context is the user-visible body of a turn's prompt: the topic plus
//! whatever earlier turns the round's [`ContextStrategy`] allows the speaker
//! to see. Failed turns are never rendered.

use super::spec::{ContextStrategy, RoundDef};
use super::transcript::{Transcript, Turn};
use crate::core::topic::Topic;

/// Render the context for a speaker in `round`, given the transcript as it
/// stands when the turn starts.
///
/// - `full_transcript`: every completed turn so far, including earlier turns
///   of the current round.
/// - `topic_only`: the topic, followed by completed turns of the current
///   round when there are any (sequential rounds react within the round).
///
/// Parallel rounds call this with the pre-round transcript for every agent,
/// so all agents of the round see the same text.
pub fn render_context(topic: &Topic, round: &RoundDef, transcript: &Transcript) -> String {
    match round.effective_context_strategy() {
        ContextStrategy::TopicOnly => {
            let in_round: Vec<&Turn> = transcript
                .round_turns(round.index)
                .filter(|t| !t.is_failed())
                .collect();
            if in_round.is_empty() {
                return topic.content().to_string();
            }
            let mut lines = vec![
                format!("Original Topic: {}", topic.content()),
                String::new(),
                "Earlier In This Round:".to_string(),
            ];
            push_turns(&mut lines, in_round);
            lines.join("\n")
        }
        ContextStrategy::FullTranscript => {
            let mut lines = vec![
                format!("Original Topic: {}", topic.content()),
                String::new(),
                "Full Debate Transcript So Far:".to_string(),
            ];
            push_turns(&mut lines, transcript.completed());
            lines.join("\n")
        }
    }
}

fn push_turns<'a>(lines: &mut Vec<String>, turns: impl IntoIterator<Item = &'a Turn>) {
    for turn in turns {
        lines.push(String::new());
        lines.push(format!(
            "{} (Round {}):",
            turn.speaker_name,
            turn.round_number()
        ));
        lines.push(turn.content.clone());
    }
}
