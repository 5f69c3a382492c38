//! Progress reporting for debate execution

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use parliament_application::EventSink;
use parliament_domain::{DebateEvent, StatusCode};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// One spinner per agent that is currently speaking.
///
/// Parallel rounds show a spinner for every panelist at once; sequential
/// rounds show one at a time. A spinner ends on its agent's response or
/// error, and all spinners are cleared when the debate ends.
pub struct ProgressEventSink {
    multi: MultiProgress,
    spinners: Mutex<HashMap<String, ProgressBar>>,
}

impl ProgressEventSink {
    pub fn new() -> Self {
        Self::with_target(ProgressDrawTarget::stderr())
    }

    /// Progress sink drawing nowhere (tests, non-interactive runs)
    pub fn hidden() -> Self {
        Self::with_target(ProgressDrawTarget::hidden())
    }

    fn with_target(target: ProgressDrawTarget) -> Self {
        Self {
            multi: MultiProgress::with_draw_target(target),
            spinners: Mutex::new(HashMap::new()),
        }
    }

    /// Handle for printing above the spinners
    pub fn multi(&self) -> MultiProgress {
        self.multi.clone()
    }

    /// Number of spinners still running
    #[cfg(test)]
    fn active(&self) -> usize {
        self.spinners.lock().map(|s| s.len()).unwrap_or_default()
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn start(&self, name: &str, icon: &str, activity: &str) {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(Self::spinner_style());
        let label = if icon.is_empty() {
            format!("{name} is {activity}...")
        } else {
            format!("{icon} {name} is {activity}...")
        };
        pb.set_message(label);
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut spinners) = self.spinners.lock()
            && let Some(previous) = spinners.insert(name.to_string(), pb)
        {
            previous.finish_and_clear();
        }
    }

    fn finish(&self, name: &str) {
        if let Ok(mut spinners) = self.spinners.lock()
            && let Some(pb) = spinners.remove(name)
        {
            pb.finish_and_clear();
        }
    }

    fn clear(&self) {
        if let Ok(mut spinners) = self.spinners.lock() {
            for (_, pb) in spinners.drain() {
                pb.finish_and_clear();
            }
        }
    }
}

impl Default for ProgressEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for ProgressEventSink {
    fn emit(&self, event: &DebateEvent) {
        match event {
            DebateEvent::StatusUpdate {
                code: StatusCode::AgentTurnStarting,
                agent: Some(agent),
                ..
            } => self.start(&agent.name, &agent.icon, "thinking"),
            DebateEvent::StatusUpdate {
                code: StatusCode::Synthesis,
                agent: Some(agent),
                ..
            } => self.start(&agent.name, &agent.icon, "synthesizing"),
            DebateEvent::StatusUpdate {
                code: StatusCode::End,
                ..
            } => self.clear(),
            DebateEvent::AgentResponse { agent, .. } => self.finish(agent),
            DebateEvent::Error {
                agent: Some(agent), ..
            } => self.finish(agent),
            DebateEvent::Error { agent: None, .. } | DebateEvent::DebateComplete { .. } => {
                self.clear()
            }
            _ => {}
        }
    }
}
