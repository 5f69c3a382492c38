//! Event stream port
//!
//! The orchestrator emits every status and content event through an
//! [`EventSink`]. Wire encodings (SSE, NDJSON, JSONL log) and console
//! rendering are adapters in outer layers.

use parliament_domain::DebateEvent;

/// Ordered, append-only consumer of debate events
///
/// Calls arrive in stream order from a single task. Implementations must not
/// block for long; slow consumers should buffer.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &DebateEvent);
}

/// Sink that drops everything
pub struct NoEvents;

impl EventSink for NoEvents {
    fn emit(&self, _event: &DebateEvent) {}
}

/// Fans each event out to several sinks, in order.
///
/// Holds borrowed sinks so owned and borrowed adapters compose without
/// wrapper types.
///
/// ```text
/// RunDebateUseCase.execute(input, &composite)
///                                    |
///            +-----------------------+----------------------+
///            |                       |                      |
///   ConsoleEventSink        ProgressEventSink        JsonlEventSink
/// ```
pub struct CompositeEventSink<'a> {
    delegates: Vec<&'a dyn EventSink>,
}

impl<'a> CompositeEventSink<'a> {
    pub fn new(delegates: Vec<&'a dyn EventSink>) -> Self {
        Self { delegates }
    }

    pub fn push(&mut self, sink: &'a dyn EventSink) {
        self.delegates.push(sink);
    }

    pub fn len(&self) -> usize {
        self.delegates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.delegates.is_empty()
    }
}

impl EventSink for CompositeEventSink<'_> {
    fn emit(&self, event: &DebateEvent) {
        for d in &self.delegates {
            d.emit(event);
        }
    }
}
