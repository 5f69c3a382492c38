//! Wire encodings of the debate event stream
//!
//! - **SSE**: `data: {json}\n\n`, one frame per event, as browsers'
//!   `EventSource` expects
//! - **NDJSON**: one JSON object per line
//!
//! Both carry the same JSON object with its `type` tag; consumers ignore
//! fields they do not know.

use parliament_application::EventSink;
use parliament_domain::DebateEvent;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::str::FromStr;
use std::sync::Mutex;
use tracing::warn;

/// Framing of a serialized event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireFormat {
    Sse,
    Ndjson,
}

impl WireFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            WireFormat::Sse => "sse",
            WireFormat::Ndjson => "ndjson",
        }
    }

    /// Serialize `event` into one complete frame
    pub fn encode(&self, event: &DebateEvent) -> Result<String, serde_json::Error> {
        let json = serde_json::to_string(event)?;
        Ok(match self {
            WireFormat::Sse => format!("data: {json}\n\n"),
            WireFormat::Ndjson => format!("{json}\n"),
        })
    }
}

impl fmt::Display for WireFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WireFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sse" => Ok(WireFormat::Sse),
            "ndjson" | "jsonl" => Ok(WireFormat::Ndjson),
            other => Err(format!(
                "unknown stream format '{other}' (expected sse or ndjson)"
            )),
        }
    }
}

/// [`EventSink`] writing encoded frames to any writer (stdout, a socket, a buffer)
pub struct StreamEventSink<W: Write + Send> {
    format: WireFormat,
    writer: Mutex<W>,
}

impl<W: Write + Send> StreamEventSink<W> {
    pub fn new(format: WireFormat, writer: W) -> Self {
        Self {
            format,
            writer: Mutex::new(writer),
        }
    }

    pub fn format(&self) -> WireFormat {
        self.format
    }

    /// Recover the writer (tests, buffered consumers)
    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> EventSink for StreamEventSink<W> {
    fn emit(&self, event: &DebateEvent) {
        let frame = match self.format.encode(event) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Could not encode {} event: {}", event.kind(), e);
                return;
            }
        };

        if let Ok(mut writer) = self.writer.lock() {
            // Flush per frame so the consumer sees events as they happen
            if writer
                .write_all(frame.as_bytes())
                .and_then(|_| writer.flush())
                .is_err()
            {
                warn!("Event stream consumer went away");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parliament_domain::EndReason;

    fn complete() -> DebateEvent {
        DebateEvent::DebateComplete {
            total_turns: 5,
            failed_turns: 0,
            steps_taken: 5,
        }
    }

    #[test]
    fn test_sse_frame() {
        let frame = WireFormat::Sse.encode(&complete()).unwrap();
        assert!(frame.starts_with("data: {\"type\":\"debate_complete\""));
        assert!(frame.ends_with("}\n\n"));
        let json: serde_json::Value =
            serde_json::from_str(frame.trim_start_matches("data: ").trim_end()).unwrap();
        assert_eq!(json["total_turns"], 5);
    }

    #[test]
    fn test_ndjson_frame() {
        let frame = WireFormat::Ndjson.encode(&DebateEvent::fatal("boom")).unwrap();
        assert_eq!(frame, "{\"type\":\"error\",\"content\":\"boom\"}\n");
    }

    #[test]
    fn test_stream_sink_preserves_order() {
        let sink = StreamEventSink::new(WireFormat::Ndjson, Vec::new());
        sink.emit(&DebateEvent::end(EndReason::Completed));
        sink.emit(&complete());

        let output = String::from_utf8(sink.into_inner()).unwrap();
        let types: Vec<String> = output
            .lines()
            .map(|l| {
                let v: serde_json::Value = serde_json::from_str(l).unwrap();
                v["type"].as_str().unwrap().to_string()
            })
            .collect();
        assert_eq!(types, vec!["status_update", "debate_complete"]);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("SSE".parse(), Ok(WireFormat::Sse));
        assert_eq!("jsonl".parse(), Ok(WireFormat::Ndjson));
        assert!("xml".parse::<WireFormat>().is_err());
    }
}
