//! Logging infrastructure: the structured debate event log.
//!
//! Provides [`JsonlEventSink`], a JSONL file writer that implements the
//! [`EventSink`](parliament_application::EventSink) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlEventSink;
