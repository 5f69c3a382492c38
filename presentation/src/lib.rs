//! Presentation layer for parliament
//!
//! This crate contains the CLI definition, live console rendering of the
//! debate event stream, progress spinners and transcript formatters.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat, StreamFormat};
pub use output::console::ConsoleFormatter;
pub use output::events::ConsoleEventSink;
pub use progress::reporter::ProgressEventSink;
