//! CLI command definitions

use clap::{Parser, ValueEnum};
use parliament_application::FailurePolicyKind;
use std::path::PathBuf;

/// How the finished transcript is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every turn of every round
    Full,
    /// Only the moderator's synthesis
    Synthesis,
    /// The transcript as JSON
    Json,
}

impl From<OutputFormat> for parliament_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => parliament_domain::OutputFormat::Full,
            OutputFormat::Synthesis => parliament_domain::OutputFormat::Synthesis,
            OutputFormat::Json => parliament_domain::OutputFormat::Json,
        }
    }
}

/// Raw event protocol written to stdout instead of the console renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StreamFormat {
    /// Server-sent events: `data: {json}` frames
    Sse,
    /// One JSON event per line
    Ndjson,
}

/// CLI arguments for parliament
#[derive(Parser, Debug)]
#[command(name = "parliament")]
#[command(author, version, about = "Multi-agent debate - a panel of AI personas argues a topic")]
#[command(long_about = r#"
Parliament runs a structured debate between a panel of AI personas.

The built-in debate has four rounds:
1. Opening Statements: every panelist answers independently, in parallel
2. Rebuttal: panelists speak in turn and answer each other
3. Surrebuttal: a final defense of each position
4. Synthesis: a neutral moderator summarizes the debate

With a search provider configured, panelists may research the web before
answering and cite their sources.

Configuration files are loaded from (in priority order):
1. PARLIAMENT_* environment variables (e.g. PARLIAMENT_DEBATE__STEP_LIMIT=30)
2. --config <path>       Explicit config file
3. ./parliament.toml     Project-level config
4. ~/.config/parliament/config.toml   Global config

Example:
  parliament "Should cities ban cars from their centers?"
  parliament --output synthesis "Is nuclear power essential for decarbonization?"
  parliament --stream ndjson --offline "Universal basic income"
"#)]
pub struct Cli {
    /// The topic to debate
    #[arg(required_unless_present = "show_config")]
    pub topic: Option<String>,

    /// Output format for the finished transcript
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Write the raw event stream to stdout instead of rendering it
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub stream: Option<StreamFormat>,

    /// Use a deterministic local stand-in instead of the LLM provider
    #[arg(long)]
    pub offline: bool,

    /// Maximum number of agent and moderator turns
    #[arg(long, value_name = "N")]
    pub step_limit: Option<usize>,

    /// What failed turns do to the debate: continue, halt_on_any, halt_on_total
    #[arg(long, value_name = "POLICY")]
    pub failure_policy: Option<FailurePolicyKind>,

    /// DebateSpec TOML file (defaults to the built-in four-round debate)
    #[arg(long, value_name = "PATH")]
    pub spec: Option<PathBuf>,

    /// Disable web research for this run
    #[arg(long)]
    pub no_research: bool,

    /// Append every debate event to this JSONL file
    #[arg(long, value_name = "PATH")]
    pub event_log: Option<PathBuf>,

    /// Write tracing logs to daily-rotated files in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators and live output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
