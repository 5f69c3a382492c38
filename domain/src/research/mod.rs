//! Research subgraph: a bounded reason → search → observe loop that lets an
//! agent ground its turn in search results before answering.

pub mod citation;
pub mod parsing;
pub mod state;

pub use citation::{Citation, CitationLedger, SearchHit};
pub use parsing::{ToolInvocation, ToolParseError, extract_invocation, strip_tool_blocks};
pub use state::{FinalizeReason, ResearchLimits, ResearchLoop, ResearchPhase};
