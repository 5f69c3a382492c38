//! Debate definitions: DebateSpec documents and the panel

pub mod panel;
pub mod spec_loader;

pub use panel::{build_panel, default_panel};
pub use spec_loader::{SpecLoadError, SpecLoader};
