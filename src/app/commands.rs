use crate::view::{Origin, Section};

/// What the session does next after a picker selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Cancelled or empty selection
    Exit,
    /// Show the same level again
    Redraw,
    Back,
    Home,
    /// Jump straight to a built-in section
    Jump(Section),
    /// Descend into a folder by key
    Enter(String),
    Launch {
        command: String,
        origin: Origin,
        label: String,
    },
    /// Open a web search URL
    Search(String),
}
