//! TUI Widgets
//!
//! Custom widgets for the Research Chatbot TUI.

mod progress;

pub use progress::render_progress;
