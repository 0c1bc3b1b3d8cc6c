// Research Chatbot - web-researched answers through a six-stage LLM pipeline

pub mod agents;
pub mod chat;
pub mod config;
pub mod llm;
pub mod search;    // Web search (Tavily)
pub mod tui;       // Terminal User Interface
pub mod types;
pub mod utils;

// Re-exports for convenience
pub use agents::{PipelineError, ResearchPipeline, ResearchState, Stage};
pub use chat::ChatSession;
pub use config::Config;
