//! Chat layer
//!
//! Owns the conversation transcript and turns pipeline runs into
//! assistant messages. Failures never escape as errors here: they become a
//! chat-visible explanation instead.

pub mod session;

pub use session::{ChatMessage, ChatSession, MessageRole};

use crate::agents::{ResearchPipeline, ResponseFormatter, Stage};
use tracing::warn;

/// Outcome of answering one user message
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub content: String,
    pub succeeded: bool,
}

/// Run the pipeline for `query` and render the assistant's reply.
pub async fn respond<F>(pipeline: &ResearchPipeline, query: &str, on_stage: F) -> Reply
where
    F: FnMut(Stage) + Send,
{
    match pipeline.run_with_progress(query, on_stage).await {
        Ok(state) => Reply {
            content: ResponseFormatter::render(&state),
            succeeded: true,
        },
        Err(e) => {
            warn!(error = %e, "Replying with failure message");
            Reply {
                content: ResponseFormatter::render_failure(&e),
                succeeded: false,
            }
        }
    }
}
