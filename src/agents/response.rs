//! Response rendering
//!
//! Formats a finished research run (or a failed one) as the markdown
//! message shown in the chat transcript.

use crate::agents::{PipelineError, ResearchState};

pub struct ResponseFormatter;

impl ResponseFormatter {
    /// Final answer, then sources (only when the search found any), then follow-ups.
    pub fn render(state: &ResearchState) -> String {
        let mut response = state.final_answer.clone();

        if !state.search_results.is_empty() {
            response.push_str("\n\n**Sources:**\n");
            for r in &state.search_results {
                let title = if r.title.trim().is_empty() { "Untitled" } else { r.title.as_str() };
                let url = if r.url.trim().is_empty() { "#" } else { r.url.as_str() };
                response.push_str(&format!("- [{}]({})\n", title, url));
            }
        }

        if !state.followup_questions.trim().is_empty() {
            if state.search_results.is_empty() {
                response.push('\n');
            }
            response.push_str("\n**Follow-up questions:**\n");
            response.push_str(&state.followup_questions);
        }

        response
    }

    /// Chat-visible explanation of an aborted run
    pub fn render_failure(error: &PipelineError) -> String {
        format!(
            "Sorry, research failed during {}: {}\n\nPlease try again.",
            error.stage, error.source
        )
    }
}
