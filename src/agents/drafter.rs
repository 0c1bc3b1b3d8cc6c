//! Answer Drafter
//!
//! Produces a concise first answer from the query and the extracted snippets.

use crate::agents::{complete, Stage};
use crate::llm::LLM;
use crate::types::AppResult;
use crate::utils::RetryPolicy;
use tracing::info;

pub struct AnswerDrafter;

impl AnswerDrafter {
    pub async fn draft(
        llm: &LLM,
        retry: &RetryPolicy,
        query: &str,
        extracted_content: &[String],
    ) -> AppResult<String> {
        let prompt = Self::create_prompt(query, extracted_content);
        let draft = complete(llm, retry, Stage::Drafting, &prompt).await?;
        info!(draft_len = draft.len(), snippet_count = extracted_content.len(), "Draft answer ready");
        Ok(draft)
    }

    fn create_prompt(query: &str, extracted_content: &[String]) -> String {
        let content = if extracted_content.is_empty() {
            "No search results were found.".to_string()
        } else {
            extracted_content.join("\n")
        };

        format!(
            r#"Use the info below to answer the query concisely.
Query: {query}
Info: {content}
Answer:"#,
            query = query,
            content = content
        )
    }
}
