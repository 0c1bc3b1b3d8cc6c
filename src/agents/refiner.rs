//! Answer Refiner

use crate::agents::{complete, Stage};
use crate::llm::LLM;
use crate::types::AppResult;
use crate::utils::RetryPolicy;
use tracing::info;

pub struct AnswerRefiner;

impl AnswerRefiner {
    /// Polish the draft into the final, structured answer
    pub async fn refine(llm: &LLM, retry: &RetryPolicy, draft_answer: &str) -> AppResult<String> {
        let prompt = Self::create_prompt(draft_answer);
        let final_answer = complete(llm, retry, Stage::Refinement, &prompt).await?;
        info!(answer_len = final_answer.len(), "Final answer ready");
        Ok(final_answer)
    }

    fn create_prompt(draft: &str) -> String {
        format!(
            r#"Polish the following draft to make it more clear and structured.
Draft: {draft}
Final Answer:"#,
            draft = draft
        )
    }
}
