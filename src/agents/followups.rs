//! Follow-up Generator
//!
//! Suggests questions the user might ask next. The reply is kept as free
//! text; "three questions" is a request to the model, not a checked rule.

use crate::agents::{complete, Stage};
use crate::llm::LLM;
use crate::types::AppResult;
use crate::utils::RetryPolicy;
use tracing::info;

pub struct FollowupGenerator;

impl FollowupGenerator {
    pub async fn generate(llm: &LLM, retry: &RetryPolicy, final_answer: &str) -> AppResult<String> {
        let prompt = Self::create_prompt(final_answer);
        let questions = complete(llm, retry, Stage::FollowUps, &prompt).await?;
        info!(lines = questions.lines().count(), "Follow-up questions ready");
        Ok(questions)
    }

    fn create_prompt(answer: &str) -> String {
        format!(
            r#"Based on the final answer, suggest 3 thoughtful follow-up questions the user might ask.
Answer: {answer}
Questions:"#,
            answer = answer
        )
    }
}
