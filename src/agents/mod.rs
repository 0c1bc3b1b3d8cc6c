//! Research Pipeline
//!
//! Six stages, run strictly in order for every user question:
//!
//! ```text
//! User Question
//!      │
//!      ▼
//! ┌─────────────┐
//! │   Query     │  → main topic, subtopics, search terms
//! │  Analyzer   │
//! └─────────────┘
//!      │
//!      ▼
//! ┌─────────────┐
//! │  Research   │  → up to 5 ranked web results
//! │   Agent     │
//! └─────────────┘
//!      │
//!      ▼
//! ┌─────────────┐
//! │  Content    │  → one ≤1000-char snippet per result
//! │ Extractor   │
//! └─────────────┘
//!      │
//!      ▼
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Answer    │ ──▶ │   Answer    │ ──▶ │  Follow-up  │
//! │  Drafter    │     │  Refiner    │     │  Generator  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! Each stage takes only the inputs it needs and returns only what it
//! adds; [`ResearchPipeline`] threads the results into a [`ResearchState`].

pub mod query_analyzer;
pub mod research;
pub mod extractor;
pub mod drafter;
pub mod refiner;
pub mod followups;
pub mod response;

pub use query_analyzer::{AnalyzedQuery, QueryAnalyzer};
pub use research::ResearchAgent;
pub use extractor::ContentExtractor;
pub use drafter::AnswerDrafter;
pub use refiner::AnswerRefiner;
pub use followups::FollowupGenerator;
pub use response::ResponseFormatter;

use crate::config::Config;
use crate::llm::LLM;
use crate::search::{SearchProvider, SearchResult, TavilyClient};
use crate::types::{AppError, AppResult};
use crate::utils::{with_retry, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use thiserror::Error;
use tracing::{error, info};

/// Number of web results requested per question
pub const MAX_SEARCH_RESULTS: usize = 5;

/// Longest snippet kept from a single search result, in characters
pub const MAX_SNIPPET_CHARS: usize = 1000;

/// Named pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    QueryAnalysis,
    Research,
    ContentExtraction,
    Drafting,
    Refinement,
    FollowUps,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::QueryAnalysis,
        Stage::Research,
        Stage::ContentExtraction,
        Stage::Drafting,
        Stage::Refinement,
        Stage::FollowUps,
    ];

    /// Short label for progress displays
    pub fn short_name(&self) -> &'static str {
        match self {
            Stage::QueryAnalysis => "Analyze",
            Stage::Research => "Search",
            Stage::ContentExtraction => "Extract",
            Stage::Drafting => "Draft",
            Stage::Refinement => "Refine",
            Stage::FollowUps => "Follow-ups",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::QueryAnalysis => "query analysis",
            Stage::Research => "web research",
            Stage::ContentExtraction => "content extraction",
            Stage::Drafting => "answer drafting",
            Stage::Refinement => "answer refinement",
            Stage::FollowUps => "follow-up generation",
        };
        f.write_str(name)
    }
}

/// Everything learned while answering one question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchState {
    pub query: String,
    pub analyzed_query: AnalyzedQuery,
    pub search_results: Vec<SearchResult>,
    pub extracted_content: Vec<String>,
    pub draft_answer: String,
    pub final_answer: String,
    pub followup_questions: String,
}

/// A run that stopped before producing a final answer
#[derive(Debug, Error)]
#[error("{stage} failed: {source}")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: AppError,
}

/// Completion call shared by the LLM-backed stages
pub(crate) async fn complete(
    llm: &LLM,
    retry: &RetryPolicy,
    stage: Stage,
    prompt: &str,
) -> AppResult<String> {
    with_retry(retry, stage.short_name(), || llm.complete(prompt)).await
}

/// The configured six-stage pipeline. Immutable once built, so one
/// instance can serve every run for the life of the process.
pub struct ResearchPipeline {
    llm: LLM,
    search: Box<dyn SearchProvider>,
    retry: RetryPolicy,
}

impl ResearchPipeline {
    pub fn new(llm: LLM, search: Box<dyn SearchProvider>, retry: RetryPolicy) -> Self {
        Self { llm, search, retry }
    }

    /// Build the production pipeline (configured LLM provider + Tavily)
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let llm = LLM::new(&config.llm)?;
        let search = TavilyClient::from_config(&config.search)?;
        Ok(Self::new(
            llm,
            Box::new(search),
            RetryPolicy::from_config(&config.retry),
        ))
    }

    pub fn model(&self) -> &str {
        self.llm.model()
    }

    pub async fn run(&self, query: &str) -> Result<ResearchState, PipelineError> {
        self.run_with_progress(query, |_| {}).await
    }

    /// Run all stages, calling `on_stage` as each one starts.
    pub async fn run_with_progress<F>(
        &self,
        query: &str,
        mut on_stage: F,
    ) -> Result<ResearchState, PipelineError>
    where
        F: FnMut(Stage) + Send,
    {
        let started = Instant::now();
        let query = query.trim();
        if query.is_empty() {
            return Err(PipelineError {
                stage: Stage::QueryAnalysis,
                source: AppError::InvalidRequest("Query must not be empty".to_string()),
            });
        }

        info!(query_len = query.len(), "Starting research pipeline");
        let fail = |stage: Stage| {
            move |source: AppError| {
                error!(stage = %stage, error = %source, "Research pipeline aborted");
                PipelineError { stage, source }
            }
        };

        on_stage(Stage::QueryAnalysis);
        let analyzed_query = QueryAnalyzer::analyze(&self.llm, &self.retry, query)
            .await
            .map_err(fail(Stage::QueryAnalysis))?;

        on_stage(Stage::Research);
        let search_results =
            ResearchAgent::search(self.search.as_ref(), &self.retry, &analyzed_query, MAX_SEARCH_RESULTS)
                .await;

        on_stage(Stage::ContentExtraction);
        let extracted_content = ContentExtractor::extract(&search_results, MAX_SNIPPET_CHARS);

        on_stage(Stage::Drafting);
        let draft_answer = AnswerDrafter::draft(&self.llm, &self.retry, query, &extracted_content)
            .await
            .map_err(fail(Stage::Drafting))?;

        on_stage(Stage::Refinement);
        let final_answer = AnswerRefiner::refine(&self.llm, &self.retry, &draft_answer)
            .await
            .map_err(fail(Stage::Refinement))?;

        on_stage(Stage::FollowUps);
        let followup_questions = FollowupGenerator::generate(&self.llm, &self.retry, &final_answer)
            .await
            .map_err(fail(Stage::FollowUps))?;

        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            source_count = search_results.len(),
            answer_len = final_answer.len(),
            "Research pipeline complete"
        );

        Ok(ResearchState {
            query: query.to_string(),
            analyzed_query,
            search_results,
            extracted_content,
            draft_answer,
            final_answer,
            followup_questions,
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted collaborators for pipeline tests

    use super::*;
    use crate::llm::LLMAdapter;
    use crate::search::SearchError;
    use crate::types::{LLMRequest, LLMResponse, TokenUsage};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned completions in order; `Err` entries simulate API failures
    pub struct ScriptedLLM {
        replies: Mutex<VecDeque<Result<String, String>>>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl ScriptedLLM {
        pub fn new(replies: Vec<Result<&str, &str>>) -> Self {
            Self {
                replies: Mutex::new(
                    replies
                        .into_iter()
                        .map(|r| r.map(String::from).map_err(String::from))
                        .collect(),
                ),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LLMAdapter for std::sync::Arc<ScriptedLLM> {
        async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
            if let Some(message) = request.messages.last() {
                self.prompts.lock().unwrap().push(message.content.clone());
            }
            let next = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err("script exhausted".to_string()));
            next.map(|content| LLMResponse {
                content,
                finish_reason: "stop".to_string(),
                usage: TokenUsage::default(),
            })
            .map_err(AppError::LLMApi)
        }
    }

    /// Returns fixed results, or fails every call when `results` is `None`
    pub struct StaticSearch {
        pub results: Option<Vec<SearchResult>>,
        pub queries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SearchProvider for std::sync::Arc<StaticSearch> {
        async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>, SearchError> {
            self.queries.lock().unwrap().push(query.to_string());
            match &self.results {
                Some(results) => Ok(results.iter().take(max_results).cloned().collect()),
                None => Err(SearchError::RequestFailed("connection refused".to_string())),
            }
        }
    }

    pub fn france_results() -> Vec<SearchResult> {
        (1..=5)
            .map(|i| SearchResult {
                title: format!("Paris source {}", i),
                url: format!("https://example.com/paris/{}", i),
                content: format!("Paris is the capital of France. {}", "Detail. ".repeat(200)),
            })
            .collect()
    }
}
