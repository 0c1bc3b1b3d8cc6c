//! Query Analyzer
//!
//! First pipeline stage. Asks the LLM to break the user's question into a
//! main topic, subtopics and search terms, and decodes the reply as strict
//! JSON. Model output is never evaluated; anything that does not decode to
//! the expected object falls back to searching for the raw query.

use crate::agents::{complete, Stage};
use crate::llm::LLM;
use crate::types::AppResult;
use crate::utils::RetryPolicy;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Structured decomposition of a user query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedQuery {
    pub main_topic: String,
    pub subtopics: Vec<String>,
    pub search_terms: Vec<String>,
}

impl AnalyzedQuery {
    /// Record used whenever the model's analysis cannot be decoded
    pub fn fallback(query: &str) -> Self {
        let query = query.trim().to_string();
        Self {
            main_topic: query.clone(),
            subtopics: Vec::new(),
            search_terms: vec![query],
        }
    }
}

/// Raw JSON shape requested from the LLM
#[derive(Debug, Deserialize)]
struct AnalysisLLMResponse {
    #[serde(default)]
    main_topic: Option<String>,
    #[serde(default)]
    subtopics: Vec<String>,
    #[serde(default)]
    search_terms: Vec<String>,
}

pub struct QueryAnalyzer;

impl QueryAnalyzer {
    /// Run the analysis stage for `query`.
    ///
    /// Only completion-service failures are returned as errors; a reply that
    /// cannot be decoded yields [`AnalyzedQuery::fallback`].
    pub async fn analyze(llm: &LLM, retry: &RetryPolicy, query: &str) -> AppResult<AnalyzedQuery> {
        let prompt = Self::create_prompt(query);
        let raw = complete(llm, retry, Stage::QueryAnalysis, &prompt).await?;

        let analyzed = Self::interpret(&raw, query);
        info!(
            main_topic = %analyzed.main_topic,
            subtopic_count = analyzed.subtopics.len(),
            search_terms = ?analyzed.search_terms,
            "Query analyzed"
        );
        Ok(analyzed)
    }

    /// Decode a model reply, falling back on any failure.
    pub fn interpret(raw: &str, query: &str) -> AnalyzedQuery {
        match Self::parse_analysis(raw, query) {
            Ok(analyzed) => analyzed,
            Err(e) => {
                warn!(error = %e, "Query analysis not parseable, searching for the raw query");
                AnalyzedQuery::fallback(query)
            }
        }
    }

    fn create_prompt(query: &str) -> String {
        format!(
            r#"Analyze this user query and extract key components.
Return a JSON like this:
{{"main_topic": "...", "subtopics": [...], "search_terms": [...]}}.
Respond with ONLY the JSON object.
Query: {query}"#,
            query = query
        )
    }

    /// Strictly decode the analysis JSON.
    ///
    /// Accepts the object on its own, inside a fenced code block, or as the
    /// outermost `{...}` span of the reply.
    pub fn parse_analysis(response: &str, query: &str) -> Result<AnalyzedQuery> {
        for candidate in Self::json_candidates(response) {
            let value: serde_json::Value = match serde_json::from_str(candidate) {
                Ok(value) => value,
                Err(_) => continue,
            };
            if !value.is_object() {
                continue;
            }

            let parsed: AnalysisLLMResponse = serde_json::from_value(value)
                .map_err(|e| anyhow::anyhow!("Analysis JSON has the wrong shape: {}", e))?;
            return Ok(Self::normalize(parsed, query));
        }

        Err(anyhow::anyhow!("No JSON object found in analysis response"))
    }

    fn json_candidates(response: &str) -> Vec<&str> {
        let trimmed = response.trim();
        let mut candidates = vec![trimmed];

        if let Some(fenced) = trimmed
            .split("```json")
            .nth(1)
            .or_else(|| trimmed.split("```").nth(1))
            .and_then(|s| s.split("```").next())
        {
            candidates.push(fenced.trim());
        }

        if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
            if start < end {
                candidates.push(&trimmed[start..=end]);
            }
        }

        candidates
    }

    fn normalize(parsed: AnalysisLLMResponse, query: &str) -> AnalyzedQuery {
        let clean = |items: Vec<String>| -> Vec<String> {
            items
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        };

        let mut search_terms = clean(parsed.search_terms);
        if search_terms.is_empty() {
            search_terms = vec![query.trim().to_string()];
        }

        let main_topic = parsed
            .main_topic
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| query.trim().to_string());

        AnalyzedQuery {
            main_topic,
            subtopics: clean(parsed.subtopics),
            search_terms,
        }
    }
}
