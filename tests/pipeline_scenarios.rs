//! End-to-end chat scenarios against in-memory LLM and search services.

use async_trait::async_trait;
use research_chatbot::chat::{self, ChatSession, MessageRole};
use research_chatbot::llm::{LLMAdapter, LLM};
use research_chatbot::search::{SearchError, SearchProvider, SearchResult};
use research_chatbot::types::{AppResult, LLMRequest, LLMResponse, TokenUsage};
use research_chatbot::utils::RetryPolicy;
use research_chatbot::ResearchPipeline;
use std::sync::{Arc, Mutex};

/// Answers each stage based on what its prompt asks for
struct RoutingLLM {
    analysis: &'static str,
}

#[async_trait]
impl LLMAdapter for RoutingLLM {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        let prompt = request
            .messages
            .last()
            .map(|m| m.content.as_str())
            .unwrap_or_default();

        let content = if prompt.starts_with("Analyze this user query") {
            self.analysis
        } else if prompt.starts_with("Use the info below") {
            "Paris"
        } else if prompt.starts_with("Polish the following draft") {
            "The capital of France is **Paris**."
        } else {
            "1. What is the population of Paris?\n2. When did Paris become the capital?\n3. What are the main landmarks in Paris?"
        };

        Ok(LLMResponse {
            content: content.to_string(),
            finish_reason: "stop".to_string(),
            usage: TokenUsage::default(),
        })
    }
}

#[derive(Clone, Default)]
struct RecordingSearch {
    results: Vec<SearchResult>,
    queries: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl SearchProvider for RecordingSearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>, SearchError> {
        self.queries.lock().unwrap().push(query.to_string());
        Ok(self.results.iter().take(max_results).cloned().collect())
    }
}

fn paris_results(count: usize) -> Vec<SearchResult> {
    (0..count)
        .map(|i| SearchResult {
            title: format!("Paris - Wikipedia {}", i),
            url: format!("https://en.wikipedia.org/wiki/Paris?{}", i),
            content: "Paris is the capital and largest city of France. ".repeat(40),
        })
        .collect()
}

fn pipeline(analysis: &'static str, search: RecordingSearch) -> ResearchPipeline {
    ResearchPipeline::new(
        LLM::with_adapter(Box::new(RoutingLLM { analysis }), "routing-model"),
        Box::new(search),
        RetryPolicy::immediate(2),
    )
}

#[tokio::test]
async fn capital_of_france_end_to_end() {
    let search = RecordingSearch {
        results: paris_results(8),
        ..Default::default()
    };
    let pipeline = pipeline(
        r#"{"main_topic": "France", "subtopics": ["capital"], "search_terms": ["capital", "France"]}"#,
        search.clone(),
    );

    let state = pipeline.run("What is the capital of France?").await.unwrap();

    assert_eq!(search.queries.lock().unwrap().as_slice(), ["capital France"]);
    assert_eq!(state.search_results.len(), 5);
    assert_eq!(state.extracted_content.len(), 5);
    for (snippet, result) in state.extracted_content.iter().zip(&state.search_results) {
        assert_eq!(snippet.chars().count(), 1000);
        assert!(result.content.starts_with(snippet.as_str()));
    }
    assert!(state.final_answer.contains("Paris"));
    assert_eq!(state.followup_questions.lines().count(), 3);

    let json = serde_json::to_value(&state).unwrap();
    assert_eq!(json["analyzed_query"]["main_topic"], "France");
}

#[tokio::test]
async fn malformed_analysis_searches_for_the_raw_query() {
    let search = RecordingSearch {
        results: paris_results(2),
        ..Default::default()
    };
    let pipeline = pipeline("not json at all", search.clone());

    let state = pipeline.run("What is the capital of France?").await.unwrap();

    assert_eq!(state.analyzed_query.search_terms, vec!["What is the capital of France?"]);
    assert_eq!(
        search.queries.lock().unwrap().as_slice(),
        ["What is the capital of France?"]
    );
    assert!(!state.final_answer.is_empty());
}

#[tokio::test]
async fn zero_results_reply_has_no_sources() {
    let pipeline = pipeline(
        r#"{"main_topic": "x", "subtopics": [], "search_terms": ["zxqv"]}"#,
        RecordingSearch::default(),
    );

    let reply = chat::respond(&pipeline, "zxqv obscure", |_| {}).await;

    assert!(reply.succeeded);
    assert!(!reply.content.contains("Sources"));
    assert!(reply.content.contains("**Follow-up questions:**"));
}

#[tokio::test]
async fn chat_session_records_both_sides() {
    let pipeline = pipeline("not json at all", RecordingSearch {
        results: paris_results(1),
        ..Default::default()
    });
    let mut session = ChatSession::new();

    let reply = session
        .handle_message(&pipeline, "What is the capital of France?")
        .await;
    assert!(reply.content.contains("**Sources:**"));
    assert!(reply.content.contains("- [Paris - Wikipedia 0](https://en.wikipedia.org/wiki/Paris?0)"));

    let transcript = session.end();
    let roles: Vec<MessageRole> = transcript.iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![MessageRole::User, MessageRole::Assistant]);
}
