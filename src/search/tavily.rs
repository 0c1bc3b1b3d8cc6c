//! Tavily Client
//!
//! Provides web search using the Tavily search API, which returns ranked
//! results with a content excerpt per page.
//!
//! ## Request
//!
//! `POST {base}/search` with bearer auth and
//! `{"query", "max_results", "search_depth"}`.
//!
//! ## Response
//!
//! `{"results": [{"title", "url", "content", "score"}, ...]}` in relevance
//! order. An empty `results` array is a valid, non-error answer.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during search operations
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Tavily API key not configured")]
    NoApiKey,

    #[error("Search API rejected the API key")]
    Unauthorized,

    #[error("Search API rate limit exceeded")]
    RateLimited,

    #[error("Search request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse search results: {0}")]
    ParseError(String),
}

/// A single ranked search hit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Page title
    #[serde(default)]
    pub title: String,
    /// Page URL
    #[serde(default)]
    pub url: String,
    /// Extracted page text
    #[serde(default)]
    pub content: String,
}

#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Run one query, returning at most `max_results` hits in rank order.
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>, SearchError>;
}

#[derive(Serialize)]
struct TavilyRequest<'a> {
    query: &'a str,
    max_results: usize,
    search_depth: &'a str,
    include_answer: bool,
}

#[derive(Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

/// Tavily API client
pub struct TavilyClient {
    client: Client,
    api_key: String,
    api_base: String,
    search_depth: String,
}

impl TavilyClient {
    /// Create a new Tavily client
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            api_base: crate::config::TAVILY_API_BASE.to_string(),
            search_depth: "basic".to_string(),
        }
    }

    /// Configure client from config
    pub fn from_config(config: &crate::config::SearchConfig) -> Result<Self, SearchError> {
        if config.tavily_api_key.is_empty() {
            return Err(SearchError::NoApiKey);
        }

        Ok(Self::new(config.tavily_api_key.clone())
            .with_api_base(&config.api_base)
            .with_search_depth(&config.search_depth))
    }

    /// Point the client at a different endpoint
    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    /// Set the search depth ("basic" or "advanced")
    pub fn with_search_depth(mut self, depth: &str) -> Self {
        self.search_depth = depth.to_string();
        self
    }
}

#[async_trait]
impl SearchProvider for TavilyClient {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>, SearchError> {
        info!(query = %query, max_results, "Searching the web via Tavily");

        let url = format!("{}/search", self.api_base);
        let body = TavilyRequest {
            query,
            max_results,
            search_depth: &self.search_depth,
            include_answer: false,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SearchError::RequestFailed(e.to_string()))?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => return Err(SearchError::Unauthorized),
            StatusCode::TOO_MANY_REQUESTS => return Err(SearchError::RateLimited),
            status => {
                let text = response.text().await.unwrap_or_default();
                return Err(SearchError::RequestFailed(format!("HTTP {}: {}", status, text)));
            }
        }

        let parsed: TavilyResponse = response
            .json()
            .await
            .map_err(|e| SearchError::ParseError(e.to_string()))?;

        debug!("Raw Tavily response received");

        let mut results = parsed.results;
        results.truncate(max_results);

        info!(count = results.len(), "Tavily search completed");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[test]
    fn test_from_config_requires_key() {
        let config = crate::config::SearchConfig {
            tavily_api_key: String::new(),
            search_depth: "basic".to_string(),
            api_base: crate::config::TAVILY_API_BASE.to_string(),
        };
        assert!(matches!(TavilyClient::from_config(&config), Err(SearchError::NoApiKey)));
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let parsed: TavilyResponse =
            serde_json::from_str(r#"{"results": [{"url": "https://example.com", "score": 0.4}]}"#).unwrap();
        assert_eq!(parsed.results[0].title, "");
        assert_eq!(parsed.results[0].content, "");
        assert_eq!(parsed.results[0].url, "https://example.com");
    }

    #[tokio::test]
    async fn test_search_returns_ranked_results() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/search")
            .match_header("authorization", "Bearer tvly-test")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "query": "capital of France",
                "max_results": 5,
                "search_depth": "advanced"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "query": "capital of France",
                    "results": [
                        {"title": "Paris - Wikipedia", "url": "https://en.wikipedia.org/wiki/Paris", "content": "Paris is the capital of France.", "score": 0.98},
                        {"title": "France", "url": "https://example.org/france", "content": "France's capital is Paris.", "score": 0.91}
                    ]
                }"#,
            )
            .create_async()
            .await;

        let client = TavilyClient::new("tvly-test")
            .with_api_base(&server.url())
            .with_search_depth("advanced");
        let results = client.search("capital of France", 5).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Paris - Wikipedia");
        assert_eq!(results[1].url, "https://example.org/france");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_results_are_not_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/search")
            .with_status(200)
            .with_body(r#"{"results": []}"#)
            .create_async()
            .await;

        let client = TavilyClient::new("tvly-test").with_api_base(&server.url());
        assert!(client.search("nothing here", 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_results_capped_at_max() {
        let mut server = mockito::Server::new_async().await;
        let hits: Vec<_> = (0..8)
            .map(|i| serde_json::json!({"title": format!("t{}", i), "url": "u", "content": "c"}))
            .collect();
        server
            .mock("POST", "/search")
            .with_status(200)
            .with_body(serde_json::json!({ "results": hits }).to_string())
            .create_async()
            .await;

        let client = TavilyClient::new("tvly-test").with_api_base(&server.url());
        let results = client.search("many", 5).await.unwrap();
        assert_eq!(results.len(), 5);
        assert_eq!(results[4].title, "t4");
    }

    #[tokio::test]
    async fn test_status_codes_map_to_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/search")
            .with_status(401)
            .create_async()
            .await;
        let client = TavilyClient::new("bad").with_api_base(&server.url());
        assert!(matches!(client.search("q", 5).await, Err(SearchError::Unauthorized)));

        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/search")
            .with_status(429)
            .create_async()
            .await;
        let client = TavilyClient::new("tvly-test").with_api_base(&server.url());
        assert!(matches!(client.search("q", 5).await, Err(SearchError::RateLimited)));

        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/search")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;
        let client = TavilyClient::new("tvly-test").with_api_base(&server.url());
        assert!(matches!(client.search("q", 5).await, Err(SearchError::RequestFailed(_))));
    }
}
