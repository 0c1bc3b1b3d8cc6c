//! Research Agent
//!
//! Turns the analyzed search terms into a single web query. Search is
//! allowed to fail: after retries are exhausted the stage yields no
//! results and later stages answer without external content.

use crate::agents::query_analyzer::AnalyzedQuery;
use crate::search::{SearchProvider, SearchResult};
use crate::utils::{with_retry, RetryPolicy};
use tracing::{info, warn};

pub struct ResearchAgent;

impl ResearchAgent {
    /// Join search terms into the query string sent to the search service
    pub fn build_search_query(analyzed: &AnalyzedQuery) -> String {
        analyzed.search_terms.join(" ")
    }

    pub async fn search(
        provider: &dyn SearchProvider,
        retry: &RetryPolicy,
        analyzed: &AnalyzedQuery,
        max_results: usize,
    ) -> Vec<SearchResult> {
        let query = Self::build_search_query(analyzed);

        match with_retry(retry, "web_search", || provider.search(&query, max_results)).await {
            Ok(results) => {
                info!(query = %query, count = results.len(), "Research complete");
                results
            }
            Err(e) => {
                warn!(query = %query, error = %e, "Search failed, continuing without sources");
                Vec::new()
            }
        }
    }
}
