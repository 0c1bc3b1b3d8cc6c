//! Search Module
//!
//! Web search used by the research stage. The pipeline talks to the
//! [`SearchProvider`] trait; [`TavilyClient`] is the production backend.

pub mod tavily;

pub use tavily::{SearchError, SearchProvider, SearchResult, TavilyClient};
