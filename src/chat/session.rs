//! Chat Session
//!
//! An append-only transcript scoped to one user session. Created when the
//! interface starts, appended to per message, ended explicitly.

use crate::agents::ResearchPipeline;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

/// A chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug)]
pub struct ChatSession {
    id: Uuid,
    created_at: DateTime<Utc>,
    messages: Vec<ChatMessage>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        let id = Uuid::new_v4();
        info!(session_id = %id, "Chat session started");
        Self {
            id,
            created_at: Utc::now(),
            messages: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn push(&mut self, role: MessageRole, content: impl Into<String>) -> &ChatMessage {
        self.messages.push(ChatMessage {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        });
        // just pushed
        &self.messages[self.messages.len() - 1]
    }

    pub fn push_user(&mut self, content: impl Into<String>) -> &ChatMessage {
        self.push(MessageRole::User, content)
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) -> &ChatMessage {
        self.push(MessageRole::Assistant, content)
    }

    pub fn push_system(&mut self, content: impl Into<String>) -> &ChatMessage {
        self.push(MessageRole::System, content)
    }

    /// Record the user's message, research it, and record the reply.
    pub async fn handle_message(&mut self, pipeline: &ResearchPipeline, text: &str) -> &ChatMessage {
        self.push_user(text);
        let reply = super::respond(pipeline, text, |_| {}).await;
        self.push_assistant(reply.content)
    }

    /// Tear the session down, returning its transcript.
    pub fn end(self) -> Vec<ChatMessage> {
        info!(
            session_id = %self.id,
            message_count = self.messages.len(),
            "Chat session ended"
        );
        self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::testing::{france_results, ScriptedLLM, StaticSearch};
    use crate::llm::LLM;
    use crate::utils::RetryPolicy;
    use std::sync::{Arc, Mutex};

    fn pipeline(replies: Vec<Result<&str, &str>>, results: Vec<crate::search::SearchResult>) -> ResearchPipeline {
        ResearchPipeline::new(
            LLM::with_adapter(Box::new(Arc::new(ScriptedLLM::new(replies))), "scripted"),
            Box::new(Arc::new(StaticSearch {
                results: Some(results),
                queries: Mutex::new(Vec::new()),
            })),
            RetryPolicy::immediate(1),
        )
    }

    #[test]
    fn test_transcript_is_append_only_in_order() {
        let mut session = ChatSession::new();
        session.push_system("Welcome");
        session.push_user("Hi");
        session.push_assistant("Hello!");

        let roles: Vec<_> = session.messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![MessageRole::System, MessageRole::User, MessageRole::Assistant]);

        let transcript = session.end();
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[2].content, "Hello!");
    }

    #[test]
    fn test_sessions_have_distinct_ids() {
        assert_ne!(ChatSession::new().id(), ChatSession::new().id());
    }

    #[tokio::test]
    async fn test_handle_message_appends_rendered_reply() {
        let pipeline = pipeline(
            vec![
                Ok(r#"{"main_topic": "France", "subtopics": [], "search_terms": ["capital of France"]}"#),
                Ok("Paris."),
                Ok("The capital of France is Paris."),
                Ok("1. Why Paris?\n2. Since when?\n3. What else?"),
            ],
            france_results(),
        );

        let mut session = ChatSession::new();
        let reply = session
            .handle_message(&pipeline, "What is the capital of France?")
            .await
            .clone();

        assert_eq!(reply.role, MessageRole::Assistant);
        assert!(reply.content.starts_with("The capital of France is Paris."));
        assert!(reply.content.contains("**Sources:**"));
        assert!(reply.content.contains("**Follow-up questions:**"));
        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.messages()[0].role, MessageRole::User);
    }

    #[tokio::test]
    async fn test_failed_run_becomes_assistant_message() {
        let pipeline = pipeline(vec![Err("service unavailable")], france_results());

        let mut session = ChatSession::new();
        let reply = session.handle_message(&pipeline, "anything").await.clone();

        assert_eq!(reply.role, MessageRole::Assistant);
        assert!(reply.content.contains("research failed during query analysis"));
        assert!(reply.content.contains("service unavailable"));
    }

    #[test]
    fn test_roles_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&MessageRole::Assistant).unwrap(), "\"assistant\"");
    }
}
