use async_trait::async_trait;
use crate::config::LLMConfig;
use crate::types::{AppError, AppResult, LLMMessage, LLMRequest, LLMResponse};
use tracing::debug;

#[async_trait]
pub trait LLMAdapter: Send + Sync {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse>;
}

/// A completion client with the model and sampling settings fixed at construction.
pub struct LLM {
    adapter: Box<dyn LLMAdapter>,
    provider_name: String,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl LLM {
    pub fn new(config: &LLMConfig) -> AppResult<Self> {
        let adapter: Box<dyn LLMAdapter> = match config.provider.as_str() {
            "groq" => Box::new(crate::llm::groq::GroqAdapter::new_with_api_base(
                &config.api_key,
                &config.api_base,
            )),
            "openai" => Box::new(crate::llm::openai::OpenAIAdapter::new_with_api_base(
                &config.api_key,
                &config.api_base,
            )),
            other => {
                return Err(AppError::InvalidRequest(format!(
                    "Unsupported provider: {}",
                    other
                )))
            }
        };

        Ok(Self {
            adapter,
            provider_name: config.provider.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: Some(config.max_tokens),
        })
    }

    /// Wrap an arbitrary adapter, e.g. a scripted one in tests.
    pub fn with_adapter(adapter: Box<dyn LLMAdapter>, model: impl Into<String>) -> Self {
        Self {
            adapter,
            provider_name: "custom".to_string(),
            model: model.into(),
            temperature: 0.0,
            max_tokens: None,
        }
    }

    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        self.adapter.create_chat_completion(request).await
    }

    /// Send a single user prompt and return the completion text.
    ///
    /// A blank completion is reported as an error so callers can retry it.
    pub async fn complete(&self, prompt: &str) -> AppResult<String> {
        let request = LLMRequest {
            model: self.model.clone(),
            messages: vec![LLMMessage::user(prompt)],
            max_tokens: self.max_tokens,
            temperature: Some(self.temperature),
            system_instruction: None,
        };

        let response = self.create_chat_completion(&request).await?;
        debug!(
            provider = %self.provider_name,
            finish_reason = %response.finish_reason,
            total_tokens = response.usage.total_tokens,
            "Completion received"
        );

        let content = response.content.trim();
        if content.is_empty() {
            return Err(AppError::LLMApi("Completion was empty".to_string()));
        }
        Ok(content.to_string())
    }
}
