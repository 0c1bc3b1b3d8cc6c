use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

pub const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";
pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
pub const TAVILY_API_BASE: &str = "https://api.tavily.com";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    MissingVar(&'static str),

    #[error("invalid value {value:?} for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub llm: LLMConfig,
    pub search: SearchConfig,
    pub retry: RetryConfig,
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMConfig {
    pub provider: String,
    #[serde(skip_serializing)]
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub api_base: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(skip_serializing)]
    pub tavily_api_key: String,
    pub search_depth: String,
    pub api_base: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
}

impl Config {
    /// Load configuration from the process environment (and `.env`, if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let provider = var("LLM_PROVIDER")
            .map(|p| p.trim().to_lowercase())
            .unwrap_or_else(|| "groq".to_string());

        let (key_var, default_model, default_base) = match provider.as_str() {
            "groq" => ("GROQ_API_KEY", "gemma2-9b-it", GROQ_API_BASE),
            "openai" => ("OPENAI_API_KEY", "gpt-4o-mini", OPENAI_API_BASE),
            _ => {
                return Err(ConfigError::Invalid {
                    var: "LLM_PROVIDER",
                    value: provider.clone(),
                    reason: "expected \"groq\" or \"openai\"".to_string(),
                })
            }
        };

        let llm = LLMConfig {
            api_key: var(key_var).ok_or(ConfigError::MissingVar(key_var))?,
            model: var("LLM_MODEL").unwrap_or_else(|| default_model.to_string()),
            temperature: parse_or(&var, "LLM_TEMPERATURE", 0.0)?,
            max_tokens: parse_or(&var, "LLM_MAX_TOKENS", 1024)?,
            api_base: var("LLM_API_BASE").unwrap_or_else(|| default_base.to_string()),
            provider,
        };

        let search_depth = var("TAVILY_SEARCH_DEPTH").unwrap_or_else(|| "basic".to_string());
        if search_depth != "basic" && search_depth != "advanced" {
            return Err(ConfigError::Invalid {
                var: "TAVILY_SEARCH_DEPTH",
                value: search_depth,
                reason: "expected \"basic\" or \"advanced\"".to_string(),
            });
        }

        let search = SearchConfig {
            tavily_api_key: var("TAVILY_API_KEY").ok_or(ConfigError::MissingVar("TAVILY_API_KEY"))?,
            search_depth,
            api_base: var("TAVILY_API_BASE").unwrap_or_else(|| TAVILY_API_BASE.to_string()),
        };

        let retry = RetryConfig {
            max_attempts: parse_or(&var, "RETRY_MAX_ATTEMPTS", 3)?,
            base_delay_ms: parse_or(&var, "RETRY_BASE_DELAY_MS", 500)?,
        };
        if retry.max_attempts == 0 {
            return Err(ConfigError::Invalid {
                var: "RETRY_MAX_ATTEMPTS",
                value: "0".to_string(),
                reason: "at least one attempt is required".to_string(),
            });
        }

        Ok(Self {
            llm,
            search,
            retry,
            log_dir: var("LOG_DIR").map(PathBuf::from),
        })
    }
}

fn parse_or<T, F>(var: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => Ok(value),
            Err(e) => Err(ConfigError::Invalid {
                var: key,
                reason: e.to_string(),
                value: raw,
            }),
        },
        None => Ok(default),
    }
}
