//! LLM provider abstraction and implementations.
//!
//! Supports Anthropic Claude and `OpenAI` via a common trait. Every feature
//! in this crate needs a single prompt/response exchange, so the trait is a
//! plain text completion.

pub mod anthropic;
pub mod openai;

use crate::AiError;

/// Default `OpenAI` model.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Default Anthropic model.
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-20250514";

/// A single-turn completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Instructions establishing the model's role.
    pub system_prompt: String,
    /// The user prompt.
    pub prompt: String,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

/// Trait for LLM providers.
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    /// Sends a completion request and returns the generated text.
    ///
    /// # Errors
    ///
    /// Returns [`AiError`] if the request fails or the provider reports an
    /// error.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, AiError>;

    /// Short provider name for logging.
    fn name(&self) -> &'static str;
}

/// Creates an LLM provider based on environment variables.
///
/// If `AI_PROVIDER` is explicitly set, uses that provider. Otherwise
/// auto-detects from available credentials:
///
/// 1. `OPENAI_API_KEY` set -> `OpenAI`
/// 2. `ANTHROPIC_API_KEY` set -> Anthropic Claude
///
/// `AI_MODEL` overrides the provider's default model.
///
/// # Errors
///
/// Returns [`AiError::Config`] if no credentials are found or the
/// explicitly requested provider is not configured.
pub fn create_provider_from_env() -> Result<Box<dyn LlmProvider>, AiError> {
    let provider = match std::env::var("AI_PROVIDER") {
        Ok(provider) => provider,
        Err(_) => detect_provider().ok_or_else(|| AiError::Config {
            message: "No AI credentials found. Set OPENAI_API_KEY or ANTHROPIC_API_KEY"
                .to_string(),
        })?,
    };

    match provider.to_lowercase().as_str() {
        "openai" | "gpt" => {
            let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| AiError::Config {
                message: "OPENAI_API_KEY environment variable not set".to_string(),
            })?;
            let model =
                std::env::var("AI_MODEL").unwrap_or_else(|_| DEFAULT_OPENAI_MODEL.to_string());
            Ok(Box::new(openai::OpenAiProvider::new(api_key, model)))
        }
        "anthropic" | "claude" => {
            let api_key = std::env::var("ANTHROPIC_API_KEY").map_err(|_| AiError::Config {
                message: "ANTHROPIC_API_KEY environment variable not set".to_string(),
            })?;
            let model =
                std::env::var("AI_MODEL").unwrap_or_else(|_| DEFAULT_ANTHROPIC_MODEL.to_string());
            Ok(Box::new(anthropic::AnthropicProvider::new(api_key, model)))
        }
        other => Err(AiError::Config {
            message: format!("Unknown AI provider: {other}. Use 'openai' or 'anthropic'."),
        }),
    }
}

/// Auto-detects which provider to use based on available credentials.
///
/// Returns a provider name that matches the arms in
/// [`create_provider_from_env`], or `None` when no key is set.
fn detect_provider() -> Option<String> {
    if std::env::var("OPENAI_API_KEY").is_ok() {
        log::info!("Auto-detected AI provider: OpenAI (OPENAI_API_KEY found)");
        return Some("openai".to_string());
    }

    if std::env::var("ANTHROPIC_API_KEY").is_ok() {
        log::info!("Auto-detected AI provider: Anthropic (ANTHROPIC_API_KEY found)");
        return Some("anthropic".to_string());
    }

    None
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::{CompletionRequest, LlmProvider};
    use crate::AiError;

    /// Provider that replays a canned response and records prompts.
    pub struct ScriptedProvider {
        response: Option<String>,
        pub prompts: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedProvider {
        pub fn replying(text: &str) -> Self {
            Self {
                response: Some(text.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn failing() -> Self {
            Self {
                response: None,
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn complete(&self, request: &CompletionRequest) -> Result<String, AiError> {
            self.prompts.lock().unwrap().push(request.clone());
            self.response.clone().ok_or_else(|| AiError::Provider {
                message: "scripted failure".to_string(),
            })
        }

        fn name(&self) -> &'static str {
            "scripted"
        }
    }
}
