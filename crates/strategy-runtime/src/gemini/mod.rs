//! Gemini LLM Provider
//!
//! Implementation of `LlmProvider` for Google's Generative Language REST API.

mod types;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use strategy_core::{
    error::{GenerationError, Result},
    message::{system_text, Message, Role},
    provider::{
        Completion, FinishReason, GenerationOptions, LlmProvider, ModelInfo, TokenUsage,
    },
};
use tracing::{debug, warn};

use types::{
    GeminiContent, GeminiGenerationConfig, GeminiModelList, GeminiPart, GeminiRequest,
    GeminiResponse, GeminiSystemInstruction,
};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Gemini provider configuration
#[derive(Clone, Debug)]
pub struct GeminiConfig {
    pub api_key: String,

    /// Model used when the request does not name one
    pub model: String,

    /// API root, without trailing slash
    pub base_url: String,

    /// Whole-request timeout in seconds
    pub timeout_secs: u64,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.into(),
            base_url: DEFAULT_BASE_URL.into(),
            timeout_secs: 120,
        }
    }

    /// Reads `GEMINI_API_KEY`, `GEMINI_MODEL`, `GEMINI_BASE_URL` and `LLM_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| GenerationError::Config("GEMINI_API_KEY is not set".into()))?;

        let mut config = Self::new(api_key);
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            config.model = model;
        }
        if let Ok(base_url) = std::env::var("GEMINI_BASE_URL") {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(secs) = std::env::var("LLM_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.timeout_secs = secs;
        }
        Ok(config)
    }
}

/// Gemini LLM provider
pub struct GeminiProvider {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    pub fn from_config(config: GeminiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GenerationError::Config(format!("HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self> {
        Self::from_config(GeminiConfig::from_env()?)
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn model_for<'a>(&'a self, options: &'a GenerationOptions) -> &'a str {
        if options.model.trim().is_empty() {
            &self.config.model
        } else {
            &options.model
        }
    }

    /// System messages become `systemInstruction`; the rest become contents
    fn build_request(messages: &[Message], options: &GenerationOptions) -> GeminiRequest {
        let contents = messages
            .iter()
            .filter(|m| m.role != Role::System)
            .map(|m| GeminiContent {
                parts: vec![GeminiPart {
                    text: m.content.clone(),
                }],
                role: if m.role == Role::Assistant { "model" } else { "user" },
            })
            .collect();

        GeminiRequest {
            contents,
            system_instruction: system_text(messages).map(|text| GeminiSystemInstruction {
                parts: vec![GeminiPart { text }],
            }),
            generation_config: Some(GeminiGenerationConfig {
                max_output_tokens: options.max_tokens,
                temperature: options.temperature,
                top_p: options.top_p,
            }),
        }
    }

    fn parse_completion(body: &str, model: &str) -> Result<Completion> {
        let response: GeminiResponse = serde_json::from_str(body)
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or(GenerationError::EmptyResponse)?;

        let content: String = candidate
            .content
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();
        if content.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }

        Ok(Completion {
            content,
            model: model.to_string(),
            usage: response.usage_metadata.map(|u| TokenUsage {
                prompt_tokens: u.prompt_token_count,
                completion_tokens: u.candidates_token_count,
                total_tokens: u
                    .total_token_count
                    .unwrap_or(u.prompt_token_count + u.candidates_token_count),
            }),
            finish_reason: candidate.finish_reason.as_deref().map(FinishReason::parse),
        })
    }

    async fn read_body(response: reqwest::Response) -> Result<String> {
        let status = response.status();
        let body = response.text().await.map_err(transport)?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(status_error(status, body))
        }
    }
}

fn transport(err: reqwest::Error) -> GenerationError {
    if err.is_decode() {
        GenerationError::InvalidResponse(err.to_string())
    } else {
        GenerationError::Transport(err.to_string())
    }
}

fn status_error(status: StatusCode, body: String) -> GenerationError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GenerationError::Auth(body),
        StatusCode::TOO_MANY_REQUESTS => GenerationError::RateLimited(body),
        StatusCode::SERVICE_UNAVAILABLE => GenerationError::ProviderUnavailable(body),
        _ => GenerationError::Status {
            status: status.as_u16(),
            body,
        },
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "Gemini"
    }

    async fn health_check(&self) -> Result<bool> {
        match self.list_models().await {
            Ok(_) => Ok(true),
            Err(e) => {
                warn!("Gemini health check failed: {}", e);
                Ok(false)
            }
        }
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let model = self.model_for(options);
        let url = format!("{}/models/{}:generateContent", self.config.base_url, model);
        let request = Self::build_request(messages, options);
        debug!(model, messages = request.contents.len(), "Sending Gemini request");

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(transport)?;

        let body = Self::read_body(response).await?;
        Self::parse_completion(&body, model)
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let response = self
            .client
            .get(format!("{}/models", self.config.base_url))
            .header("x-goog-api-key", &self.config.api_key)
            .send()
            .await
            .map_err(transport)?;

        let body = Self::read_body(response).await?;
        let list: GeminiModelList = serde_json::from_str(&body)?;

        Ok(list
            .models
            .into_iter()
            .map(|m| {
                let id = m.name.trim_start_matches("models/").to_string();
                ModelInfo {
                    name: m.display_name.unwrap_or_else(|| id.clone()),
                    id,
                    context_length: m.input_token_limit,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = GeminiConfig::new("key");
        assert_eq!(config.model, "gemini-1.5-flash");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 120);
    }

    #[test]
    fn test_request_wire_format() {
        let messages = vec![
            Message::system("You are a strategist."),
            Message::user("Build a SOL breakout strategy"),
            Message::assistant("Sure"),
        ];
        let request = GeminiProvider::build_request(&messages, &GenerationOptions::default());
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["contents"].as_array().unwrap().len(), 2);
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][1]["role"], "model");
        assert_eq!(
            json["systemInstruction"]["parts"][0]["text"],
            "You are a strategist."
        );
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 4096);
    }

    #[test]
    fn test_parse_completion() {
        let body = r###"{
            "candidates": [{
                "content": {"parts": [{"text": "## Strategy"}, {"text": " body"}], "role": "model"},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 5, "totalTokenCount": 15}
        }"###;
        let completion = GeminiProvider::parse_completion(body, "gemini-1.5-flash").unwrap();
        assert_eq!(completion.content, "## Strategy body");
        assert_eq!(completion.usage.unwrap().total_tokens, 15);
        assert_eq!(completion.finish_reason, Some(FinishReason::Stop));
    }

    #[test]
    fn test_empty_and_invalid_bodies() {
        assert!(matches!(
            GeminiProvider::parse_completion(r#"{"candidates": []}"#, "m"),
            Err(GenerationError::EmptyResponse)
        ));
        assert!(matches!(
            GeminiProvider::parse_completion(
                r#"{"candidates": [{"finishReason": "SAFETY"}]}"#,
                "m"
            ),
            Err(GenerationError::EmptyResponse)
        ));
        assert!(matches!(
            GeminiProvider::parse_completion("<html>", "m"),
            Err(GenerationError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, String::new()),
            GenerationError::Auth(_)
        ));
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS, String::new()),
            GenerationError::RateLimited(_)
        ));
        let err = status_error(StatusCode::BAD_GATEWAY, "upstream".into());
        assert!(matches!(err, GenerationError::Status { status: 502, .. }));
        assert!(err.is_retryable());
        assert!(!status_error(StatusCode::BAD_REQUEST, String::new()).is_retryable());
    }
}
