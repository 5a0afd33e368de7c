//! Chat-completions client for reply generation.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;
use ureq::Agent;

use crate::assistant::{Responder, RespondRequest};
use crate::error::ChatError;
use crate::prompt::{PERSONA_TEMPLATE, render_prompt};

/// Configuration for [`ChatModel`].
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Base URL of an OpenAI-compatible API, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    /// Bearer token, sent only when non-empty.
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Name the assistant introduces itself with in the system prompt.
    pub persona: String,
    /// System prompt template; see [`PERSONA_TEMPLATE`].
    pub prompt_template: String,
    pub timeout_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 60,
            persona: "Earshot".to_string(),
            prompt_template: PERSONA_TEMPLATE.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Chat-completions request body.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

/// Chat-completions response.
#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    content: String,
}

/// Responder backed by an OpenAI-compatible chat-completions endpoint.
///
/// The persona template becomes the system message and the heard text
/// the user message.
pub struct ChatModel {
    cfg: ChatConfig,
    agent: Agent,
}

impl ChatModel {
    pub fn new(cfg: ChatConfig) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(cfg.timeout_secs)))
            .build();
        Self {
            cfg,
            agent: config.into(),
        }
    }
}

impl Responder for ChatModel {
    fn respond(&self, req: &RespondRequest<'_>) -> Result<String, ChatError> {
        let system = render_prompt(&self.cfg.prompt_template, &self.cfg.persona, req)?;
        let body = ChatRequest {
            model: &self.cfg.model,
            messages: vec![
                Message {
                    role: "system",
                    content: &system,
                },
                Message {
                    role: "user",
                    content: req.heard,
                },
            ],
            temperature: self.cfg.temperature,
            max_tokens: self.cfg.max_tokens,
        };

        let url = format!(
            "{}/chat/completions",
            self.cfg.base_url.trim_end_matches('/')
        );
        debug!("chat request to {url} for {}", req.user_id);

        let mut builder = self.agent.post(&url);
        let auth = format!("Bearer {}", self.cfg.api_key);
        if !self.cfg.api_key.is_empty() {
            builder = builder.header("Authorization", auth.as_str());
        }

        let mut res = builder
            .send_json(&body)
            .map_err(|e| ChatError::Http(e.to_string()))?;
        let completion: ChatCompletion = res
            .body_mut()
            .read_json()
            .map_err(|e| ChatError::BadResponse(e.to_string()))?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ChatError::BadResponse("no choices".to_string()))?;
        Ok(choice.message.content.trim().to_string())
    }
}
