//! The `OpenAIClient` struct implements `ClientWrapper` for any OpenAI-compatible
//! Chat Completions endpoint, capturing the assistant response and detailed token
//! usage (input vs output).
//!
//! # Example
//!
//! ```rust,no_run
//! use debatellm::clients::openai::OpenAIClient;
//! use debatellm::client_wrapper::{ClientWrapper, Message, Role};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let secret_key = std::env::var("OPEN_AI_SECRET")?;
//!     let client = OpenAIClient::new_with_model_string(&secret_key, "gpt-4.1-nano")
//!         .with_temperature(0.2);
//!
//!     let resp = client
//!         .send_message(&[
//!             Message::new(Role::System, "You are an assistant."),
//!             Message::new(Role::User, "Hello!"),
//!         ])
//!         .await?;
//!     println!("Assistant: {}", resp.content);
//!
//!     if let Some(usage) = client.get_last_usage().await {
//!         println!("Tokens used: {}", usage.total_tokens);
//!     }
//!     Ok(())
//! }
//! ```
use std::error::Error;

use async_trait::async_trait;
use openai_rust2 as openai_rust;
use tokio::sync::Mutex;

use crate::client_wrapper::{ClientWrapper, Message, Role, TokenUsage};
use crate::clients::common::{get_shared_http_client, send_and_track, to_chat_messages};

/// Client wrapper for OpenAI's Chat Completions API and compatible deployments.
///
/// The wrapper keeps the selected model, an optional sampling temperature and an internal
/// [`TokenUsage`] slot so callers can inspect how many tokens each request consumed.
pub struct OpenAIClient {
    /// Underlying SDK client pointing at the REST endpoint.
    client: openai_rust::Client,
    /// Model name that will be injected into each request.
    model: String,
    /// Sampling temperature; `None` leaves the provider default.
    temperature: Option<f32>,
    /// Storage for the token usage returned by the most recent request.
    token_usage: Mutex<Option<TokenUsage>>,
}

impl OpenAIClient {
    /// Construct a client against api.openai.com using an explicit model name.
    pub fn new_with_model_string(secret_key: &str, model_name: &str) -> Self {
        OpenAIClient {
            client: openai_rust::Client::new_with_client(
                secret_key,
                get_shared_http_client().clone(),
            ),
            model: model_name.to_string(),
            temperature: None,
            token_usage: Mutex::new(None),
        }
    }

    /// Construct a client targeting a custom OpenAI compatible base URL.
    pub fn new_with_base_url(secret_key: &str, model_name: &str, base_url: &str) -> Self {
        OpenAIClient {
            client: openai_rust::Client::new_with_client_and_base_url(
                secret_key,
                get_shared_http_client().clone(),
                base_url,
            ),
            model: model_name.to_string(),
            temperature: None,
            token_usage: Mutex::new(None),
        }
    }

    /// Set the sampling temperature sent with every request (builder pattern).
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn temperature(&self) -> Option<f32> {
        self.temperature
    }
}

#[async_trait]
impl ClientWrapper for OpenAIClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn send_message(
        &self,
        messages: &[Message],
    ) -> Result<Message, Box<dyn Error + Send + Sync>> {
        let content = send_and_track(
            &self.client,
            &self.model,
            to_chat_messages(messages),
            self.temperature,
            Some("/v1/chat/completions".to_string()),
            &self.token_usage,
        )
        .await?;

        Ok(Message::new(Role::Assistant, content))
    }

    fn usage_slot(&self) -> Option<&Mutex<Option<TokenUsage>>> {
        Some(&self.token_usage)
    }
}
