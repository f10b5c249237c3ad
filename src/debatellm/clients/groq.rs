use crate::client_wrapper::TokenUsage;
use crate::clients::openai::OpenAIClient;
use crate::{ClientWrapper, Message};
use async_trait::async_trait;
use std::error::Error;
use tokio::sync::Mutex;

/// Groq exposes an OpenAI compatible API under this prefix.
pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai";

pub struct GroqClient {
    client: OpenAIClient,
}

// Models offered to debate configurators
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Model {
    Llama31_8bInstant,    // fast, cheap default
    Llama33_70bVersatile, // stronger arguments, slower
}

pub fn model_to_string(model: Model) -> String {
    match model {
        Model::Llama31_8bInstant => "llama-3.1-8b-instant".to_string(),
        Model::Llama33_70bVersatile => "llama-3.3-70b-versatile".to_string(),
    }
}

impl GroqClient {
    pub fn new_with_model_enum(secret_key: &str, model: Model) -> Self {
        Self::new_with_model_str(secret_key, &model_to_string(model))
    }

    pub fn new_with_model_str(secret_key: &str, model_name: &str) -> Self {
        Self::new_with_base_url(secret_key, model_name, GROQ_BASE_URL)
    }

    /// Point at a Groq-compatible gateway or proxy instead of the public endpoint.
    pub fn new_with_base_url(secret_key: &str, model_name: &str, base_url: &str) -> Self {
        GroqClient {
            client: OpenAIClient::new_with_base_url(secret_key, model_name, base_url),
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.client = self.client.with_temperature(temperature);
        self
    }
}

#[async_trait]
impl ClientWrapper for GroqClient {
    fn model_name(&self) -> &str {
        self.client.model_name()
    }

    async fn send_message(
        &self,
        messages: &[Message],
    ) -> Result<Message, Box<dyn Error + Send + Sync>> {
        self.client.send_message(messages).await
    }

    fn usage_slot(&self) -> Option<&Mutex<Option<TokenUsage>>> {
        self.client.usage_slot()
    }
}
