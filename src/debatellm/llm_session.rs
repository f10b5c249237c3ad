//! The `llm_session` module keeps the rolling conversation a participant has with its LLM:
//! message history, context pruning and token accounting.
//!
//! **Key features:**
//! - **Memory**: every successful exchange is appended, so later calls see earlier turns.
//! - **Automatic context trimming**: oldest messages are dropped once usage exceeds `max_tokens`.
//! - **Failure safety**: a failed call leaves the history exactly as it was.
//!
//! ## Quickstart
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use debatellm::client_wrapper::Role;
//! use debatellm::clients::groq::{GroqClient, Model};
//! use debatellm::LLMSession;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let client = GroqClient::new_with_model_enum("YOUR_GROQ_KEY", Model::Llama31_8bInstant);
//! let mut session = LLMSession::new(Arc::new(client), "You are a film critic.".into(), 8_192);
//!
//! let reply = session.send_message(Role::User, "Is Inception's ending a dream?".into()).await?;
//! println!("Assistant: {}", reply.content);
//! println!("Total tokens: {}", session.token_usage().total_tokens);
//! # Ok(())
//! # }
//! ```

use crate::client_wrapper::{ClientWrapper, Message, Role, TokenUsage};
use std::error::Error;
use std::sync::Arc;

/// A conversation session with an LLM, including:
///
/// - `client`: your `ClientWrapper` (e.g. `GroqClient`).
/// - `system_prompt`: the context-steering system message.
/// - `conversation_history`: all user & assistant messages (excluding system prompt).
/// - `max_tokens`: your configured context window size.
/// - `total_input_tokens` / `total_output_tokens` / `total_token_count`: usage of the last call.
pub struct LLMSession {
    client: Arc<dyn ClientWrapper>,
    system_prompt: Message,
    conversation_history: Vec<Message>,
    max_tokens: usize,
    total_input_tokens: usize,
    total_output_tokens: usize,
    total_token_count: usize,
}

impl LLMSession {
    /// Creates a new `LLMSession` with the given client and system prompt.
    pub fn new(client: Arc<dyn ClientWrapper>, system_prompt: String, max_tokens: usize) -> Self {
        LLMSession {
            client,
            system_prompt: Message::new(Role::System, system_prompt),
            conversation_history: Vec::new(),
            max_tokens,
            total_input_tokens: 0,
            total_output_tokens: 0,
            total_token_count: 0,
        }
    }

    /// Sends a message and receives the assistant’s reply:
    /// 1. Builds system prompt + history + new message
    /// 2. Calls into your client’s `send_message(...)`
    /// 3. On success, commits the message and the reply to history
    /// 4. Pulls real token usage via `client.get_last_usage()` (estimates when absent)
    /// 5. Prunes oldest messages while usage exceeds `max_tokens`
    pub async fn send_message(
        &mut self,
        role: Role,
        content: String,
    ) -> Result<Message, Box<dyn Error + Send + Sync>> {
        let message = Message::new(role, content);

        let mut request = Vec::with_capacity(self.conversation_history.len() + 2);
        request.push(self.system_prompt.clone());
        request.extend(self.conversation_history.iter().cloned());
        request.push(message.clone());

        let response = self.client.send_message(&request).await?;

        self.conversation_history.push(message);
        self.conversation_history.push(response.clone());

        let usage = match self.client.get_last_usage().await {
            Some(usage) => usage,
            None => {
                let input_tokens = request.iter().map(estimate_message_token_count).sum();
                let output_tokens = estimate_message_token_count(&response);
                TokenUsage {
                    input_tokens,
                    output_tokens,
                    total_tokens: input_tokens + output_tokens,
                }
            }
        };
        self.total_input_tokens = usage.input_tokens;
        self.total_output_tokens = usage.output_tokens;
        self.total_token_count = usage.total_tokens;

        if self.total_token_count > self.max_tokens {
            // How many tokens we're over by
            let mut excess = self.total_token_count - self.max_tokens;

            // Keep at least the exchange that just happened
            while excess > 0 && self.conversation_history.len() > 2 {
                let msg = self.conversation_history.remove(0);
                excess = excess.saturating_sub(estimate_message_token_count(&msg));
            }
            log::debug!(
                "LLMSession trimmed history to {} messages ({} tokens over budget of {})",
                self.conversation_history.len(),
                self.total_token_count - self.max_tokens,
                self.max_tokens
            );
        }

        Ok(response)
    }

    /// Replaces the system prompt used for subsequent calls. History is kept.
    pub fn set_system_prompt(&mut self, prompt: String) {
        self.system_prompt = Message::new(Role::System, prompt);
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt.content
    }

    pub fn conversation_history(&self) -> &[Message] {
        &self.conversation_history
    }

    /// Returns the token usage of the most recent call.
    pub fn token_usage(&self) -> TokenUsage {
        TokenUsage {
            input_tokens: self.total_input_tokens,
            output_tokens: self.total_output_tokens,
            total_tokens: self.total_token_count,
        }
    }

    pub fn get_max_tokens(&self) -> usize {
        self.max_tokens
    }

    pub fn client(&self) -> &Arc<dyn ClientWrapper> {
        &self.client
    }
}

/// Estimates the number of tokens in a string.
/// Uses an approximate formula: one token per 4 characters.
pub fn estimate_token_count(text: &str) -> usize {
    (text.len() / 4).max(1)
}

/// Estimates the number of tokens in a Message, including one token for the role.
pub fn estimate_message_token_count(message: &Message) -> usize {
    1 + estimate_token_count(&message.content)
}
