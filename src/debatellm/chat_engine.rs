//! Grounded conversational backends.
//!
//! A [`ChatBackend`] is the stateful collaborator each [`Responder`](crate::Responder) owns: it
//! remembers earlier turns of its own conversation and answers one message at a time.
//! [`GroundedChatEngine`] is the production implementation. Before every call it retrieves the
//! passages most relevant to the incoming message, rebuilds its system prompt from the persona
//! plus that context, and sends the message through an [`LLMSession`] that keeps the memory.
//!
//! Backends are created through a [`BackendFactory`] so a debate can be rebuilt with new
//! personas or model parameters without the session knowing which provider is behind it.

use crate::clients::groq::GroqClient;
use crate::config::{DebateConfig, DebateSettings};
use crate::error::{BoxError, DebateError};
use crate::llm_session::LLMSession;
use crate::retrieval::{ContextChunk, Retriever};
use crate::Role;
use async_trait::async_trait;
use std::sync::Arc;

/// A stateful conversation partner: every call is conditioned on the calls before it.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn chat(&mut self, message: &str) -> Result<String, BoxError>;
}

/// Everything needed to build the backends of one debate.
#[derive(Clone)]
pub struct BackendConfig {
    pub settings: DebateSettings,
    /// Corpus passages are drawn from here; share one retriever across participants.
    pub retriever: Arc<dyn Retriever>,
}

impl BackendConfig {
    pub fn new(settings: DebateSettings, retriever: Arc<dyn Retriever>) -> Self {
        Self {
            settings,
            retriever,
        }
    }
}

/// Builds a backend bound to a persona.
pub trait BackendFactory: Send + Sync {
    fn create_backend(
        &self,
        persona: &str,
        config: &BackendConfig,
    ) -> Result<Box<dyn ChatBackend>, DebateError>;
}

/// Prefix every debate participant starts from.
pub fn debate_prefix(persona: &str) -> String {
    format!(
        "You are about to engage in a debate.\n\
         Persona and instructions:\n{}\n\
         Provide concise and accurate answers based on the context.",
        persona.trim()
    )
}

/// Persona prefix followed by the retrieved passages, if any.
pub fn compose_system_prompt(persona: &str, context: &[ContextChunk]) -> String {
    let mut prompt = debate_prefix(persona);
    if !context.is_empty() {
        prompt.push_str("\n\nContext information is below.\n--------------------\n");
        for chunk in context {
            prompt.push_str(&format!("[{}] {}\n", chunk.source, chunk.text));
        }
        prompt.push_str("--------------------");
    }
    prompt
}

/// [`ChatBackend`] that grounds each reply in retrieved corpus passages.
pub struct GroundedChatEngine {
    session: LLMSession,
    persona: String,
    retriever: Arc<dyn Retriever>,
    similarity_top_k: usize,
}

impl GroundedChatEngine {
    pub fn new(
        session: LLMSession,
        persona: impl Into<String>,
        retriever: Arc<dyn Retriever>,
        similarity_top_k: usize,
    ) -> Self {
        let persona = persona.into();
        let mut session = session;
        session.set_system_prompt(debate_prefix(&persona));
        Self {
            session,
            persona,
            retriever,
            similarity_top_k,
        }
    }

    pub fn session(&self) -> &LLMSession {
        &self.session
    }
}

#[async_trait]
impl ChatBackend for GroundedChatEngine {
    async fn chat(&mut self, message: &str) -> Result<String, BoxError> {
        let context = self
            .retriever
            .retrieve(message, self.similarity_top_k)
            .await?;
        log::debug!(
            "GroundedChatEngine retrieved {} passages for a {} char message",
            context.len(),
            message.len()
        );

        self.session
            .set_system_prompt(compose_system_prompt(&self.persona, &context));
        let reply = self
            .session
            .send_message(Role::User, message.to_string())
            .await?;
        Ok(reply.content.to_string())
    }
}

/// Builds Groq backed [`GroundedChatEngine`]s.
pub struct GroqBackendFactory {
    api_key: String,
    base_url: String,
}

impl GroqBackendFactory {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self, DebateError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(DebateError::Configuration("GROQ_API_KEY is not set".into()));
        }
        Ok(Self {
            api_key,
            base_url: base_url.into(),
        })
    }

    /// Fails with a configuration error when the API key is absent.
    pub fn from_config(config: &DebateConfig) -> Result<Self, DebateError> {
        Self::new(config.require_api_key()?, config.base_url.clone())
    }
}

impl BackendFactory for GroqBackendFactory {
    fn create_backend(
        &self,
        persona: &str,
        config: &BackendConfig,
    ) -> Result<Box<dyn ChatBackend>, DebateError> {
        config.settings.validate()?;

        let client = GroqClient::new_with_base_url(
            &self.api_key,
            &config.settings.model,
            &self.base_url,
        )
        .with_temperature(config.settings.temperature);
        let session = LLMSession::new(Arc::new(client), String::new(), config.settings.max_tokens);

        Ok(Box::new(GroundedChatEngine::new(
            session,
            persona,
            config.retriever.clone(),
            config.settings.similarity_top_k,
        )))
    }
}
