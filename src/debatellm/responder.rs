//! Persona-bound debate participants.
//!
//! A [`Responder`] pairs an immutable persona with the [`ChatBackend`] it owns exclusively and
//! keeps an append-only log of its own turns.

use crate::chat_engine::{BackendConfig, BackendFactory, ChatBackend};
use crate::error::DebateError;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One completed exchange of a responder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Turn {
    /// The message the responder was asked to answer.
    pub input: String,
    /// The reply its backend produced.
    pub output: String,
    /// UTC time the reply was recorded.
    pub timestamp: DateTime<Utc>,
}

/// A persona-bound conversational participant with its own turn history.
///
/// `respond` is not idempotent: the backend remembers every previous call, so asking the same
/// question twice yields an answer conditioned on a longer conversation the second time.
pub struct Responder {
    name: String,
    persona: String,
    turns: Vec<Turn>,
    backend: Box<dyn ChatBackend>,
}

impl Responder {
    pub fn new(
        name: impl Into<String>,
        persona: impl Into<String>,
        backend: Box<dyn ChatBackend>,
    ) -> Self {
        Self {
            name: name.into(),
            persona: persona.into(),
            turns: Vec::new(),
            backend,
        }
    }

    /// Build the backend through `factory`; configuration problems surface here.
    pub fn from_factory(
        name: impl Into<String>,
        persona: impl Into<String>,
        factory: &dyn BackendFactory,
        config: &BackendConfig,
    ) -> Result<Self, DebateError> {
        let persona = persona.into();
        let backend = factory.create_backend(&persona, config)?;
        Ok(Self::new(name, persona, backend))
    }

    /// Send `message` to the backend and record the exchange.
    ///
    /// Backend failures propagate untouched (wrapped with this responder's name) and record
    /// nothing.
    pub async fn respond(&mut self, message: &str) -> Result<String, DebateError> {
        let reply = self
            .backend
            .chat(message)
            .await
            .map_err(|source| DebateError::Backend {
                participant: self.name.clone(),
                source,
            })?;

        log::debug!(
            "{} answered turn {} ({} chars)",
            self.name,
            self.turns.len() + 1,
            reply.len()
        );
        self.turns.push(Turn {
            input: message.to_string(),
            output: reply.clone(),
            timestamp: Utc::now(),
        });
        Ok(reply)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    /// All turns in the order they happened.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Output of the most recent turn, if any.
    pub fn last_output(&self) -> Option<&str> {
        self.turns.last().map(|turn| turn.output.as_str())
    }
}
