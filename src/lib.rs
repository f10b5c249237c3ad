//! # debatellm
//!
//! debatellm runs a two-agent debate: two persona-scripted LLM participants argue opposing
//! positions over as many rounds as the caller asks for, each grounded in passages retrieved
//! from a document corpus, and a third "judge" participant evaluates the transcript.
//!
//! The crate is layered the same way from the wire up:
//!
//! * **Providers**: [`ClientWrapper`] implementations for Groq and any OpenAI-compatible endpoint
//!   (see [`clients`]).
//! * **Memory**: [`LLMSession`] keeps each participant's rolling conversation and token usage.
//! * **Grounding**: [`corpus::CorpusIndex`] implements [`retrieval::Retriever`];
//!   [`chat_engine::GroundedChatEngine`] injects the retrieved passages before every call.
//! * **Participants**: [`Responder`] binds one persona to one backend and logs its turns.
//! * **Orchestration**: [`DebateSession`] threads each participant's latest reply into the other's
//!   next prompt, records rounds, and asks the judge for a verdict.
//! * **Presentation**: [`projection`] flattens the history for display; the `server` feature
//!   adds an axum HTTP front end.
//!
//! ## Getting Started
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use debatellm::chat_engine::{BackendConfig, GroqBackendFactory};
//! use debatellm::retrieval::NoRetrieval;
//! use debatellm::{DebateConfig, DebateSession};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     debatellm::init_logger();
//!
//!     let config = DebateConfig::from_env();
//!     let factory = GroqBackendFactory::from_config(&config)?;
//!     let backend = BackendConfig::new(config.settings(), Arc::new(NoRetrieval));
//!
//!     let mut debate = DebateSession::new(
//!         &factory,
//!         &backend,
//!         "Argue that tabs are better than spaces.",
//!         "Argue that spaces are better than tabs.",
//!     )?;
//!
//!     let round = debate.advance_round().await?;
//!     println!("{:?}", round);
//!     println!("Verdict: {}", debate.evaluate().await?);
//!     Ok(())
//! }
//! ```

use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Initialise the global [`env_logger`] subscriber exactly once.
///
/// Applications embedding debatellm can opt in to simple `RUST_LOG` driven diagnostics
/// without choosing a logging backend upfront.
///
/// ```rust
/// debatellm::init_logger();
/// log::info!("Logger is ready");
/// ```
pub fn init_logger() {
    INIT_LOGGER.call_once(|| {
        env_logger::init();
    });
}

// Import the top-level `debatellm` module.
pub mod debatellm;

// Re-exporting key items for easier external access.
pub use debatellm::chat_engine;
pub use debatellm::client_wrapper;
pub use debatellm::client_wrapper::{ClientWrapper, Message, Role, TokenUsage};
pub use debatellm::clients;
pub use debatellm::config;
pub use debatellm::config::{DebateConfig, DebateSettings};
pub use debatellm::corpus;
pub use debatellm::debate;
pub use debatellm::debate::{DebateSession, RoundRecord};
pub use debatellm::error;
pub use debatellm::error::{BoxError, DebateError};
pub use debatellm::event;
pub use debatellm::event::{DebateEvent, EventHandler};
pub use debatellm::llm_session;
pub use debatellm::llm_session::LLMSession;
pub use debatellm::projection;
pub use debatellm::projection::{ChatEntry, ProjectionRole};
pub use debatellm::responder;
pub use debatellm::responder::{Responder, Turn};
pub use debatellm::retrieval;
#[cfg(feature = "server")]
pub use debatellm::server;
pub use debatellm::transcript;
