// src/debatellm/mod.rs

pub mod chat_engine;
pub mod client_wrapper;
pub mod clients;
pub mod config;
pub mod corpus;
pub mod debate;
pub mod error;
pub mod event;
pub mod llm_session;
pub mod projection;
pub mod responder;
pub mod retrieval;
#[cfg(feature = "server")]
pub mod server;
pub mod transcript;

// Export the session types at this level so callers don't need the full module path.
pub use debate::DebateSession;
pub use llm_session::LLMSession;
pub use responder::Responder;
