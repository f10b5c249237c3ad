//! Debate HTTP server
//!
//! Serves the debate API on `DEBATE_ADDR` (default `127.0.0.1:7860`).
//!
//! ```bash
//! export GROQ_API_KEY=your_key
//! cargo run --example debate_server --features server
//!
//! curl -X POST localhost:7860/documents -H 'content-type: application/json' \
//!      -d '{"name":"inception.txt","text":"..."}'
//! curl -X POST localhost:7860/debate -H 'content-type: application/json' \
//!      -d '{"persona_a":"It is a dream.","persona_b":"It is reality."}'
//! curl -X POST localhost:7860/debate/rounds
//! curl -X POST localhost:7860/debate/verdict
//! ```

use debatellm::chat_engine::GroqBackendFactory;
use debatellm::corpus::CorpusIndex;
use debatellm::server::{serve, AppState};
use debatellm::DebateConfig;
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    debatellm::init_logger();

    let config = DebateConfig::from_env();
    let addr: SocketAddr = std::env::var("DEBATE_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:7860".to_string())
        .parse()?;

    let factory = Arc::new(GroqBackendFactory::from_config(&config)?);
    let corpus = CorpusIndex::from_directory(&config.data_dir, config.splitter()?).await?;

    serve(addr, AppState::new(config, factory, corpus)).await
}
