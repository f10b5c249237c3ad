//! Inception Ending Debate
//!
//! Two Groq-backed agents argue whether the final scene of Inception is a dream or reality,
//! grounded in whatever `.txt` files sit in the corpus directory, and a judge picks a winner.
//!
//! Run with:
//! ```bash
//! export GROQ_API_KEY=your_key
//! export DEBATE_DATA_DIR=./data        # optional, defaults to ./data
//! export DEBATE_ROUNDS=3               # optional
//! cargo run --example inception_debate
//! ```

use async_trait::async_trait;
use debatellm::chat_engine::{BackendConfig, GroqBackendFactory};
use debatellm::corpus::CorpusIndex;
use debatellm::event::{DebateEvent, EventHandler};
use debatellm::{DebateConfig, DebateSession};
use std::error::Error as StdError;
use std::sync::Arc;

const PERSONA_A: &str = "You firmly believe the ending of Inception takes place inside a dream. \
You always emphasize visual inconsistencies, unresolved plot logic, and symbolic clues pointing \
toward a dream state. Your answers must stay short (2-3 sentences) and confidently argue that the \
top is irrelevant because Cobb never left the dream.";

const PERSONA_B: &str = "You insist the final scene is set in reality. You focus on emotional \
resolution, narrative logic, and details like the children aging and wearing different clothes. \
Your answers must remain short (2-3 sentences) and express certainty that Cobb truly returned to \
the real world.";

struct ProgressPrinter;

#[async_trait]
impl EventHandler for ProgressPrinter {
    async fn on_debate_event(&self, event: &DebateEvent) {
        match event {
            DebateEvent::RoundStarted { round, .. } => println!("\n--- Round {} ---", round),
            DebateEvent::ParticipantResponded {
                participant,
                response_length,
                ..
            } => println!("  {} answered ({} chars)", participant, response_length),
            DebateEvent::RoundAborted {
                participant, error, ..
            } => println!("  {} failed: {}", participant, error),
            _ => {}
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn StdError>> {
    debatellm::init_logger();

    let config = DebateConfig::from_env();
    let rounds: usize = std::env::var("DEBATE_ROUNDS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3);

    let factory = GroqBackendFactory::from_config(&config)?;
    let corpus = CorpusIndex::from_directory(&config.data_dir, config.splitter()?).await?;
    println!(
        "Indexed {} passages from {}",
        corpus.len(),
        config.data_dir.display()
    );

    let backend = BackendConfig::new(config.settings(), Arc::new(corpus));
    let mut debate = DebateSession::new(&factory, &backend, PERSONA_A, PERSONA_B)?
        .with_event_handler(Arc::new(ProgressPrinter));

    for _ in 0..rounds {
        debate.advance_round().await?;
    }
    debate.evaluate().await?;

    println!("\n{}", "=".repeat(80));
    for entry in debate.history_projection() {
        println!("{}", entry.content);
    }
    Ok(())
}
