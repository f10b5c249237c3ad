//! Debate event system.
//!
//! Implement [`EventHandler`] and attach it with
//! [`DebateSession::with_event_handler`](crate::DebateSession::with_event_handler) to observe a
//! debate as it runs: round boundaries, each participant's reply, aborted rounds and verdicts.
//! The single method has a default no-op implementation.
//!
//! # Event Flow (one `advance_round()` call)
//!
//! ```text
//! RoundStarted
//!   └─ ParticipantResponded { participant: "Bot A" }
//!   └─ ParticipantResponded { participant: "Bot B" }
//! RoundCompleted
//! ```
//!
//! If either participant fails, `RoundAborted` replaces the remaining events and no round is
//! recorded.
//!
//! # Example
//!
//! ```rust
//! use debatellm::event::{DebateEvent, EventHandler};
//! use async_trait::async_trait;
//!
//! struct Printer;
//!
//! #[async_trait]
//! impl EventHandler for Printer {
//!     async fn on_debate_event(&self, event: &DebateEvent) {
//!         if let DebateEvent::VerdictDelivered { rounds_judged, .. } = event {
//!             println!("verdict after {} rounds", rounds_judged);
//!         }
//!     }
//! }
//! ```

use async_trait::async_trait;

/// Events emitted by a [`DebateSession`](crate::DebateSession).
///
/// Every variant carries the session id so one handler can serve several debates.
#[derive(Debug, Clone, PartialEq)]
pub enum DebateEvent {
    /// A round is about to be played.
    RoundStarted {
        session_id: String,
        /// 1-based index the round will get if it completes.
        round: usize,
    },

    /// A participant answered within a round.
    ParticipantResponded {
        session_id: String,
        round: usize,
        /// Display name, e.g. `"Bot A"`.
        participant: String,
        response_length: usize,
    },

    /// Both participants answered and the round was recorded.
    RoundCompleted { session_id: String, round: usize },

    /// A participant failed; nothing was recorded for this round.
    RoundAborted {
        session_id: String,
        round: usize,
        participant: String,
        error: String,
    },

    /// The judge delivered a verdict.
    VerdictDelivered {
        session_id: String,
        rounds_judged: usize,
        response_length: usize,
    },
}

/// Callback trait for debate observability.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn on_debate_event(&self, _event: &DebateEvent) {}
}
