//! Round orchestration for a two-agent debate with a judge.
//!
//! A [`DebateSession`] owns three [`Responder`]s: Bot A, Bot B and Judge Bot. Each call to
//! [`advance_round`](DebateSession::advance_round) plays one round:
//!
//! 1. Bot A answers the opening prompt (first round) or Bot B's latest reply.
//! 2. Bot B answers what Bot A just said.
//! 3. The round is recorded, but only once both replies exist.
//!
//! [`evaluate`](DebateSession::evaluate) hands the versioned transcript of all rounds to the
//! judge and records its verdict. The session is an explicit value: rebuilding a debate with new
//! personas or model parameters means building a new session.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use debatellm::chat_engine::{BackendConfig, GroqBackendFactory};
//! use debatellm::corpus::CorpusIndex;
//! use debatellm::{DebateConfig, DebateSession};
//!
//! # async fn run() -> Result<(), debatellm::DebateError> {
//! let config = DebateConfig::from_env();
//! let factory = GroqBackendFactory::from_config(&config)?;
//! let corpus = CorpusIndex::from_directory(&config.data_dir, config.splitter()?).await?;
//! let backend = BackendConfig::new(config.settings(), Arc::new(corpus));
//!
//! let mut debate = DebateSession::new(
//!     &factory,
//!     &backend,
//!     "You believe the ending of Inception is a dream.",
//!     "You believe the ending of Inception is real.",
//! )?;
//! debate.advance_round().await?;
//! debate.advance_round().await?;
//! let verdict = debate.evaluate().await?;
//! println!("{}", verdict);
//! # Ok(())
//! # }
//! ```

use crate::chat_engine::{BackendConfig, BackendFactory};
use crate::error::DebateError;
use crate::event::{DebateEvent, EventHandler};
use crate::projection::{project_history, ChatEntry};
use crate::responder::Responder;
use crate::transcript::format_transcript;
use serde::Serialize;
use std::sync::Arc;

/// What Bot A is asked in the first round.
pub const OPENING_PROMPT: &str = "Make your opening statement.";

pub const AGENT_A_NAME: &str = "Bot A";
pub const AGENT_B_NAME: &str = "Bot B";
pub const JUDGE_NAME: &str = "Judge Bot";

/// Round label used for verdict records.
pub const JUDGE_DECISION_LABEL: &str = "Judge Decision";

/// Fixed evaluator persona of the judge.
pub const JUDGE_PERSONA: &str = "\
You are an impartial debate judge. Your role is to evaluate a two-agent debate based solely on the arguments presented in the conversation history provided to you.

Guidelines:
1. You do not take sides based on personal beliefs or external knowledge.
2. You judge only the reasoning, evidence, clarity, and logical coherence shown in the debate history.
3. Identify which agent presented stronger arguments overall.
4. Provide a brief, concise justification summarizing the key reasons for your decision.
5. Your final answer must include:
- The winner (Agent A or Agent B)
- A short explanation of why that agent's reasoning was stronger.
6. Do not restate the entire debate. Do not generate new arguments.
7. Be objective, analytical, and strictly focused on debate quality.
8. Keep your answers short and concise.";

/// Persisted outcome of one round or of one judge evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RoundRecord {
    Exchange {
        /// 1-based, strictly increasing by one.
        round: usize,
        chatbot_a: String,
        chatbot_b: String,
    },
    Verdict {
        /// Number of rounds played when the judge was asked.
        rounds_judged: usize,
        verdict: String,
    },
}

impl RoundRecord {
    /// `"3"` for round 3, `"Judge Decision"` for a verdict.
    pub fn round_label(&self) -> String {
        match self {
            RoundRecord::Exchange { round, .. } => round.to_string(),
            RoundRecord::Verdict { .. } => JUDGE_DECISION_LABEL.to_string(),
        }
    }

    pub fn is_verdict(&self) -> bool {
        matches!(self, RoundRecord::Verdict { .. })
    }
}

/// One debate: two opposing responders, a judge, and the append-only round log.
///
/// All operations take `&mut self` and run one backend call at a time; a session shared
/// between tasks must be wrapped by the caller (e.g. in a `tokio::sync::Mutex`).
pub struct DebateSession {
    id: String,
    judge: Responder,
    agent_a: Responder,
    agent_b: Responder,
    round_num: usize,
    records: Vec<RoundRecord>,
    event_handler: Option<Arc<dyn EventHandler>>,
}

impl DebateSession {
    /// Build the judge, Bot A and Bot B with the same model parameters.
    ///
    /// Fails with [`DebateError::Configuration`] when the settings are invalid or the factory
    /// cannot build a backend.
    pub fn new(
        factory: &dyn BackendFactory,
        config: &BackendConfig,
        persona_a: impl Into<String>,
        persona_b: impl Into<String>,
    ) -> Result<Self, DebateError> {
        config.settings.validate()?;

        let judge = Responder::from_factory(JUDGE_NAME, JUDGE_PERSONA, factory, config)?;
        let agent_a = Responder::from_factory(AGENT_A_NAME, persona_a, factory, config)?;
        let agent_b = Responder::from_factory(AGENT_B_NAME, persona_b, factory, config)?;

        let session = Self::from_responders(judge, agent_a, agent_b);
        log::info!(
            "Debate {} created (model {}, temperature {})",
            session.id,
            config.settings.model,
            config.settings.temperature
        );
        Ok(session)
    }

    /// Assemble a session from already built responders.
    pub fn from_responders(judge: Responder, agent_a: Responder, agent_b: Responder) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            judge,
            agent_a,
            agent_b,
            round_num: 0,
            records: Vec::new(),
            event_handler: None,
        }
    }

    /// Attach an [`EventHandler`] (builder pattern).
    pub fn with_event_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        self.event_handler = Some(handler);
        self
    }

    async fn emit(&self, event: DebateEvent) {
        if let Some(handler) = &self.event_handler {
            handler.on_debate_event(&event).await;
        }
    }

    async fn abort_round(&self, round: usize, participant: &str, err: &DebateError) {
        log::error!("Debate {} round {} aborted: {}", self.id, round, err);
        self.emit(DebateEvent::RoundAborted {
            session_id: self.id.clone(),
            round,
            participant: participant.to_string(),
            error: err.to_string(),
        })
        .await;
    }

    /// Play one round and return its record.
    ///
    /// Bot B always answers Bot A's reply from this same call. If either call fails the error
    /// is returned and no record is appended; a successful Bot A call still shows in Bot A's own
    /// turn log.
    pub async fn advance_round(&mut self) -> Result<RoundRecord, DebateError> {
        let round = self.round_num + 1;
        self.emit(DebateEvent::RoundStarted {
            session_id: self.id.clone(),
            round,
        })
        .await;

        let input_a = if self.round_num == 0 {
            OPENING_PROMPT.to_string()
        } else {
            // B only records a turn when its round is recorded, so this is the last round's reply
            self.agent_b
                .last_output()
                .unwrap_or(OPENING_PROMPT)
                .to_string()
        };

        let message_a = match self.agent_a.respond(&input_a).await {
            Ok(reply) => reply,
            Err(err) => {
                self.abort_round(round, AGENT_A_NAME, &err).await;
                return Err(err);
            }
        };
        self.emit(DebateEvent::ParticipantResponded {
            session_id: self.id.clone(),
            round,
            participant: AGENT_A_NAME.to_string(),
            response_length: message_a.len(),
        })
        .await;

        let message_b = match self.agent_b.respond(&message_a).await {
            Ok(reply) => reply,
            Err(err) => {
                self.abort_round(round, AGENT_B_NAME, &err).await;
                return Err(err);
            }
        };
        self.emit(DebateEvent::ParticipantResponded {
            session_id: self.id.clone(),
            round,
            participant: AGENT_B_NAME.to_string(),
            response_length: message_b.len(),
        })
        .await;

        let record = RoundRecord::Exchange {
            round,
            chatbot_a: message_a,
            chatbot_b: message_b,
        };
        self.records.push(record.clone());
        self.round_num = round;

        log::info!("Debate {} completed round {}", self.id, round);
        self.emit(DebateEvent::RoundCompleted {
            session_id: self.id.clone(),
            round,
        })
        .await;

        Ok(record)
    }

    /// Ask the judge for a verdict on every round so far and record it.
    ///
    /// A debate can be judged again after more rounds are played; each verdict is keyed by the
    /// number of rounds it covers. Judging twice with no new round in between fails with
    /// [`DebateError::AlreadyJudged`], judging before any round with
    /// [`DebateError::NothingToJudge`].
    pub async fn evaluate(&mut self) -> Result<String, DebateError> {
        if self.round_num == 0 {
            return Err(DebateError::NothingToJudge);
        }
        if self.last_verdict_round() == Some(self.round_num) {
            return Err(DebateError::AlreadyJudged {
                rounds: self.round_num,
            });
        }

        let transcript = format_transcript(&self.records);
        let verdict = self.judge.respond(&transcript).await?;

        self.records.push(RoundRecord::Verdict {
            rounds_judged: self.round_num,
            verdict: verdict.clone(),
        });
        log::info!(
            "Debate {} judged after {} rounds",
            self.id,
            self.round_num
        );
        self.emit(DebateEvent::VerdictDelivered {
            session_id: self.id.clone(),
            rounds_judged: self.round_num,
            response_length: verdict.len(),
        })
        .await;

        Ok(verdict)
    }

    /// Display-ready view of the whole history.
    pub fn history_projection(&self) -> Vec<ChatEntry> {
        project_history(&self.records)
    }

    fn last_verdict_round(&self) -> Option<usize> {
        self.records.iter().rev().find_map(|record| match record {
            RoundRecord::Verdict { rounds_judged, .. } => Some(*rounds_judged),
            RoundRecord::Exchange { .. } => None,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn records(&self) -> &[RoundRecord] {
        &self.records
    }

    /// Number of completed rounds.
    pub fn rounds_completed(&self) -> usize {
        self.round_num
    }

    pub fn agent_a(&self) -> &Responder {
        &self.agent_a
    }

    pub fn agent_b(&self) -> &Responder {
        &self.agent_b
    }

    pub fn judge(&self) -> &Responder {
        &self.judge
    }
}
