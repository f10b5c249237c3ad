use async_trait::async_trait;
use debatellm::chat_engine::{BackendConfig, BackendFactory, ChatBackend};
use debatellm::debate::{AGENT_A_NAME, AGENT_B_NAME, JUDGE_NAME, JUDGE_PERSONA, OPENING_PROMPT};
use debatellm::event::{DebateEvent, EventHandler};
use debatellm::projection::ProjectionRole;
use debatellm::retrieval::NoRetrieval;
use debatellm::{BoxError, DebateError, DebateSession, DebateSettings, Responder, RoundRecord};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Replies `"<label> #<n>"` and records every message it receives.
struct ScriptedBackend {
    label: String,
    calls: usize,
    fail_on_call: Option<usize>,
    inbox: Arc<Mutex<Vec<String>>>,
}

impl ScriptedBackend {
    fn new(label: &str) -> (Self, Arc<Mutex<Vec<String>>>) {
        let inbox = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                label: label.to_string(),
                calls: 0,
                fail_on_call: None,
                inbox: inbox.clone(),
            },
            inbox,
        )
    }

    fn failing_on(mut self, call: usize) -> Self {
        self.fail_on_call = Some(call);
        self
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn chat(&mut self, message: &str) -> Result<String, BoxError> {
        self.calls += 1;
        if self.fail_on_call == Some(self.calls) {
            return Err(format!("{} rate limited", self.label).into());
        }
        self.inbox.lock().unwrap().push(message.to_string());
        Ok(format!("{} #{}", self.label, self.calls))
    }
}

/// Labels backends by persona and keeps each one's inbox.
#[derive(Default)]
struct ScriptedFactory {
    inboxes: Mutex<HashMap<String, Arc<Mutex<Vec<String>>>>>,
}

impl ScriptedFactory {
    fn inbox(&self, persona: &str) -> Vec<String> {
        self.inboxes.lock().unwrap()[persona].lock().unwrap().clone()
    }
}

impl BackendFactory for ScriptedFactory {
    fn create_backend(
        &self,
        persona: &str,
        _config: &BackendConfig,
    ) -> Result<Box<dyn ChatBackend>, DebateError> {
        let label = if persona == JUDGE_PERSONA { "judge" } else { persona };
        let (backend, inbox) = ScriptedBackend::new(label);
        self.inboxes
            .lock()
            .unwrap()
            .insert(persona.to_string(), inbox);
        Ok(Box::new(backend))
    }
}

fn backend_config() -> BackendConfig {
    BackendConfig::new(DebateSettings::default(), Arc::new(NoRetrieval))
}

fn new_debate(factory: &ScriptedFactory) -> DebateSession {
    DebateSession::new(factory, &backend_config(), "P_A", "P_B").unwrap()
}

#[derive(Default)]
struct RecordingHandler {
    events: Mutex<Vec<DebateEvent>>,
}

#[async_trait]
impl EventHandler for RecordingHandler {
    async fn on_debate_event(&self, event: &DebateEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

#[tokio::test]
async fn test_construction_creates_named_participants() {
    let factory = ScriptedFactory::default();
    let debate = new_debate(&factory);

    assert_eq!(debate.agent_a().name(), AGENT_A_NAME);
    assert_eq!(debate.agent_a().persona(), "P_A");
    assert_eq!(debate.agent_b().name(), AGENT_B_NAME);
    assert_eq!(debate.agent_b().persona(), "P_B");
    assert_eq!(debate.judge().name(), JUDGE_NAME);
    assert_eq!(debate.judge().persona(), JUDGE_PERSONA);
    assert_eq!(debate.rounds_completed(), 0);
    assert!(debate.records().is_empty());
    assert!(!debate.id().is_empty());
}

#[tokio::test]
async fn test_invalid_settings_are_a_configuration_error() {
    let factory = ScriptedFactory::default();
    let config = BackendConfig::new(DebateSettings::new("", 0.7), Arc::new(NoRetrieval));

    let result = DebateSession::new(&factory, &config, "P_A", "P_B");
    assert!(matches!(result, Err(DebateError::Configuration(_))));
}

#[tokio::test]
async fn test_first_round_uses_opening_prompt() {
    let factory = ScriptedFactory::default();
    let mut debate = new_debate(&factory);

    let record = debate.advance_round().await.unwrap();

    assert_eq!(
        record,
        RoundRecord::Exchange {
            round: 1,
            chatbot_a: "P_A #1".into(),
            chatbot_b: "P_B #1".into(),
        }
    );
    assert_eq!(factory.inbox("P_A"), vec![OPENING_PROMPT.to_string()]);
    assert_eq!(factory.inbox("P_B"), vec!["P_A #1".to_string()]);
}

#[tokio::test]
async fn test_opening_prompt_ignores_prior_responder_state() {
    let (a_backend, a_inbox) = ScriptedBackend::new("A");
    let mut agent_a = Responder::new(AGENT_A_NAME, "P_A", Box::new(a_backend));
    agent_a.respond("warm-up question").await.unwrap();

    let (b_backend, _) = ScriptedBackend::new("B");
    let (judge_backend, _) = ScriptedBackend::new("judge");
    let mut debate = DebateSession::from_responders(
        Responder::new(JUDGE_NAME, JUDGE_PERSONA, Box::new(judge_backend)),
        agent_a,
        Responder::new(AGENT_B_NAME, "P_B", Box::new(b_backend)),
    );

    debate.advance_round().await.unwrap();
    assert_eq!(a_inbox.lock().unwrap()[1], OPENING_PROMPT);
}

#[tokio::test]
async fn test_rounds_cross_thread_outputs() {
    let factory = ScriptedFactory::default();
    let mut debate = new_debate(&factory);

    for _ in 0..4 {
        debate.advance_round().await.unwrap();
    }

    let a_turns = debate.agent_a().turns();
    let b_turns = debate.agent_b().turns();
    assert_eq!(a_turns.len(), 4);
    assert_eq!(b_turns.len(), 4);

    for k in 0..4 {
        // B answers A from the same round
        assert_eq!(b_turns[k].input, a_turns[k].output);
        if k > 0 {
            // A answers B from the previous round
            assert_eq!(a_turns[k].input, b_turns[k - 1].output);
        }
    }
    assert_eq!(factory.inbox("P_A")[2], "P_B #2");
}

#[tokio::test]
async fn test_round_indices_have_no_gaps() {
    let factory = ScriptedFactory::default();
    let mut debate = new_debate(&factory);

    for _ in 0..5 {
        debate.advance_round().await.unwrap();
    }

    let rounds: Vec<usize> = debate
        .records()
        .iter()
        .map(|record| match record {
            RoundRecord::Exchange { round, .. } => *round,
            RoundRecord::Verdict { .. } => panic!("unexpected verdict"),
        })
        .collect();
    assert_eq!(rounds, vec![1, 2, 3, 4, 5]);
    assert_eq!(debate.rounds_completed(), 5);
}

#[tokio::test]
async fn test_evaluate_appends_single_verdict_after_rounds() {
    let factory = ScriptedFactory::default();
    let mut debate = new_debate(&factory);
    debate.advance_round().await.unwrap();
    debate.advance_round().await.unwrap();

    let verdict = debate.evaluate().await.unwrap();

    assert_eq!(verdict, "judge #1");
    assert_eq!(debate.records().len(), 3);
    assert_eq!(
        debate.records().last(),
        Some(&RoundRecord::Verdict {
            rounds_judged: 2,
            verdict: "judge #1".into(),
        })
    );
    assert_eq!(
        debate.records().iter().filter(|r| r.is_verdict()).count(),
        1
    );

    let judge_inbox = factory.inbox(JUDGE_PERSONA);
    assert_eq!(judge_inbox.len(), 1);
    for output in ["P_A #1", "P_B #1", "P_A #2", "P_B #2"] {
        assert!(judge_inbox[0].contains(output), "missing {}", output);
    }
}

#[tokio::test]
async fn test_evaluate_requires_rounds() {
    let factory = ScriptedFactory::default();
    let mut debate = new_debate(&factory);

    assert!(matches!(
        debate.evaluate().await,
        Err(DebateError::NothingToJudge)
    ));
    assert!(factory.inbox(JUDGE_PERSONA).is_empty());
}

#[tokio::test]
async fn test_reevaluation_needs_a_new_round() {
    let factory = ScriptedFactory::default();
    let mut debate = new_debate(&factory);
    debate.advance_round().await.unwrap();
    debate.evaluate().await.unwrap();

    assert!(matches!(
        debate.evaluate().await,
        Err(DebateError::AlreadyJudged { rounds: 1 })
    ));
    assert_eq!(debate.records().len(), 2);

    debate.advance_round().await.unwrap();
    debate.evaluate().await.unwrap();

    let verdicts: Vec<usize> = debate
        .records()
        .iter()
        .filter_map(|r| match r {
            RoundRecord::Verdict { rounds_judged, .. } => Some(*rounds_judged),
            _ => None,
        })
        .collect();
    assert_eq!(verdicts, vec![1, 2]);
    // the second transcript only carries the exchanges
    assert!(!factory.inbox(JUDGE_PERSONA)[1].contains("judge #1"));
}

#[tokio::test]
async fn test_projection_of_two_rounds_and_verdict() {
    let factory = ScriptedFactory::default();
    let mut debate = new_debate(&factory);
    debate.advance_round().await.unwrap();
    debate.advance_round().await.unwrap();
    debate.evaluate().await.unwrap();

    let projection = debate.history_projection();
    assert_eq!(projection.len(), 8);

    let rendered: Vec<(ProjectionRole, &str)> = projection
        .iter()
        .map(|entry| (entry.role, entry.content.as_str()))
        .collect();
    assert_eq!(
        rendered,
        vec![
            (ProjectionRole::System, "Round 1"),
            (ProjectionRole::Assistant, "Bot A: P_A #1"),
            (ProjectionRole::Assistant, "Bot B: P_B #1"),
            (ProjectionRole::System, "Round 2"),
            (ProjectionRole::Assistant, "Bot A: P_A #2"),
            (ProjectionRole::Assistant, "Bot B: P_B #2"),
            (ProjectionRole::System, "Round Judge Decision"),
            (ProjectionRole::Assistant, "Judge Bot: judge #1"),
        ]
    );
    // pure: a second projection is identical
    assert_eq!(debate.history_projection(), projection);
}

#[tokio::test]
async fn test_failure_of_b_commits_no_round() {
    let (a_backend, _) = ScriptedBackend::new("A");
    let (b_backend, _) = ScriptedBackend::new("B");
    let (judge_backend, _) = ScriptedBackend::new("judge");
    let handler = Arc::new(RecordingHandler::default());

    let mut debate = DebateSession::from_responders(
        Responder::new(JUDGE_NAME, JUDGE_PERSONA, Box::new(judge_backend)),
        Responder::new(AGENT_A_NAME, "P_A", Box::new(a_backend)),
        Responder::new(AGENT_B_NAME, "P_B", Box::new(b_backend.failing_on(2))),
    )
    .with_event_handler(handler.clone());

    debate.advance_round().await.unwrap();
    let err = debate.advance_round().await.unwrap_err();

    match err {
        DebateError::Backend { participant, .. } => assert_eq!(participant, AGENT_B_NAME),
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(debate.records().len(), 1);
    assert_eq!(debate.rounds_completed(), 1);
    // A's own log keeps its successful call, B's does not
    assert_eq!(debate.agent_a().turns().len(), 2);
    assert_eq!(debate.agent_b().turns().len(), 1);

    let events = handler.events.lock().unwrap().clone();
    assert!(matches!(
        events.last(),
        Some(DebateEvent::RoundAborted { round: 2, participant, .. }) if participant == AGENT_B_NAME
    ));

    // the retry still feeds A with B's last recorded reply and gets index 2
    let record = debate.advance_round().await.unwrap();
    assert_eq!(debate.agent_a().turns()[2].input, "B #1");
    assert!(matches!(record, RoundRecord::Exchange { round: 2, .. }));
}

#[tokio::test]
async fn test_failed_first_round_keeps_opening_prompt() {
    let (a_backend, a_inbox) = ScriptedBackend::new("A");
    let (b_backend, _) = ScriptedBackend::new("B");
    let (judge_backend, _) = ScriptedBackend::new("judge");

    let mut debate = DebateSession::from_responders(
        Responder::new(JUDGE_NAME, JUDGE_PERSONA, Box::new(judge_backend)),
        Responder::new(AGENT_A_NAME, "P_A", Box::new(a_backend.failing_on(1))),
        Responder::new(AGENT_B_NAME, "P_B", Box::new(b_backend)),
    );

    assert!(debate.advance_round().await.is_err());
    assert!(debate.records().is_empty());

    debate.advance_round().await.unwrap();
    assert_eq!(a_inbox.lock().unwrap().as_slice(), [OPENING_PROMPT]);
}

#[tokio::test]
async fn test_judge_failure_appends_nothing() {
    let (a_backend, _) = ScriptedBackend::new("A");
    let (b_backend, _) = ScriptedBackend::new("B");
    let (judge_backend, _) = ScriptedBackend::new("judge");

    let mut debate = DebateSession::from_responders(
        Responder::new(JUDGE_NAME, JUDGE_PERSONA, Box::new(judge_backend.failing_on(1))),
        Responder::new(AGENT_A_NAME, "P_A", Box::new(a_backend)),
        Responder::new(AGENT_B_NAME, "P_B", Box::new(b_backend)),
    );
    debate.advance_round().await.unwrap();

    assert!(matches!(
        debate.evaluate().await,
        Err(DebateError::Backend { .. })
    ));
    assert_eq!(debate.records().len(), 1);

    assert_eq!(debate.evaluate().await.unwrap(), "judge #2");
}

#[tokio::test]
async fn test_events_for_round_and_verdict() {
    let factory = ScriptedFactory::default();
    let handler = Arc::new(RecordingHandler::default());
    let mut debate = new_debate(&factory).with_event_handler(handler.clone());
    let id = debate.id().to_string();

    debate.advance_round().await.unwrap();
    debate.evaluate().await.unwrap();

    let events = handler.events.lock().unwrap().clone();
    assert_eq!(
        events,
        vec![
            DebateEvent::RoundStarted {
                session_id: id.clone(),
                round: 1
            },
            DebateEvent::ParticipantResponded {
                session_id: id.clone(),
                round: 1,
                participant: AGENT_A_NAME.into(),
                response_length: "P_A #1".len(),
            },
            DebateEvent::ParticipantResponded {
                session_id: id.clone(),
                round: 1,
                participant: AGENT_B_NAME.into(),
                response_length: "P_B #1".len(),
            },
            DebateEvent::RoundCompleted {
                session_id: id.clone(),
                round: 1
            },
            DebateEvent::VerdictDelivered {
                session_id: id,
                rounds_judged: 1,
                response_length: "judge #1".len(),
            },
        ]
    );
}
