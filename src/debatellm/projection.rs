//! Display projection of a debate's history.
//!
//! [`project_history`] flattens round records into the ordered `{role, content}` list a chat
//! widget renders. It is a pure function of the stored records and can be recomputed at any time.

use crate::debate::RoundRecord;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionRole {
    System,
    Assistant,
}

/// One display line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatEntry {
    pub role: ProjectionRole,
    pub content: String,
}

impl ChatEntry {
    fn system(content: String) -> Self {
        Self {
            role: ProjectionRole::System,
            content,
        }
    }

    fn assistant(content: String) -> Self {
        Self {
            role: ProjectionRole::Assistant,
            content,
        }
    }
}

/// `Round n`, `Bot A: ..`, `Bot B: ..` per exchange; `Round Judge Decision`,
/// `Judge Bot: ..` per verdict.
pub fn project_history(records: &[RoundRecord]) -> Vec<ChatEntry> {
    let mut entries = Vec::with_capacity(records.len() * 3);
    for record in records {
        entries.push(ChatEntry::system(format!("Round {}", record.round_label())));
        match record {
            RoundRecord::Exchange {
                chatbot_a,
                chatbot_b,
                ..
            } => {
                entries.push(ChatEntry::assistant(format!("Bot A: {}", chatbot_a)));
                entries.push(ChatEntry::assistant(format!("Bot B: {}", chatbot_b)));
            }
            RoundRecord::Verdict { verdict, .. } => {
                entries.push(ChatEntry::assistant(format!("Judge Bot: {}", verdict)));
            }
        }
    }
    entries
}
