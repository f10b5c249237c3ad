//! Judge-facing transcript format.
//!
//! The judge only ever sees the debate through [`format_transcript`]. The layout is versioned by
//! [`TRANSCRIPT_FORMAT_VERSION`] so prompt changes are explicit:
//!
//! ```text
//! Debate transcript (format v1, 2 rounds)
//!
//! Round 1
//! Agent A: <A's opening statement>
//! Agent B: <B's reply>
//!
//! Round 2
//! Agent A: ...
//! Agent B: ...
//! ```
//!
//! Verdict records are left out; the judge rules on the arguments only.

use crate::debate::RoundRecord;

pub const TRANSCRIPT_FORMAT_VERSION: u32 = 1;

/// Render every exchange in `records`, in order. Outputs are copied verbatim.
pub fn format_transcript(records: &[RoundRecord]) -> String {
    let blocks: Vec<String> = records
        .iter()
        .filter_map(|record| match record {
            RoundRecord::Exchange {
                round,
                chatbot_a,
                chatbot_b,
            } => Some(format!(
                "Round {}\nAgent A: {}\nAgent B: {}",
                round, chatbot_a, chatbot_b
            )),
            RoundRecord::Verdict { .. } => None,
        })
        .collect();

    let mut transcript = format!(
        "Debate transcript (format v{}, {} {})",
        TRANSCRIPT_FORMAT_VERSION,
        blocks.len(),
        if blocks.len() == 1 { "round" } else { "rounds" }
    );
    for block in blocks {
        transcript.push_str("\n\n");
        transcript.push_str(&block);
    }
    transcript
}
