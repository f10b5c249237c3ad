//! Error taxonomy shared by every debate component.
//!
//! Nothing in the crate retries or recovers locally: configuration problems are reported when a
//! debate is built, and provider failures bubble up unchanged from whichever participant hit them.

use std::error::Error;
use std::fmt;

/// Boxed provider error as returned by [`ClientWrapper`](crate::ClientWrapper) and
/// [`ChatBackend`](crate::chat_engine::ChatBackend) implementations.
pub type BoxError = Box<dyn Error + Send + Sync>;

/// Errors surfaced by responders, debate sessions and their collaborators.
///
/// # Examples
///
/// ```
/// use debatellm::DebateError;
///
/// let err = DebateError::Configuration("GROQ_API_KEY is not set".into());
/// assert_eq!(err.to_string(), "Configuration error: GROQ_API_KEY is not set");
/// ```
#[derive(Debug)]
pub enum DebateError {
    /// Required backend configuration (model, credentials, corpus) is missing or invalid.
    Configuration(String),

    /// A participant's backend failed while answering. The debate state is left as it was
    /// before the failing call.
    Backend {
        /// Display name of the participant whose call failed (e.g. `"Bot B"`).
        participant: String,
        /// Underlying provider error.
        source: BoxError,
    },

    /// `evaluate()` was called again without any new round since the last verdict.
    AlreadyJudged {
        /// Number of rounds covered by the existing verdict.
        rounds: usize,
    },

    /// `evaluate()` was called before any round was played.
    NothingToJudge,

    /// Reading or writing corpus documents failed.
    Io(std::io::Error),
}

impl fmt::Display for DebateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DebateError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            DebateError::Backend {
                participant,
                source,
            } => write!(f, "Backend error from {}: {}", participant, source),
            DebateError::AlreadyJudged { rounds } => write!(
                f,
                "Debate already judged after round {}; play another round first",
                rounds
            ),
            DebateError::NothingToJudge => write!(f, "No rounds have been played yet"),
            DebateError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl Error for DebateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DebateError::Backend { source, .. } => Some(source.as_ref()),
            DebateError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DebateError {
    fn from(err: std::io::Error) -> Self {
        DebateError::Io(err)
    }
}
