//! Chat session with the menu recommendation assistant.
//!
//! A [`ChatSession`] owns an append-only transcript and a single-flight
//! pending flag. Sending is split into two steps so callers that share the
//! session behind a lock can release it while the [`Recommender`] call is in
//! flight:
//!
//! 1. [`ChatSession::begin`] validates the input, appends the visitor's
//!    message and marks the session pending. It returns `None` (and changes
//!    nothing) for blank input or while another turn is outstanding.
//! 2. [`ChatSession::complete`] appends the assistant reply, or the fixed
//!    fallback reply when the recommender failed, and clears the flag.
//!
//! Single-owner callers can use [`ChatSession::send`], which does both.

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use crate::types::{ChatMessage, GroundingLink};

/// Opening message of every new chat.
pub const GREETING: &str = "Namaste! Welcome to New Jyoti Sweets, Teliyarganj. I am your personal host. How can I delight you today?";

/// Reply shown when the recommendation service fails.
pub const FALLBACK_REPLY: &str =
    "Namaste! Our digital kitchen is a bit busy. Please feel free to browse our menu manually.";

/// A reply from the recommendation service.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Recommendation {
    pub text: String,
    /// Citations in the order the service returned them.
    pub grounding_links: Vec<GroundingLink>,
}

impl Recommendation {
    /// A plain-text reply without citations.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            grounding_links: Vec::new(),
        }
    }
}

/// Errors reported by a [`Recommender`].
///
/// These never reach the visitor; the session converts them to
/// [`FALLBACK_REPLY`].
#[derive(Debug, thiserror::Error)]
pub enum RecommendError {
    /// No recommendation service is configured.
    #[error("recommendation service is not configured")]
    NotConfigured,

    /// The service refused the request because of quota or rate limits.
    #[error("recommendation service is rate limited")]
    RateLimited,

    /// Any other failure (transport, HTTP status, malformed response).
    #[error("recommendation service failed: {0}")]
    Service(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The call was cancelled or panicked before producing an outcome.
    #[error("recommendation was interrupted")]
    Interrupted,
}

/// The external menu recommendation service.
///
/// Implementations own prompt construction, model selection and any tool
/// configuration; the session only hands over the visitor's words.
#[async_trait]
pub trait Recommender: Send + Sync {
    /// Produce a reply to `utterance`.
    async fn recommend(&self, utterance: &str) -> Result<Recommendation, RecommendError>;
}

/// A recommender that is never available. Every turn gets the fallback reply.
#[derive(Debug, Clone, Copy, Default)]
pub struct Offline;

#[async_trait]
impl Recommender for Offline {
    async fn recommend(&self, _utterance: &str) -> Result<Recommendation, RecommendError> {
        Err(RecommendError::NotConfigured)
    }
}

/// An accepted visitor message waiting for the assistant's reply.
///
/// Obtained from [`ChatSession::begin`] and consumed by
/// [`ChatSession::complete`].
#[derive(Debug)]
#[must_use = "a pending turn must be completed or the session stays pending"]
pub struct PendingTurn {
    utterance: String,
}

impl PendingTurn {
    /// The trimmed visitor message to forward to the recommender.
    #[must_use]
    pub fn utterance(&self) -> &str {
        &self.utterance
    }
}

/// A chat transcript plus its single-flight pending flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    pending: bool,
}

impl ChatSession {
    /// An empty session.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            messages: Vec::new(),
            pending: false,
        }
    }

    /// A session opened with the assistant's [`GREETING`].
    #[must_use]
    pub fn with_greeting() -> Self {
        Self {
            messages: vec![ChatMessage::assistant(GREETING, Vec::new())],
            pending: false,
        }
    }

    /// The transcript, oldest first.
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Whether a turn is waiting for the assistant.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending
    }

    /// Accept a visitor message.
    ///
    /// Trims `input`; returns `None` without touching the transcript when the
    /// result is empty or a turn is already pending. Otherwise appends the
    /// user message and marks the session pending.
    pub fn begin(&mut self, input: &str) -> Option<PendingTurn> {
        let utterance = input.trim();
        if utterance.is_empty() {
            return None;
        }
        if self.pending {
            debug!("chat turn already pending, ignoring send");
            return None;
        }

        self.messages.push(ChatMessage::user(utterance));
        self.pending = true;
        Some(PendingTurn {
            utterance: utterance.to_owned(),
        })
    }

    /// Settle `turn` with the recommender's outcome by appending the
    /// assistant message.
    ///
    /// Failures are logged and replaced by [`FALLBACK_REPLY`] with no links.
    pub fn complete(
        &mut self,
        turn: PendingTurn,
        outcome: Result<Recommendation, RecommendError>,
    ) {
        let reply = match outcome {
            Ok(recommendation) => {
                ChatMessage::assistant(recommendation.text, recommendation.grounding_links)
            }
            Err(error) => {
                warn!(
                    error = %error,
                    utterance_len = turn.utterance.len(),
                    "recommendation failed, using fallback reply"
                );
                ChatMessage::assistant(FALLBACK_REPLY, Vec::new())
            }
        };

        self.pending = false;
        self.messages.push(reply);
    }

    /// Run one full turn against `recommender`.
    ///
    /// Returns the assistant reply, or `None` when the input was rejected
    /// (blank, or a turn is already pending) and no call was made.
    ///
    /// Cancel-safe: dropping the future mid-call settles the turn with the
    /// fallback reply.
    pub async fn send<R>(&mut self, recommender: &R, input: &str) -> Option<&ChatMessage>
    where
        R: Recommender + ?Sized,
    {
        let turn = self.begin(input)?;
        let guard = SettleOnDrop {
            session: &mut *self,
            turn: Some(turn),
        };
        let outcome = recommender.recommend(guard.utterance()).await;
        guard.settle(outcome);
        self.messages.last()
    }
}

/// Completes a turn with [`RecommendError::Interrupted`] unless it was
/// settled explicitly.
struct SettleOnDrop<'a> {
    session: &'a mut ChatSession,
    turn: Option<PendingTurn>,
}

impl SettleOnDrop<'_> {
    fn utterance(&self) -> &str {
        self.turn.as_ref().map_or("", PendingTurn::utterance)
    }

    fn settle(mut self, outcome: Result<Recommendation, RecommendError>) {
        if let Some(turn) = self.turn.take() {
            self.session.complete(turn, outcome);
        }
    }
}

impl Drop for SettleOnDrop<'_> {
    fn drop(&mut self) {
        if let Some(turn) = self.turn.take() {
            self.session.complete(turn, Err(RecommendError::Interrupted));
        }
    }
}
