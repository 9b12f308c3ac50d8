//! Chat host route handlers.
//!
//! A send appends the visitor's message, asks the recommender and answers
//! with the settled transcript. The turn is settled on its own task so the
//! transcript settles even if the visitor disconnects mid-request, and the
//! recommender call runs on a nested task so a panic there still completes
//! the turn with the fallback reply.

use std::sync::Arc;

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{Instrument, instrument, warn};

use jyoti_core::{ChatMessage, ChatSession, RecommendError};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Chat form data.
#[derive(Debug, Deserialize)]
pub struct ChatForm {
    #[serde(default)]
    pub message: String,
}

/// Chat transcript fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/chat.html")]
pub struct ChatTemplate {
    pub messages: Vec<ChatMessage>,
    pub pending: bool,
}

impl From<&ChatSession> for ChatTemplate {
    fn from(chat: &ChatSession) -> Self {
        Self {
            messages: chat.messages().to_vec(),
            pending: chat.is_pending(),
        }
    }
}

/// Display the chat transcript.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<ChatTemplate> {
    let visitor = state.visitors().resolve(&session).await?;
    let chat = visitor.chat().lock().await;
    Ok(ChatTemplate::from(&*chat))
}

/// Send a message to the chat host (HTMX).
///
/// Blank messages, and messages sent while a reply is outstanding, leave the
/// transcript unchanged and make no recommender call.
#[instrument(skip(state, session, form), fields(message_len = form.message.len()))]
pub async fn send(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ChatForm>,
) -> Result<ChatTemplate> {
    let visitor = state.visitors().resolve(&session).await?;

    let turn = visitor.chat().lock().await.begin(&form.message);
    if let Some(turn) = turn {
        let recommender = state.recommender();
        let owner = Arc::clone(&visitor);
        let settle = tokio::spawn(
            async move {
                let utterance = turn.utterance().to_owned();
                let call = tokio::spawn(
                    async move { recommender.recommend(&utterance).await }.in_current_span(),
                );
                let outcome = call.await.unwrap_or_else(|e| {
                    warn!(error = %e, "recommendation task failed");
                    Err(RecommendError::Interrupted)
                });
                owner.chat().lock().await.complete(turn, outcome);
            }
            .in_current_span(),
        );
        settle
            .await
            .map_err(|e| AppError::Internal(format!("chat turn task failed: {e}")))?;
    }

    let chat = visitor.chat().lock().await;
    Ok(ChatTemplate::from(&*chat))
}
