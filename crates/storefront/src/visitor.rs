//! Per-visitor cart and chat state.
//!
//! The session cookie carries only a visitor id. The cart and chat session
//! live in an in-memory `moka` cache keyed by that id and expire after the
//! same inactivity window as the cookie.
//!
//! Cart and chat are locked separately so a slow recommendation never blocks
//! cart updates.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tokio::sync::Mutex;
use tower_sessions::Session;
use tracing::debug;
use uuid::Uuid;

use jyoti_core::{Cart, ChatSession};

use crate::models::session::keys;

/// Maximum number of concurrently tracked visitors.
const MAX_VISITORS: u64 = 10_000;

/// One visitor's mutable state.
#[derive(Debug)]
pub struct Visitor {
    cart: Mutex<Cart>,
    chat: Mutex<ChatSession>,
}

impl Visitor {
    fn new() -> Self {
        Self {
            cart: Mutex::new(Cart::new()),
            chat: Mutex::new(ChatSession::with_greeting()),
        }
    }

    #[must_use]
    pub const fn cart(&self) -> &Mutex<Cart> {
        &self.cart
    }

    #[must_use]
    pub const fn chat(&self) -> &Mutex<ChatSession> {
        &self.chat
    }
}

/// Registry mapping session visitor ids to their state.
#[derive(Clone)]
pub struct VisitorRegistry {
    visitors: Cache<Uuid, Arc<Visitor>>,
}

impl VisitorRegistry {
    /// Create a registry whose entries expire after `idle` without access.
    #[must_use]
    pub fn new(idle: Duration) -> Self {
        let visitors = Cache::builder()
            .max_capacity(MAX_VISITORS)
            .time_to_idle(idle)
            .build();
        Self { visitors }
    }

    /// State for the visitor behind `session`, creating both the id and the
    /// state on first contact.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be read or written.
    pub async fn resolve(
        &self,
        session: &Session,
    ) -> Result<Arc<Visitor>, tower_sessions::session::Error> {
        let id = if let Some(id) = session.get::<Uuid>(keys::VISITOR_ID).await? {
            id
        } else {
            let id = Uuid::new_v4();
            session.insert(keys::VISITOR_ID, id).await?;
            debug!(visitor_id = %id, "new visitor");
            id
        };

        Ok(self
            .visitors
            .get_with(id, async { Arc::new(Visitor::new()) })
            .await)
    }
}
