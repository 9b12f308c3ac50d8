//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use jyoti_core::{Offline, Recommender};

use crate::config::StorefrontConfig;
use crate::middleware::session::SESSION_EXPIRY_SECONDS;
use crate::services::gemini::{GeminiClient, GeminiError};
use crate::visitor::VisitorRegistry;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// configuration, the recommendation service and visitor state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    recommender: Arc<dyn Recommender>,
    visitors: VisitorRegistry,
}

impl AppState {
    /// Create application state from configuration.
    ///
    /// Uses the Gemini client when configured and the offline recommender
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the Gemini HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, GeminiError> {
        let recommender: Arc<dyn Recommender> = match &config.gemini {
            Some(gemini) => Arc::new(GeminiClient::new(gemini)?),
            None => Arc::new(Offline),
        };
        Ok(Self::with_recommender(config, recommender))
    }

    /// Create application state with an explicit recommendation service.
    #[must_use]
    pub fn with_recommender(config: StorefrontConfig, recommender: Arc<dyn Recommender>) -> Self {
        let idle = Duration::from_secs(SESSION_EXPIRY_SECONDS.unsigned_abs());
        Self {
            inner: Arc::new(AppStateInner {
                config,
                recommender,
                visitors: VisitorRegistry::new(idle),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a shared handle to the recommendation service.
    #[must_use]
    pub fn recommender(&self) -> Arc<dyn Recommender> {
        Arc::clone(&self.inner.recommender)
    }

    /// Get a reference to the visitor registry.
    #[must_use]
    pub fn visitors(&self) -> &VisitorRegistry {
        &self.inner.visitors
    }
}
