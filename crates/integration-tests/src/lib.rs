//! Integration test harness for the New Jyoti Sweets storefront.
//!
//! Each test spawns the full storefront router on an ephemeral port and
//! talks to it over real HTTP with a cookie-keeping client, so session and
//! visitor handling are exercised end to end.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p jyoti-integration-tests
//! ```
//!
//! No external services are needed: the chat host is driven by a
//! [`ScriptedRecommender`] or by a [`FakeGemini`] server on localhost.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, Uri},
    response::IntoResponse,
};
use jyoti_core::{RecommendError, Recommendation, Recommender};
use jyoti_storefront::config::{GeminiConfig, StorefrontConfig};
use jyoti_storefront::state::AppState;
use reqwest::Client;
use secrecy::SecretString;
use serde_json::Value;
use tokio::net::TcpListener;

/// Bind `router` to an ephemeral localhost port and serve it in the background.
async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local addr");

    tokio::spawn(async move {
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("Test server error");
    });

    format!("http://{addr}")
}

// ============================================================================
// Storefront
// ============================================================================

/// Configuration for tests: plain HTTP, no Sentry, instant reservations.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    let mut config = StorefrontConfig::local("http://127.0.0.1");
    config.reservation_delay = Duration::ZERO;
    config
}

/// A running storefront plus a client that keeps its session cookie.
pub struct TestApp {
    pub base_url: String,
    pub client: Client,
}

impl TestApp {
    /// Spawn a storefront whose chat host answers with `recommender`.
    pub async fn spawn(recommender: Arc<dyn Recommender>) -> Self {
        let state = AppState::with_recommender(test_config(), recommender);
        let base_url = serve(jyoti_storefront::app(state)).await;
        Self {
            base_url,
            client: new_client(),
        }
    }

    /// Spawn a storefront with the offline recommender.
    pub async fn offline() -> Self {
        Self::spawn(Arc::new(jyoti_core::Offline)).await
    }

    /// A second visitor on the same server, with an empty cookie jar.
    #[must_use]
    pub fn another_visitor(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            client: new_client(),
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET `path` and return the response.
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// POST a urlencoded form to `path` and return the response.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request failed")
    }

    /// GET `path` and parse the body as JSON.
    pub async fn get_json(&self, path: &str) -> Value {
        let resp = self.get(path).await;
        assert!(resp.status().is_success(), "GET {path} -> {}", resp.status());
        resp.json().await.expect("Failed to parse JSON body")
    }
}

fn new_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

// ============================================================================
// Scripted recommender
// ============================================================================

/// Recommender that replays queued outcomes and records what it was asked.
///
/// Once the queue is empty every call fails. A recommender built with
/// [`ScriptedRecommender::slow`] waits before answering each call.
#[derive(Default)]
pub struct ScriptedRecommender {
    outcomes: Mutex<VecDeque<Result<Recommendation, RecommendError>>>,
    utterances: Mutex<Vec<String>>,
    delay: Duration,
}

impl ScriptedRecommender {
    #[must_use]
    pub fn new(
        outcomes: impl IntoIterator<Item = Result<Recommendation, RecommendError>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(outcomes.into_iter().collect()),
            utterances: Mutex::default(),
            delay: Duration::ZERO,
        })
    }

    /// Like [`ScriptedRecommender::new`], but every call takes `delay`.
    #[must_use]
    pub fn slow(
        delay: Duration,
        outcomes: impl IntoIterator<Item = Result<Recommendation, RecommendError>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(outcomes.into_iter().collect()),
            utterances: Mutex::default(),
            delay,
        })
    }

    /// Every utterance passed to `recommend`, in order.
    #[must_use]
    pub fn utterances(&self) -> Vec<String> {
        self.utterances.lock().expect("utterances lock").clone()
    }
}

#[async_trait]
impl Recommender for ScriptedRecommender {
    async fn recommend(&self, utterance: &str) -> Result<Recommendation, RecommendError> {
        self.utterances
            .lock()
            .expect("utterances lock")
            .push(utterance.to_owned());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.outcomes
            .lock()
            .expect("outcomes lock")
            .pop_front()
            .unwrap_or_else(|| Err(RecommendError::NotConfigured))
    }
}

/// Recommender whose every call panics.
pub struct PanickingRecommender;

#[async_trait]
impl Recommender for PanickingRecommender {
    async fn recommend(&self, _utterance: &str) -> Result<Recommendation, RecommendError> {
        panic!("recommender blew up");
    }
}

// ============================================================================
// Fake Gemini API
// ============================================================================

/// A request captured by [`FakeGemini`].
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub path: String,
    pub api_key: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct FakeGeminiState {
    status: StatusCode,
    headers: Vec<(&'static str, String)>,
    body: Value,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

/// Local stand-in for the `generateContent` API that answers every request
/// with a fixed status and body.
pub struct FakeGemini {
    pub base_url: String,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl FakeGemini {
    /// Answer every request with `200 OK` and `body`.
    pub async fn ok(body: Value) -> Self {
        Self::respond(StatusCode::OK, Vec::new(), body).await
    }

    /// Answer every request with `status`, extra `headers` and `body`.
    pub async fn respond(
        status: StatusCode,
        headers: Vec<(&'static str, String)>,
        body: Value,
    ) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = FakeGeminiState {
            status,
            headers,
            body,
            requests: Arc::clone(&requests),
        };
        let router = Router::new().fallback(generate).with_state(state);
        Self {
            base_url: serve(router).await,
            requests,
        }
    }

    /// Client configuration pointing at this server.
    #[must_use]
    pub fn config(&self) -> GeminiConfig {
        GeminiConfig {
            api_key: SecretString::from("test-gemini-key-7Qm2xV9pLk4R"),
            model: "gemini-test".to_string(),
            api_base: self.base_url.clone(),
        }
    }

    /// Requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

async fn generate(
    State(state): State<FakeGeminiState>,
    uri: Uri,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> impl IntoResponse {
    state
        .requests
        .lock()
        .expect("requests lock")
        .push(CapturedRequest {
            path: uri.path().to_string(),
            api_key: headers
                .get("x-goog-api-key")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            body: serde_json::from_slice(&body).unwrap_or(Value::Null),
        });

    let mut response = (state.status, Json(state.body)).into_response();
    for (name, value) in state.headers {
        if let Ok(value) = HeaderValue::from_str(&value) {
            response.headers_mut().insert(name, value);
        }
    }
    response
}
