//! Gemini API client for the chat host.
//!
//! Sends one `generateContent` request per visitor message with the shop's
//! system instruction and the Google Maps grounding tool centred on the shop.

use std::sync::Arc;
use std::time::Duration;

use askama::Template;
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{instrument, warn};

use jyoti_core::catalog::{SHOP, ShopInfo, menu_digest};
use jyoti_core::{GroundingLink, RecommendError, Recommendation, Recommender};

use crate::config::GeminiConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Reply used when the model returns no text.
pub const EMPTY_REPLY: &str = "I'm sorry, I'm having a bit of trouble connecting to the kitchen. How can I assist you otherwise?";

/// Title for a maps citation that came without one.
pub const DEFAULT_LINK_TITLE: &str = "View on Maps";

/// Errors that can occur when calling the Gemini API.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API key cannot be sent as a header value.
    #[error("API key contains characters not allowed in a header")]
    InvalidKey,

    /// Gemini returned an error response.
    #[error("API error ({status}): {message}")]
    Api { status: String, message: String },

    /// Rate limited or out of quota.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication failed.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Failed to parse response.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<GeminiError> for RecommendError {
    fn from(err: GeminiError) -> Self {
        match err {
            GeminiError::RateLimited(_) => Self::RateLimited,
            other => Self::Service(Box::new(other)),
        }
    }
}

/// System instruction template for the chat host.
#[derive(Template)]
#[template(path = "gemini/system_prompt.txt")]
struct SystemPromptTemplate<'a> {
    shop: &'a ShopInfo,
    menu: &'a str,
}

/// Render the system instruction.
fn render_system_prompt() -> String {
    let menu = menu_digest();
    SystemPromptTemplate {
        shop: &SHOP,
        menu: &menu,
    }
    .render()
    .unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to render system prompt");
        format!("You are the friendly host of {}.", SHOP.name)
    })
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: [Content<'a>; 1],
    tools: [Tool; 1],
    tool_config: ToolConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: [TextPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Tool {
    google_maps: GoogleMaps,
}

#[derive(Debug, Serialize)]
struct GoogleMaps {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolConfig {
    retrieval_config: RetrievalConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RetrievalConfig {
    lat_lng: LatLng,
}

#[derive(Debug, Serialize)]
struct LatLng {
    latitude: f64,
    longitude: f64,
}

impl<'a> GenerateContentRequest<'a> {
    fn new(system_instruction: &'a str, utterance: &'a str) -> Self {
        Self {
            system_instruction: Content {
                role: None,
                parts: [TextPart {
                    text: system_instruction,
                }],
            },
            contents: [Content {
                role: Some("user"),
                parts: [TextPart { text: utterance }],
            }],
            tools: [Tool {
                google_maps: GoogleMaps {},
            }],
            tool_config: ToolConfig {
                retrieval_config: RetrievalConfig {
                    lat_lng: LatLng {
                        latitude: SHOP.latitude,
                        longitude: SHOP.longitude,
                    },
                },
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
    /// Set on reasoning parts, which are not part of the reply.
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Default, Deserialize)]
struct GroundingChunk {
    #[serde(default)]
    maps: Option<MapsChunk>,
}

#[derive(Debug, Default, Deserialize)]
struct MapsChunk {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    uri: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

impl GenerateContentResponse {
    /// Reply text and maps citations from the first candidate.
    fn into_recommendation(self) -> Recommendation {
        let Some(candidate) = self.candidates.into_iter().next() else {
            return Recommendation::text(EMPTY_REPLY);
        };

        let text: String = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter(|part| !part.thought)
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        let grounding_links = candidate
            .grounding_metadata
            .map(|metadata| {
                metadata
                    .grounding_chunks
                    .into_iter()
                    .filter_map(|chunk| {
                        let maps = chunk.maps.unwrap_or_default();
                        let uri =
                            non_empty(maps.uri).unwrap_or_else(|| SHOP.google_maps_url.to_string());
                        if !is_web_uri(&uri) {
                            warn!(uri = %uri, "dropping grounding link with non-web uri");
                            return None;
                        }
                        Some(GroundingLink::new(
                            non_empty(maps.title).unwrap_or_else(|| DEFAULT_LINK_TITLE.to_string()),
                            uri,
                        ))
                    })
                    .collect()
            })
            .unwrap_or_default();

        Recommendation {
            text: if text.is_empty() {
                EMPTY_REPLY.to_string()
            } else {
                text
            },
            grounding_links,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// Only http(s) links are rendered as anchors.
fn is_web_uri(uri: &str) -> bool {
    let scheme = uri.split_once(':').map_or("", |(scheme, _)| scheme);
    scheme.eq_ignore_ascii_case("https") || scheme.eq_ignore_ascii_case("http")
}

// =============================================================================
// Client
// =============================================================================

/// Gemini API client.
///
/// Cheap to clone; the HTTP client and rendered system instruction are shared.
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<GeminiClientInner>,
}

struct GeminiClientInner {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    system_instruction: String,
}

impl GeminiClient {
    /// Create a new Gemini client.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not a valid header value or the
    /// HTTP client cannot be built.
    pub fn new(config: &GeminiConfig) -> Result<Self, GeminiError> {
        let mut api_key = HeaderValue::from_str(config.api_key.expose_secret())
            .map_err(|_| GeminiError::InvalidKey)?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("x-goog-api-key", api_key);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            inner: Arc::new(GeminiClientInner {
                client,
                endpoint: endpoint(&config.api_base, &config.model),
                model: config.model.clone(),
                system_instruction: render_system_prompt(),
            }),
        })
    }

    /// Ask the model about `utterance`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API responds with an error
    /// status, or the response body cannot be parsed.
    #[instrument(skip(self, utterance), fields(model = %self.inner.model))]
    pub async fn generate(&self, utterance: &str) -> Result<Recommendation, GeminiError> {
        let request = GenerateContentRequest::new(&self.inner.system_instruction, utterance);

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(handle_error_status(status, response).await);
        }

        let body = response.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| GeminiError::Parse(format!("Failed to parse response: {e}")))?;
        Ok(parsed.into_recommendation())
    }
}

#[async_trait]
impl Recommender for GeminiClient {
    async fn recommend(&self, utterance: &str) -> Result<Recommendation, RecommendError> {
        Ok(self.generate(utterance).await?)
    }
}

/// The `generateContent` URL for `model` under `api_base`.
fn endpoint(api_base: &str, model: &str) -> String {
    format!(
        "{}/v1beta/models/{model}:generateContent",
        api_base.trim_end_matches('/')
    )
}

/// Map an error status code to a [`GeminiError`].
async fn handle_error_status(
    status: reqwest::StatusCode,
    response: reqwest::Response,
) -> GeminiError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);
        return GeminiError::RateLimited(retry_after);
    }

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return GeminiError::Unauthorized("Invalid API key".to_string());
    }

    match response.text().await {
        Ok(body) => parse_error_body(status, body),
        Err(e) => GeminiError::Http(e),
    }
}

fn parse_error_body(status: reqwest::StatusCode, body: String) -> GeminiError {
    match serde_json::from_str::<ApiErrorResponse>(&body) {
        Ok(api_error) => GeminiError::Api {
            status: if api_error.error.status.is_empty() {
                status.to_string()
            } else {
                api_error.error.status
            },
            message: api_error.error.message,
        },
        Err(_) => GeminiError::Api {
            status: status.to_string(),
            message: body,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Recommendation {
        serde_json::from_str::<GenerateContentResponse>(json)
            .expect("deserialize")
            .into_recommendation()
    }

    #[test]
    fn test_endpoint() {
        assert_eq!(
            endpoint("https://generativelanguage.googleapis.com/", "gemini-3-flash-preview"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-3-flash-preview:generateContent"
        );
    }

    #[test]
    fn test_request_shape() {
        let request = GenerateContentRequest::new("be kind", "any laddu?");
        let json = serde_json::to_value(&request).expect("serialize");

        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "be kind");
        assert!(json["systemInstruction"].get("role").is_none());
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "any laddu?");
        assert_eq!(json["tools"], serde_json::json!([{ "googleMaps": {} }]));
        assert_eq!(
            json["toolConfig"]["retrievalConfig"]["latLng"]["latitude"],
            SHOP.latitude
        );
        assert_eq!(
            json["toolConfig"]["retrievalConfig"]["latLng"]["longitude"],
            SHOP.longitude
        );
    }

    #[test]
    fn test_text_is_concatenated_from_first_candidate() {
        let recommendation = parse(
            r#"{
                "candidates": [
                    {"content": {"parts": [
                        {"text": "thinking...", "thought": true},
                        {"text": "Namaste! "},
                        {"text": "Try our Rasmalai."}
                    ]}},
                    {"content": {"parts": [{"text": "ignored"}]}}
                ]
            }"#,
        );
        assert_eq!(recommendation.text, "Namaste! Try our Rasmalai.");
        assert!(recommendation.grounding_links.is_empty());
    }

    #[test]
    fn test_empty_reply_uses_placeholder() {
        assert_eq!(parse("{}").text, EMPTY_REPLY);
        assert_eq!(
            parse(r#"{"candidates": [{"content": {"parts": []}}]}"#).text,
            EMPTY_REPLY
        );
    }

    #[test]
    fn test_grounding_links_with_defaults() {
        let recommendation = parse(
            r#"{
                "candidates": [{
                    "content": {"parts": [{"text": "We are near the crossing."}]},
                    "groundingMetadata": {"groundingChunks": [
                        {"maps": {"title": "New Jyoti Sweets", "uri": "https://maps.google.com/?cid=1"}},
                        {"maps": {"uri": "https://maps.google.com/?cid=2"}},
                        {"web": {"uri": "https://example.org"}}
                    ]}
                }]
            }"#,
        );

        assert_eq!(
            recommendation.grounding_links,
            vec![
                GroundingLink::new("New Jyoti Sweets", "https://maps.google.com/?cid=1"),
                GroundingLink::new(DEFAULT_LINK_TITLE, "https://maps.google.com/?cid=2"),
                GroundingLink::new(DEFAULT_LINK_TITLE, SHOP.google_maps_url),
            ]
        );
    }

    #[test]
    fn test_grounding_links_drop_non_web_uris() {
        let recommendation = parse(
            r#"{
                "candidates": [{
                    "content": {"parts": [{"text": "Find us here."}]},
                    "groundingMetadata": {"groundingChunks": [
                        {"maps": {"title": "Click me", "uri": "javascript:alert(document.cookie)"}},
                        {"maps": {"title": "Also bad", "uri": " JavaScript:alert(1)"}},
                        {"maps": {"title": "Data", "uri": "data:text/html,hi"}},
                        {"maps": {"title": "Plain", "uri": "HTTP://maps.example/jyoti"}}
                    ]}
                }]
            }"#,
        );

        assert_eq!(
            recommendation.grounding_links,
            vec![GroundingLink::new("Plain", "HTTP://maps.example/jyoti")]
        );
        assert_eq!(recommendation.text, "Find us here.");
    }

    #[test]
    fn test_parse_error_body() {
        let err = parse_error_body(
            reqwest::StatusCode::BAD_REQUEST,
            r#"{"error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}}"#
                .to_string(),
        );
        assert_eq!(
            err.to_string(),
            "API error (INVALID_ARGUMENT): API key not valid"
        );

        let err = parse_error_body(reqwest::StatusCode::BAD_GATEWAY, "upstream down".to_string());
        assert!(matches!(err, GeminiError::Api { ref message, .. } if message == "upstream down"));
    }

    #[test]
    fn test_rate_limit_maps_to_recommend_error() {
        assert!(matches!(
            RecommendError::from(GeminiError::RateLimited(30)),
            RecommendError::RateLimited
        ));
        assert!(matches!(
            RecommendError::from(GeminiError::Unauthorized("bad key".to_string())),
            RecommendError::Service(_)
        ));
    }

    #[test]
    fn test_system_prompt_mentions_shop_and_menu() {
        let prompt = render_system_prompt();
        assert!(prompt.contains(SHOP.name));
        assert!(prompt.contains(SHOP.address));
        assert!(prompt.contains("Kaju Katli"));
        assert!(prompt.contains("googleMaps"));
    }
}
