//! One-shot chat host query.

use jyoti_core::{ChatSession, Offline, Recommender};
use jyoti_storefront::config::GeminiConfig;
use jyoti_storefront::services::GeminiClient;

/// Send `message` to the chat host and print the reply with its links.
///
/// Without `GEMINI_API_KEY` the offline recommender answers, which always
/// yields the fallback reply.
///
/// # Errors
///
/// Returns an error if the Gemini configuration is invalid or the HTTP
/// client cannot be built. Recommendation failures are not errors; they
/// produce the fallback reply.
#[allow(clippy::print_stdout)]
pub async fn ask(message: &str) -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let recommender: Box<dyn Recommender> = match GeminiConfig::from_env()? {
        Some(config) => {
            tracing::info!(model = %config.model, "using Gemini");
            Box::new(GeminiClient::new(&config)?)
        }
        None => {
            tracing::warn!("GEMINI_API_KEY not set, using offline recommender");
            Box::new(Offline)
        }
    };

    let mut session = ChatSession::new();
    let Some(reply) = session.send(recommender.as_ref(), message).await else {
        return Err("message is empty".into());
    };

    println!("{}", reply.content);
    for link in &reply.grounding_links {
        println!("  {} <{}>", link.title, link.uri);
    }
    Ok(())
}
