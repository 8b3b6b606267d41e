use crate::config::AiConfig;
use crate::services::ai_processor::AiProcessor;
use crate::services::llm::GeminiClient;
use std::sync::Arc;
use tracing::{info, warn};

/// Returns `None` when no API key is configured or the client cannot be built.
/// The service still starts; uploads that reach the AI stage report it as unavailable.
pub fn setup_ai_processor(config: &AiConfig) -> Option<Arc<AiProcessor>> {
    let Some(api_key) = config.api_key.clone() else {
        warn!("⚠️  GOOGLE_API_KEY is not set, AI processing is disabled");
        return None;
    };

    match GeminiClient::new(
        api_key,
        config.model_name.clone(),
        config.temperature,
        config.max_retries,
        config.base_url.clone(),
    ) {
        Ok(client) => {
            info!(
                "🤖 AI model: {} (temperature={}, max_retries={})",
                config.model_name, config.temperature, config.max_retries
            );
            Some(Arc::new(AiProcessor::new(
                Arc::new(client),
                config.model_name.clone(),
            )))
        }
        Err(e) => {
            warn!("⚠️  Failed to initialise AI client, AI processing is disabled: {}", e);
            None
        }
    }
}
