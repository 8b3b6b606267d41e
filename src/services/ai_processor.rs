use crate::models::ProcessingResult;
use crate::services::llm::{ChatMessage, LlmClient};
use crate::services::pipeline_error::PipelineError;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

const RAW_PREFIX_CHARS: usize = 100;

/// Runs the caller's instruction against extracted document text and parses the
/// model's answer as JSON.
pub struct AiProcessor {
    client: Arc<dyn LlmClient>,
    model_name: String,
}

impl AiProcessor {
    pub fn new(client: Arc<dyn LlmClient>, model_name: String) -> Self {
        Self { client, model_name }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Never fails: invocation and parse errors come back as `status=error` results.
    #[tracing::instrument(skip(self, text, instruction), fields(model = %self.model_name))]
    pub async fn process(
        &self,
        document_id: Uuid,
        text: &str,
        instruction: &str,
    ) -> ProcessingResult {
        tracing::info!("Starting AI processing for document_id: {}", document_id);

        match self.structured_output(text, instruction).await {
            Ok(output) => {
                tracing::info!(
                    "Successfully parsed JSON output from AI for doc {}",
                    document_id
                );
                ProcessingResult::success(document_id, &self.model_name, output)
            }
            Err(e) => {
                tracing::warn!("AI processing failed for doc {}: {}", document_id, e);
                ProcessingResult::failure(document_id, &self.model_name, e.to_string())
            }
        }
    }

    async fn structured_output(&self, text: &str, instruction: &str) -> Result<Value, PipelineError> {
        let messages = build_messages(text, instruction);

        let raw = self
            .client
            .complete(&messages)
            .await
            .map_err(|e| PipelineError::AiInvocation(e.to_string()))?;
        tracing::debug!("Received raw response from AI (length: {} chars)", raw.len());

        parse_model_output(&raw)
    }
}

pub fn build_messages(text: &str, instruction: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(instruction),
        ChatMessage::user(format!(
            "Here is the document content to process:\n\n---\n\n{}\n\n---",
            text
        )),
    ]
}

/// Strips surrounding whitespace and a ```json / ``` fence on either end.
pub fn clean_json_output(raw: &str) -> &str {
    let mut cleaned = raw.trim();
    if let Some(rest) = cleaned.strip_prefix("```json") {
        cleaned = rest.trim();
    } else if let Some(rest) = cleaned.strip_prefix("```") {
        cleaned = rest.trim();
    }
    if let Some(rest) = cleaned.strip_suffix("```") {
        cleaned = rest.trim();
    }
    cleaned
}

pub fn parse_model_output(raw: &str) -> Result<Value, PipelineError> {
    let cleaned = clean_json_output(raw);
    serde_json::from_str(cleaned).map_err(|e| {
        let prefix: String = cleaned.chars().take(RAW_PREFIX_CHARS).collect();
        PipelineError::AiOutputInvalid(format!(
            "AI model response was not valid JSON. Parse Error: {}. Raw (cleaned) start: '{}...'",
            e, prefix
        ))
    })
}
