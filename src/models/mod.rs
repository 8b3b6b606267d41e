use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use utoipa::ToSchema;
use uuid::Uuid;

/// A document submitted for processing, fully buffered in memory.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Bytes,
    /// Instruction handed to the model as its system prompt
    pub instruction: String,
    /// Free-form metadata; accepted but not persisted
    pub description: Option<String>,
}

/// An object written to the store. Never mutated or deleted by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Bucket-qualified path, e.g. `pdfs/<uuid>.pdf`
    pub locator: String,
    /// Key inside the bucket, e.g. `<uuid>.pdf`
    pub object_name: String,
    pub size_bytes: usize,
}

impl StoredObject {
    /// Identifier embedded in the object name. `None` when the stem is not a UUID,
    /// in which case callers fall back to an id of their own.
    pub fn object_id(&self) -> Option<Uuid> {
        let stem = self
            .object_name
            .split('.')
            .next()
            .unwrap_or(&self.object_name);
        Uuid::parse_str(stem).ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    Success,
    Error,
}

/// Single response shape for every terminal state of the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProcessingResult {
    pub document_id: Uuid,
    pub status: ProcessingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub ai_structured_output: Option<Value>,
    pub model_used: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ProcessingResult {
    pub fn success(document_id: Uuid, model_used: &str, output: Value) -> Self {
        Self {
            document_id,
            status: ProcessingStatus::Success,
            ai_structured_output: Some(output),
            model_used: model_used.to_string(),
            error_message: None,
        }
    }

    pub fn failure(document_id: Uuid, model_used: &str, message: impl Into<String>) -> Self {
        Self {
            document_id,
            status: ProcessingStatus::Error,
            ai_structured_output: None,
            model_used: model_used.to_string(),
            error_message: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DependencyStatus {
    Healthy,
    Unhealthy,
    Unavailable,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// "ok" when every dependency is healthy, "degraded" otherwise
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub dependencies: BTreeMap<String, DependencyStatus>,
}
