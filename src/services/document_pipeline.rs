use crate::config::UploadConfig;
use crate::models::{ProcessingResult, StoredObject, UploadRequest};
use crate::services::ai_processor::AiProcessor;
use crate::services::pdf_extractor::PdfExtractor;
use crate::services::pipeline_error::PipelineError;
use crate::services::storage::ObjectStore;
use crate::utils::validation::{validate_extension, validate_file_size};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

pub const NO_TEXT_MESSAGE: &str = "No text content could be extracted from the PDF.";
pub const NO_TEXT_NOTE: &str = "PDF contained no extractable text content.";

/// Upload orchestrator: validate, store, extract, process.
///
/// Every stage failure short-circuits into a `status=error` result; nothing escapes
/// as an `Err`. Stored objects are kept even when a later stage fails.
pub struct DocumentPipeline {
    storage: Arc<dyn ObjectStore>,
    extractor: PdfExtractor,
    ai: Option<Arc<AiProcessor>>,
    upload: UploadConfig,
    model_name: String,
}

/// Outcome of the extraction stage
enum Extracted {
    Text(String),
    Empty,
}

impl DocumentPipeline {
    pub fn new(
        storage: Arc<dyn ObjectStore>,
        ai: Option<Arc<AiProcessor>>,
        upload: UploadConfig,
        model_name: String,
    ) -> Self {
        Self {
            extractor: PdfExtractor::new(storage.clone()),
            storage,
            ai,
            upload,
            model_name,
        }
    }

    pub fn ai_available(&self) -> bool {
        self.ai.is_some()
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn upload_config(&self) -> &UploadConfig {
        &self.upload
    }

    /// Result for a request rejected before it could be handed to `process`,
    /// e.g. an upload stream that could not be read.
    pub fn reject(&self, error: PipelineError) -> ProcessingResult {
        tracing::warn!("Rejecting upload: {}", error);
        ProcessingResult::failure(Uuid::new_v4(), &self.model_name, error.to_string())
    }

    #[tracing::instrument(skip(self, request), fields(filename = %request.filename, size = request.data.len()))]
    pub async fn process(&self, request: UploadRequest) -> ProcessingResult {
        // Reported until the store step yields the real id
        let mut document_id = Uuid::new_v4();

        match self.run(request, &mut document_id).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(%document_id, "Document pipeline failed: {}", e);
                ProcessingResult::failure(document_id, &self.model_name, e.to_string())
            }
        }
    }

    async fn run(
        &self,
        request: UploadRequest,
        document_id: &mut Uuid,
    ) -> Result<ProcessingResult, PipelineError> {
        self.validate(&request)?;

        let stored = self.store(&request).await?;
        if let Some(object_id) = stored.object_id() {
            *document_id = object_id;
        }
        tracing::info!(%document_id, locator = %stored.locator, "Document stored");

        let text = match self.extract(&stored).await? {
            Extracted::Text(text) => text,
            Extracted::Empty => {
                return Ok(ProcessingResult {
                    error_message: Some(NO_TEXT_NOTE.to_string()),
                    ..ProcessingResult::success(
                        *document_id,
                        &self.model_name,
                        json!({ "message": NO_TEXT_MESSAGE }),
                    )
                });
            }
        };

        let ai = self.ai.as_ref().ok_or(PipelineError::AiUnavailable)?;
        Ok(ai.process(*document_id, &text, &request.instruction).await)
    }

    fn validate(&self, request: &UploadRequest) -> Result<(), PipelineError> {
        validate_extension(&request.filename, &self.upload.allowed_extensions)?;
        validate_file_size(request.data.len(), self.upload.max_upload_size)?;
        Ok(())
    }

    async fn store(&self, request: &UploadRequest) -> Result<StoredObject, PipelineError> {
        let stored = self
            .storage
            .store(
                request.data.clone(),
                &request.filename,
                request.content_type.as_deref(),
            )
            .await?;
        Ok(stored)
    }

    async fn extract(&self, stored: &StoredObject) -> Result<Extracted, PipelineError> {
        let text = self.extractor.extract(&stored.object_name).await?;
        if text.is_empty() {
            Ok(Extracted::Empty)
        } else {
            Ok(Extracted::Text(text))
        }
    }
}
