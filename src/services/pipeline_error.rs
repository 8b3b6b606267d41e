use crate::services::pdf_extractor::ExtractionError;
use crate::services::storage::StorageError;
use crate::utils::validation::ValidationError;
use thiserror::Error;

/// Every way a document can fail to make it through the pipeline.
/// The `Display` text is what callers see as `error_message`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// Bad extension, oversized payload, unreadable upload stream
    #[error("{0}")]
    InvalidInput(String),

    #[error("Storage Error: {0}")]
    StorageUnavailable(String),

    #[error("Storage Error: {0}")]
    Storage(String),

    #[error("Failed to find stored PDF for extraction: {0}")]
    NotFound(String),

    /// Backend unreachable while fetching the stored PDF back
    #[error("Storage error during extraction: {0}")]
    FetchUnavailable(String),

    #[error("Storage error during extraction: {0}")]
    Fetch(String),

    #[error("Failed to extract text from PDF: {0}")]
    Extraction(String),

    #[error("AI processing service is not available (configuration error?). Check server logs.")]
    AiUnavailable,

    #[error("Failed to get response from AI model: {0}")]
    AiInvocation(String),

    #[error("{0}")]
    AiOutputInvalid(String),
}

impl From<ValidationError> for PipelineError {
    fn from(err: ValidationError) -> Self {
        PipelineError::InvalidInput(err.message)
    }
}

impl From<StorageError> for PipelineError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Unavailable(_) => PipelineError::StorageUnavailable(err.to_string()),
            StorageError::NotFound(_) | StorageError::Operation(_) => {
                PipelineError::Storage(err.to_string())
            }
        }
    }
}

impl From<ExtractionError> for PipelineError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::NotFound(msg) => PipelineError::NotFound(msg),
            ExtractionError::StorageUnavailable(msg) => PipelineError::FetchUnavailable(msg),
            ExtractionError::Storage(msg) => PipelineError::Fetch(msg),
            ExtractionError::Encrypted(_) | ExtractionError::Corrupt(_) => {
                PipelineError::Extraction(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_messages() {
        let err = PipelineError::from(StorageError::Unavailable("connection refused".into()));
        assert_eq!(
            err.to_string(),
            "Storage Error: Storage service unavailable: connection refused"
        );
    }

    #[test]
    fn test_extraction_messages() {
        let err = PipelineError::from(ExtractionError::Encrypted("a.pdf".into()));
        assert_eq!(
            err.to_string(),
            "Failed to extract text from PDF: PDF 'a.pdf' is encrypted and password protected."
        );

        let err = PipelineError::from(ExtractionError::StorageUnavailable("connection refused".into()));
        assert_eq!(
            err.to_string(),
            "Storage error during extraction: connection refused"
        );

        let err = PipelineError::from(ExtractionError::Storage("access denied".into()));
        assert_eq!(err.to_string(), "Storage error during extraction: access denied");

        let err = PipelineError::from(ExtractionError::NotFound("missing".into()));
        assert_eq!(
            err.to_string(),
            "Failed to find stored PDF for extraction: missing"
        );
    }
}
