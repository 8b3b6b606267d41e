use crate::services::storage::{ObjectStore, StorageError};
use lopdf::Document;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    StorageUnavailable(String),

    #[error("{0}")]
    Storage(String),

    #[error("PDF '{0}' is encrypted and password protected.")]
    Encrypted(String),

    /// Invalid header, broken xref, or any other structural failure
    #[error("{0}")]
    Corrupt(String),
}

impl From<StorageError> for ExtractionError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(msg) => ExtractionError::NotFound(msg),
            StorageError::Unavailable(msg) => ExtractionError::StorageUnavailable(msg),
            StorageError::Operation(msg) => ExtractionError::Storage(msg),
        }
    }
}

/// Pulls stored PDFs back out of the object store and turns them into plain text.
pub struct PdfExtractor {
    storage: Arc<dyn ObjectStore>,
}

impl PdfExtractor {
    pub fn new(storage: Arc<dyn ObjectStore>) -> Self {
        Self { storage }
    }

    /// Text of every page that has any, in page order, separated by a blank line.
    /// A document without extractable text yields an empty string.
    #[tracing::instrument(skip(self))]
    pub async fn extract(&self, object_name: &str) -> Result<String, ExtractionError> {
        let data = self.storage.fetch(object_name).await.map_err(|e| {
            tracing::warn!("Failed to fetch {} for extraction: {}", object_name, e);
            ExtractionError::from(e)
        })?;
        tracing::debug!("Retrieved {} bytes for {}", data.len(), object_name);

        let name = object_name.to_string();
        let text = tokio::task::spawn_blocking(move || extract_text_from_bytes(&data, &name))
            .await
            .map_err(|e| ExtractionError::Corrupt(format!("extraction task failed: {}", e)))??;

        if text.is_empty() {
            tracing::warn!(
                "No text could be extracted from PDF {} (possibly image-based or empty).",
                object_name
            );
        } else {
            tracing::info!(
                "Successfully extracted ~{} characters from {}.",
                text.len(),
                object_name
            );
        }

        Ok(text)
    }
}

/// Parses `data` as a PDF and joins the trimmed text of each non-empty page.
/// A page whose text cannot be decoded is logged and skipped.
pub fn extract_text_from_bytes(data: &[u8], name: &str) -> Result<String, ExtractionError> {
    let mut doc = Document::load_mem(data).map_err(|e| {
        let err_msg = e.to_string().to_lowercase();
        if err_msg.contains("password") || err_msg.contains("encrypt") || err_msg.contains("decrypt")
        {
            tracing::warn!("PDF {} is encrypted: {}", name, e);
            ExtractionError::Encrypted(name.to_string())
        } else {
            tracing::error!("Failed to read PDF structure for {}: {}", name, e);
            ExtractionError::Corrupt(format!(
                "Failed to read PDF '{}'. It might be corrupted or not a valid PDF. Error: {}",
                name, e
            ))
        }
    })?;

    if doc.is_encrypted() {
        // Only the empty user password is attempted
        doc.decrypt("").map_err(|e| {
            tracing::warn!("PDF {} could not be decrypted: {}", name, e);
            ExtractionError::Encrypted(name.to_string())
        })?;
        tracing::info!("PDF {} was encrypted but decrypted with an empty password.", name);
    }

    let pages = doc.get_pages();
    tracing::debug!("Reading {} pages from {}...", pages.len(), name);

    let mut extracted = Vec::with_capacity(pages.len());
    for page_number in pages.keys() {
        match doc.extract_text(&[*page_number]) {
            Ok(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    extracted.push(text.to_string());
                }
            }
            Err(e) => {
                tracing::warn!(
                    page = page_number,
                    "Could not extract text from page {} of {}: {}",
                    page_number,
                    name,
                    e
                );
            }
        }
    }

    Ok(extracted.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_is_corrupt() {
        let err = extract_text_from_bytes(b"definitely not a pdf", "bad.pdf").unwrap_err();
        match err {
            ExtractionError::Corrupt(msg) => assert!(msg.contains("bad.pdf")),
            other => panic!("expected Corrupt, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_input_is_corrupt() {
        assert!(matches!(
            extract_text_from_bytes(b"", "empty.pdf"),
            Err(ExtractionError::Corrupt(_))
        ));
    }

    #[test]
    fn test_storage_error_mapping() {
        assert_eq!(
            ExtractionError::from(StorageError::NotFound("gone".into())),
            ExtractionError::NotFound("gone".into())
        );
        assert_eq!(
            ExtractionError::from(StorageError::Unavailable("down".into())),
            ExtractionError::StorageUnavailable("down".into())
        );
        assert_eq!(
            ExtractionError::from(StorageError::Operation("denied".into())),
            ExtractionError::Storage("denied".into())
        );
    }
}
