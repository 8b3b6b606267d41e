use crate::models::StoredObject;
use crate::utils::validation::storage_extension;
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use thiserror::Error;
use uuid::Uuid;

const DEFAULT_EXTENSION: &str = "pdf";
const DEFAULT_CONTENT_TYPE: &str = "application/pdf";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The backend could not be reached (connection refused, DNS, timeout)
    #[error("Storage service unavailable: {0}")]
    Unavailable(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    /// The backend answered but the operation failed
    #[error("Storage operation failed: {0}")]
    Operation(String),
}

/// Bucket-backed store for uploaded documents
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Creates the bucket if it does not exist yet. Idempotent.
    async fn ensure_bucket(&self) -> Result<(), StorageError>;

    /// Writes the whole payload under a freshly generated object name.
    async fn store(
        &self,
        data: Bytes,
        filename: &str,
        content_type: Option<&str>,
    ) -> Result<StoredObject, StorageError>;

    async fn fetch(&self, object_name: &str) -> Result<Bytes, StorageError>;

    /// Cheap reachability probe. Never fails, returns false on any error.
    async fn health_check(&self) -> bool;
}

/// Random UUID stem plus the original extension, e.g. `3fa8...a6.pdf`
pub fn generate_object_name(filename: &str) -> String {
    format!(
        "{}.{}",
        Uuid::new_v4(),
        storage_extension(filename, DEFAULT_EXTENSION)
    )
}

fn is_transport_failure<E, R>(err: &SdkError<E, R>) -> bool {
    matches!(
        err,
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_)
    )
}

fn classify_sdk_error<E, R>(err: SdkError<E, R>, context: &str) -> StorageError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let message = format!("{}: {}", context, DisplayErrorContext(&err));
    if is_transport_failure(&err) {
        StorageError::Unavailable(message)
    } else {
        StorageError::Operation(message)
    }
}

pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    pub fn new(client: Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn ensure_bucket(&self) -> Result<(), StorageError> {
        match self.client.head_bucket().bucket(&self.bucket).send().await {
            Ok(_) => {
                tracing::info!("✅ Bucket '{}' is ready", self.bucket);
                return Ok(());
            }
            Err(e) if is_transport_failure(&e) => {
                return Err(classify_sdk_error(e, "head_bucket"));
            }
            Err(_) => {
                tracing::info!("🪣 Bucket '{}' not found, creating...", self.bucket);
            }
        }

        match self.client.create_bucket().bucket(&self.bucket).send().await {
            Ok(_) => {
                tracing::info!("✅ Bucket '{}' created successfully", self.bucket);
                Ok(())
            }
            Err(e)
                if e.as_service_error().is_some_and(|se| {
                    se.is_bucket_already_owned_by_you() || se.is_bucket_already_exists()
                }) =>
            {
                Ok(())
            }
            Err(e) => {
                tracing::error!("❌ Failed to create bucket '{}': {}", self.bucket, e);
                Err(classify_sdk_error(e, "create_bucket"))
            }
        }
    }

    async fn store(
        &self,
        data: Bytes,
        filename: &str,
        content_type: Option<&str>,
    ) -> Result<StoredObject, StorageError> {
        let object_name = generate_object_name(filename);
        let size_bytes = data.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&object_name)
            .content_type(content_type.unwrap_or(DEFAULT_CONTENT_TYPE))
            .content_length(size_bytes as i64)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    "S3 put_object failed: bucket={}, key={}, error={}",
                    self.bucket,
                    object_name,
                    DisplayErrorContext(&e)
                );
                classify_sdk_error(e, "put_object")
            })?;

        Ok(StoredObject {
            locator: format!("{}/{}", self.bucket, object_name),
            object_name,
            size_bytes,
        })
    }

    async fn fetch(&self, object_name: &str) -> Result<Bytes, StorageError> {
        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(object_name)
            .send()
            .await
        {
            Ok(output) => output,
            Err(e) if e.as_service_error().is_some_and(|se| se.is_no_such_key()) => {
                return Err(StorageError::NotFound(format!(
                    "PDF object '{}' not found in bucket '{}'.",
                    object_name, self.bucket
                )));
            }
            Err(e) => return Err(classify_sdk_error(e, "get_object")),
        };

        // The body owns the pooled connection; collecting consumes it and dropping it
        // on the error path releases it.
        let data = output.body.collect().await.map_err(|e| {
            StorageError::Unavailable(format!(
                "failed to read body of '{}': {}",
                object_name, e
            ))
        })?;

        Ok(data.into_bytes())
    }

    async fn health_check(&self) -> bool {
        match self.client.head_bucket().bucket(&self.bucket).send().await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("Storage health check failed: {}", DisplayErrorContext(&e));
                false
            }
        }
    }
}
