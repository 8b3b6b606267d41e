use crate::config::StorageConfig;
use crate::services::storage::{ObjectStore, S3ObjectStore};
use anyhow::Context;
use aws_sdk_s3::config::{Credentials, Region};
use std::sync::Arc;
use tracing::info;

/// Builds the S3 client for MinIO and makes sure the target bucket exists.
/// A bucket that cannot be confirmed or created aborts startup.
pub async fn setup_storage(config: &StorageConfig) -> anyhow::Result<Arc<S3ObjectStore>> {
    let endpoint_url = config.endpoint_url();
    info!("☁️  S3 Storage: {} (Bucket: {})", endpoint_url, config.bucket);

    let aws_config = aws_config::from_env()
        .endpoint_url(&endpoint_url)
        .region(Region::new(config.region.clone()))
        .credentials_provider(Credentials::new(
            config.access_key.clone(),
            config.secret_key.clone(),
            None,
            None,
            "static",
        ))
        .load()
        .await;

    let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
        .force_path_style(true)
        .build();

    let store = S3ObjectStore::new(aws_sdk_s3::Client::from_conf(s3_config), config.bucket.clone());

    store
        .ensure_bucket()
        .await
        .with_context(|| format!("failed to ensure bucket '{}' exists", config.bucket))?;

    Ok(Arc::new(store))
}
