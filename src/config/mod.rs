use std::env;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Object storage connection settings (MinIO or any S3-compatible backend)
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Endpoint, with or without scheme (default: "localhost:9000")
    pub endpoint: String,

    pub access_key: String,

    pub secret_key: String,

    /// Bucket holding uploaded documents (default: "pdfs")
    pub bucket: String,

    /// Use https when the endpoint carries no scheme (default: false)
    pub secure: bool,

    /// Signing region (default: "us-east-1")
    pub region: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            endpoint: "localhost:9000".to_string(),
            access_key: "minioadmin".to_string(),
            secret_key: "minioadmin123".to_string(),
            bucket: "pdfs".to_string(),
            secure: false,
            region: "us-east-1".to_string(),
        }
    }
}

impl StorageConfig {
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            endpoint: env::var("MINIO_ENDPOINT").unwrap_or(default.endpoint),
            access_key: env::var("MINIO_ACCESS_KEY").unwrap_or(default.access_key),
            secret_key: env::var("MINIO_SECRET_KEY").unwrap_or(default.secret_key),
            bucket: env::var("MINIO_BUCKET_NAME").unwrap_or(default.bucket),
            secure: env::var("MINIO_SECURE")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(default.secure),
            region: env::var("MINIO_REGION").unwrap_or(default.region),
        }
    }

    /// Endpoint as a full URL, adding the scheme implied by `secure` when missing
    pub fn endpoint_url(&self) -> String {
        if self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://") {
            return self.endpoint.clone();
        }
        let scheme = if self.secure { "https" } else { "http" };
        format!("{}://{}", scheme, self.endpoint)
    }
}

/// Upload validation settings
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Maximum file size in bytes (default: 10 MB)
    pub max_upload_size: usize,

    /// Allowed filename extensions, lowercase, without the dot (default: ["pdf"])
    pub allowed_extensions: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_upload_size: 10 * 1024 * 1024, // 10 MB
            allowed_extensions: vec!["pdf".to_string()],
        }
    }
}

impl UploadConfig {
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            max_upload_size: env::var("MAX_UPLOAD_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_upload_size),

            allowed_extensions: env::var("ALLOWED_EXTENSIONS")
                .ok()
                .map(|v| parse_extensions(&v))
                .filter(|exts| !exts.is_empty())
                .unwrap_or(default.allowed_extensions),
        }
    }
}

fn parse_extensions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_start_matches('.').to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// LLM backend settings
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// Credential for the LLM backend. When absent the AI capability is unavailable.
    pub api_key: Option<String>,

    /// Model identifier (default: "gemini-2.0-flash")
    pub model_name: String,

    /// Sampling temperature (default: 0.9)
    pub temperature: f32,

    /// Retries performed by the LLM client on transient failures (default: 2)
    pub max_retries: u32,

    pub base_url: String,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model_name: "gemini-2.0-flash".to_string(),
            temperature: 0.9,
            max_retries: 2,
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        }
    }
}

impl AiConfig {
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            api_key: env::var("GOOGLE_API_KEY")
                .ok()
                .filter(|v| !v.trim().is_empty()),

            model_name: env::var("AI_MODEL_NAME").unwrap_or(default.model_name),

            temperature: env::var("AI_TEMPERATURE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.temperature),

            max_retries: env::var("AI_MAX_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_retries),

            base_url: env::var("AI_API_BASE_URL").unwrap_or(default.base_url),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub upload: UploadConfig,
    pub ai: AiConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            storage: StorageConfig::from_env(),
            upload: UploadConfig::from_env(),
            ai: AiConfig::from_env(),
        }
    }

    /// Create config for development and tests (local MinIO, small retry budget)
    pub fn development() -> Self {
        Self {
            storage: StorageConfig::default(),
            upload: UploadConfig::default(),
            ai: AiConfig {
                api_key: Some("development-key".to_string()),
                max_retries: 0,
                ..AiConfig::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.upload.max_upload_size, 10 * 1024 * 1024);
        assert_eq!(config.upload.allowed_extensions, vec!["pdf".to_string()]);
        assert_eq!(config.storage.bucket, "pdfs");
        assert!(config.ai.api_key.is_none());
        assert_eq!(config.ai.model_name, "gemini-2.0-flash");
        assert_eq!(config.ai.max_retries, 2);
    }

    #[test]
    fn test_development_config() {
        let config = AppConfig::development();
        assert!(config.ai.api_key.is_some());
        assert_eq!(config.ai.max_retries, 0);
    }

    #[test]
    fn test_endpoint_url() {
        let mut config = StorageConfig::default();
        assert_eq!(config.endpoint_url(), "http://localhost:9000");

        config.secure = true;
        assert_eq!(config.endpoint_url(), "https://localhost:9000");

        config.endpoint = "http://minio:9000".to_string();
        assert_eq!(config.endpoint_url(), "http://minio:9000");
    }

    #[test]
    fn test_parse_extensions() {
        assert_eq!(parse_extensions("pdf, .PDF ,docx,"), vec!["pdf", "pdf", "docx"]);
        assert!(parse_extensions(" , ").is_empty());
    }
}
