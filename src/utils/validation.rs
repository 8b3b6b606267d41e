use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub code: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Case-insensitive suffix match of the filename against the allowed extensions
pub fn validate_extension(filename: &str, allowed: &[String]) -> Result<(), ValidationError> {
    let lowered = filename.to_lowercase();
    let matches = allowed
        .iter()
        .any(|ext| lowered.ends_with(&format!(".{}", ext.to_lowercase())));

    if !filename.is_empty() && matches {
        return Ok(());
    }

    Err(ValidationError {
        code: "INVALID_FILE_TYPE",
        message: format!(
            "Invalid file type. Only {} files are allowed.",
            allowed.join(", ")
        ),
    })
}

/// Validates file size against maximum limit
pub fn validate_file_size(size: usize, max_size: usize) -> Result<(), ValidationError> {
    if size > max_size {
        return Err(ValidationError {
            code: "FILE_TOO_LARGE",
            message: too_large_message(max_size),
        });
    }
    Ok(())
}

pub fn too_large_message(max_size: usize) -> String {
    format!(
        "File size exceeds maximum allowed ({}MB).",
        max_size / 1024 / 1024
    )
}

/// Extension used for the stored object name, falling back to `default` when the
/// filename has none
pub fn storage_extension(filename: &str, default: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(|e| e.to_lowercase())
        .unwrap_or_else(|| default.to_string())
}
