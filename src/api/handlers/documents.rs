use crate::AppState;
use crate::api::error::AppError;
use crate::models::{ProcessingResult, UploadRequest};
use crate::services::pipeline_error::PipelineError;
use crate::utils::validation::too_large_message;
use axum::{
    Json,
    extract::{Multipart, Path, State, multipart::MultipartError},
    http::StatusCode,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Multipart form accepted by `POST /documents`
#[derive(ToSchema)]
pub struct DocumentUploadForm {
    /// The PDF file to upload and process
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
    /// Instructions for the AI model, including the desired JSON shape
    pub system_prompt: String,
    /// Optional description (metadata only, not used in processing)
    pub description: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct WelcomeResponse {
    pub message: String,
    pub docs: String,
}

/// Why a form never reached the pipeline
enum FormRejection {
    /// Reported as a normal `status=error` result
    Soft(PipelineError),
    /// Rejected at the transport level
    Hard(AppError),
}

fn is_length_limit(err: &MultipartError) -> bool {
    err.status() == StatusCode::PAYLOAD_TOO_LARGE
        || err.to_string().contains("length limit exceeded")
}

async fn read_upload_form(
    mut multipart: Multipart,
    max_upload_size: usize,
) -> Result<UploadRequest, FormRejection> {
    let mut file = None;
    let mut system_prompt = None;
    let mut description = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) if is_length_limit(&e) => {
                return Err(FormRejection::Soft(PipelineError::InvalidInput(
                    too_large_message(max_upload_size),
                )));
            }
            Err(e) => return Err(FormRejection::Hard(AppError::BadRequest(e.to_string()))),
        };

        match field.name().unwrap_or_default() {
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(|s| s.to_string());
                let data = field.bytes().await.map_err(|e| {
                    let error = if is_length_limit(&e) {
                        PipelineError::InvalidInput(too_large_message(max_upload_size))
                    } else {
                        PipelineError::InvalidInput(format!("Error reading uploaded file: {}", e))
                    };
                    FormRejection::Soft(error)
                })?;
                file = Some((filename, content_type, data));
            }
            "system_prompt" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| FormRejection::Hard(AppError::BadRequest(e.to_string())))?;
                system_prompt = Some(text);
            }
            "description" => {
                description = match field.text().await {
                    Ok(text) => Some(text).filter(|d| !d.is_empty()),
                    Err(e) => {
                        tracing::debug!("Ignoring unreadable description field: {}", e);
                        None
                    }
                };
            }
            other => {
                tracing::debug!("Ignoring unexpected form field '{}'", other);
            }
        }
    }

    let (filename, content_type, data) = file.ok_or_else(|| {
        FormRejection::Hard(AppError::BadRequest("Missing required field: file".to_string()))
    })?;
    let instruction = system_prompt.ok_or_else(|| {
        FormRejection::Hard(AppError::BadRequest(
            "Missing required field: system_prompt".to_string(),
        ))
    })?;

    Ok(UploadRequest {
        filename,
        content_type,
        data,
        instruction,
        description,
    })
}

#[utoipa::path(
    post,
    path = "/documents",
    request_body(content = DocumentUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Pipeline outcome; inspect `status` for success or error", body = ProcessingResult),
        (status = 400, description = "Malformed multipart body or missing required field")
    ),
    tag = "documents"
)]
pub async fn upload_document(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ProcessingResult>, AppError> {
    let max_upload_size = state.pipeline.upload_config().max_upload_size;

    let request = match read_upload_form(multipart, max_upload_size).await {
        Ok(request) => request,
        Err(FormRejection::Soft(error)) => return Ok(Json(state.pipeline.reject(error))),
        Err(FormRejection::Hard(error)) => return Err(error),
    };

    if let Some(description) = &request.description {
        tracing::debug!("Upload description received (not persisted): {}", description);
    }

    Ok(Json(state.pipeline.process(request).await))
}

#[utoipa::path(
    get,
    path = "/documents/{document_id}",
    params(
        ("document_id" = Uuid, Path, description = "Document ID")
    ),
    responses(
        (status = 501, description = "Document metadata retrieval is not implemented")
    ),
    tag = "documents"
)]
pub async fn get_document(Path(document_id): Path<Uuid>) -> Result<Json<()>, AppError> {
    tracing::debug!(%document_id, "Metadata lookup requested");
    Err(AppError::NotImplemented(
        "Document metadata retrieval requires database integration (not yet implemented)."
            .to_string(),
    ))
}

#[utoipa::path(
    delete,
    path = "/documents/{document_id}",
    params(
        ("document_id" = Uuid, Path, description = "Document ID")
    ),
    responses(
        (status = 501, description = "Document deletion is not implemented")
    ),
    tag = "documents"
)]
pub async fn delete_document(Path(document_id): Path<Uuid>) -> Result<Json<()>, AppError> {
    tracing::debug!(%document_id, "Deletion requested");
    Err(AppError::NotImplemented(
        "Document deletion requires database and storage integration (not yet implemented)."
            .to_string(),
    ))
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service banner", body = WelcomeResponse)
    ),
    tag = "system"
)]
pub async fn root() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to the PDF AI Pipeline API".to_string(),
        docs: "/swagger-ui".to_string(),
    })
}
