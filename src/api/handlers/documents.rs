use crate::AppState;
use crate::api::error::AppError;
use crate::config::UploadConfig;
use crate::entities::documents::{self, DocumentStatus};
use crate::utils::validation::ValidationError;
use axum::{
    Json,
    extract::{
        Multipart, Path, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::StatusCode,
};
use bytes::BytesMut;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct DocumentResponse {
    pub id: i32,
    pub filename: String,
    pub status: DocumentStatus,
}

impl From<documents::Model> for DocumentResponse {
    fn from(doc: documents::Model) -> Self {
        Self {
            id: doc.id,
            filename: doc.filename,
            status: doc.status,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub message: String,
    pub id: i32,
    pub filename: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Multipart body accepted by `/upload`
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

#[utoipa::path(
    get,
    path = "/get_files",
    responses(
        (status = 200, description = "All uploaded files", body = [DocumentResponse])
    ),
    tag = "files"
)]
pub async fn get_files(
    State(state): State<AppState>,
) -> Result<Json<Vec<DocumentResponse>>, AppError> {
    let docs = state.document_service.list_documents().await?;
    Ok(Json(docs.into_iter().map(DocumentResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/upload",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File uploaded", body = UploadResponse),
        (status = 400, description = "No file, invalid filename, or file too large", body = ErrorResponse)
    ),
    tag = "files"
)]
pub async fn upload_file(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let mut multipart = multipart.map_err(|e| {
        tracing::debug!("Upload without a multipart body: {}", e);
        AppError::from(ValidationError::no_file())
    })?;

    let mut upload = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, &state.config))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if filename.is_empty() {
            return Err(ValidationError::no_file().into());
        }

        // Stop reading as soon as the limit is crossed instead of buffering the rest.
        let mut data = BytesMut::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| multipart_error(e, &state.config))?
        {
            if data.len() + chunk.len() > state.config.max_file_size {
                return Err(ValidationError::too_large(&state.config.max_file_size_label()).into());
            }
            data.extend_from_slice(&chunk);
        }

        upload = Some((filename, data.freeze()));
        break;
    }

    let (filename, data) = upload.ok_or_else(|| AppError::from(ValidationError::no_file()))?;

    let doc = state
        .document_service
        .upload_document(&filename, &data)
        .await?;

    Ok(Json(UploadResponse {
        message: "File uploaded".to_string(),
        id: doc.id,
        filename: doc.filename,
    }))
}

#[utoipa::path(
    delete,
    path = "/remove/{id}",
    params(
        ("id" = i32, Path, description = "Document ID")
    ),
    responses(
        (status = 200, description = "File removed", body = MessageResponse),
        (status = 404, description = "File not found", body = ErrorResponse)
    ),
    tag = "files"
)]
pub async fn remove_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    // Non-numeric ids can never match a record.
    let id: i32 = id
        .parse()
        .map_err(|_| AppError::NotFound("File not found".to_string()))?;

    let doc = state.document_service.remove_document(id).await?;

    Ok(Json(MessageResponse {
        message: format!("File '{}' removed successfully", doc.filename),
    }))
}

#[utoipa::path(
    post,
    path = "/submit",
    responses(
        (status = 200, description = "All files marked as saved", body = MessageResponse)
    ),
    tag = "files"
)]
pub async fn submit_all(
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, AppError> {
    state.document_service.submit_all().await?;

    Ok(Json(MessageResponse {
        message: "All files marked as saved on server".to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/cancel",
    responses(
        (status = 200, description = "All files removed", body = MessageResponse)
    ),
    tag = "files"
)]
pub async fn cancel_upload(
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, AppError> {
    state.document_service.cancel_all().await?;

    Ok(Json(MessageResponse {
        message: "All uploaded files removed (cancelled)".to_string(),
    }))
}

fn multipart_error(e: MultipartError, config: &UploadConfig) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE
        || e.to_string().contains("length limit exceeded")
    {
        ValidationError::too_large(&config.max_file_size_label()).into()
    } else {
        AppError::BadRequest(e.body_text())
    }
}
