//! Document upload, listing and retrieval with the two-tier visibility model.

use axum::{
    extract::{Multipart, Path, State},
    Extension, Json,
};
use serde::Serialize;
use uuid::Uuid;

use infra::models::{DocumentRow, DocumentType, Visibility};
use infra::repos::DocumentRepo;

use crate::auth::Claims;
use crate::error::AppError;
use crate::services::documents::{upload_document, UploadedFile};
use crate::services::storage::SIGNED_URL_EXPIRY_SECS;
use crate::state::AppState;

/// POST /documents: multipart with a `type` field and a `file` field.
pub async fn upload(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    mut multipart: Multipart,
) -> Result<Json<DocumentRow>, AppError> {
    let user_id = claims.user_id()?;

    let mut doc_type: Option<DocumentType> = None;
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        match field.name() {
            Some("type") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                doc_type = Some(parse_doc_type(&value)?);
            }
            Some("file") => {
                file = Some(super::read_file_field(field).await?);
            }
            _ => {}
        }
    }

    let doc_type = doc_type
        .ok_or_else(|| AppError::BadRequest("multipart field \"type\" is required".to_string()))?;
    let file = file
        .ok_or_else(|| AppError::BadRequest("multipart field \"file\" is required".to_string()))?;

    let documents = DocumentRepo::new(state.db.clone());
    let row = upload_document(state.storage(), &documents, user_id, doc_type, file).await?;

    Ok(Json(row))
}

fn parse_doc_type(value: &str) -> Result<DocumentType, AppError> {
    match value {
        "dob" => Ok(DocumentType::Dob),
        "certificate" => Ok(DocumentType::Certificate),
        other => Err(AppError::BadRequest(format!(
            "unknown document type \"{other}\""
        ))),
    }
}

/// GET /documents: the caller's documents, newest first.
pub async fn list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<DocumentRow>>, AppError> {
    let user_id = claims.user_id()?;
    let rows = DocumentRepo::new(state.db.clone())
        .list_for_user(user_id)
        .await?;
    Ok(Json(rows))
}

#[derive(Debug, Serialize)]
pub struct DocumentUrl {
    pub url: String,
    pub visibility: Visibility,
    /// Present for private documents only; the link dies after this window.
    pub expires_in: Option<u32>,
}

/// GET /documents/:id/url: public documents get their stable URL; private
/// ones get a freshly minted signed URL on every call, never a stored one.
pub async fn document_url(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<DocumentUrl>, AppError> {
    let user_id = claims.user_id()?;

    let doc = DocumentRepo::new(state.db.clone())
        .get(id)
        .await?
        .filter(|d| d.user_id == user_id)
        .ok_or(AppError::NotFound("document"))?;

    let response = match doc.visibility {
        Visibility::Public => DocumentUrl {
            url: state.storage().public_url(&doc.bucket, &doc.file_url),
            visibility: Visibility::Public,
            expires_in: None,
        },
        Visibility::Private => DocumentUrl {
            url: state
                .storage()
                .create_signed_url(&doc.bucket, &doc.file_url, SIGNED_URL_EXPIRY_SECS)
                .await?,
            visibility: Visibility::Private,
            expires_in: Some(SIGNED_URL_EXPIRY_SECS),
        },
    };

    Ok(Json(response))
}
