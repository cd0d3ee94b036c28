pub mod auth;
pub mod documents;
pub mod events;
pub mod players;
pub mod profile;
pub mod registrations;

use axum::extract::multipart::Field;

use crate::error::AppError;
use crate::services::documents::UploadedFile;

/// Lift one multipart field into memory. Filename and content type are
/// required; the MIME gate runs later, before any network call.
pub(crate) async fn read_file_field(field: Field<'_>) -> Result<UploadedFile, AppError> {
    let filename = field
        .file_name()
        .map(str::to_string)
        .ok_or_else(|| AppError::BadRequest("file field is missing a filename".to_string()))?;
    let content_type = field
        .content_type()
        .map(str::to_string)
        .ok_or_else(|| AppError::BadRequest("file field is missing a content type".to_string()))?;
    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(format!("failed to read upload: {e}")))?
        .to_vec();

    Ok(UploadedFile {
        filename,
        content_type,
        bytes,
    })
}
