//! Document workflow: deterministic placement, collision-free paths, MIME
//! gate, then blob write followed by the metadata row.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use infra::models::{DocumentRow, DocumentType, Visibility};
use infra::repos::{DocumentRepo, NewDocument};

use crate::error::AppError;
use crate::services::storage::{
    StorageService, DOCUMENTS_PRIVATE_BUCKET, DOCUMENTS_PUBLIC_BUCKET,
};

/// Advisory client-side gate; the store enforces its own accepted types.
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "image/jpeg",
    "image/jpg",
    "image/png",
];

pub fn is_allowed_mime(content_type: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&content_type)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub bucket: &'static str,
    pub visibility: Visibility,
}

/// Bucket and visibility follow from the declared type alone: certificates
/// are public, everything else is organizer-only.
pub fn placement(doc_type: DocumentType) -> Placement {
    match doc_type {
        DocumentType::Certificate => Placement {
            bucket: DOCUMENTS_PUBLIC_BUCKET,
            visibility: Visibility::Public,
        },
        DocumentType::Dob => Placement {
            bucket: DOCUMENTS_PRIVATE_BUCKET,
            visibility: Visibility::Private,
        },
    }
}

/// `{user}/{type}/{timestamp}-{filename}`: repeated uploads of a same-named
/// file land on distinct paths.
pub fn document_path(
    user_id: Uuid,
    doc_type: DocumentType,
    filename: &str,
    now: DateTime<Utc>,
) -> String {
    format!(
        "{}/{}/{}-{}",
        user_id,
        doc_type.as_str(),
        now.timestamp_millis(),
        filename
    )
}

pub fn payment_proof_path(
    user_id: Uuid,
    event_id: Uuid,
    filename: &str,
    now: DateTime<Utc>,
) -> String {
    format!(
        "{}/{}/{}-{}",
        user_id,
        event_id,
        now.timestamp_millis(),
        filename
    )
}

pub fn profile_photo_path(user_id: Uuid, filename: &str, now: DateTime<Utc>) -> String {
    format!("{}/{}-{}", user_id, now.timestamp_millis(), filename)
}

/// A file lifted out of a multipart request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Rejects disallowed types before anything touches the network.
    pub fn ensure_allowed(&self) -> Result<(), AppError> {
        if is_allowed_mime(&self.content_type) {
            Ok(())
        } else {
            Err(AppError::UnsupportedFile(self.filename.clone()))
        }
    }
}

/// Blob first, metadata second. A failed blob write aborts before the insert;
/// a failed insert after a successful write surfaces the error and leaves the
/// orphaned blob in place.
pub async fn upload_document(
    storage: &StorageService,
    documents: &DocumentRepo,
    user_id: Uuid,
    doc_type: DocumentType,
    file: UploadedFile,
) -> Result<DocumentRow, AppError> {
    file.ensure_allowed()?;

    let place = placement(doc_type);
    let path = document_path(user_id, doc_type, &file.filename, Utc::now());

    storage
        .upload(place.bucket, &path, file.bytes, &file.content_type, false)
        .await?;

    let row = documents
        .insert(&NewDocument {
            user_id,
            doc_type,
            file_url: path,
            visibility: place.visibility,
            bucket: place.bucket.to_string(),
        })
        .await?;

    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn certificates_are_public_everything_else_private() {
        let cert = placement(DocumentType::Certificate);
        assert_eq!(cert.bucket, DOCUMENTS_PUBLIC_BUCKET);
        assert_eq!(cert.visibility, Visibility::Public);

        let dob = placement(DocumentType::Dob);
        assert_eq!(dob.bucket, DOCUMENTS_PRIVATE_BUCKET);
        assert_eq!(dob.visibility, Visibility::Private);
    }

    #[test]
    fn paths_are_namespaced_and_timestamped() {
        let user = Uuid::parse_str("6dd50bf2-58a5-4b28-9f65-1a9f2f0d2a01").unwrap();
        let event = Uuid::parse_str("4a7a15c4-9a7e-4c89-bb1e-df32a18adfab").unwrap();
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 10, 30, 0).unwrap();

        assert_eq!(
            document_path(user, DocumentType::Dob, "birth.pdf", now),
            format!("{user}/dob/{}-birth.pdf", now.timestamp_millis())
        );
        assert_eq!(
            payment_proof_path(user, event, "upi.png", now),
            format!("{user}/{event}/{}-upi.png", now.timestamp_millis())
        );
        assert_eq!(
            profile_photo_path(user, "me.jpg", now),
            format!("{user}/{}-me.jpg", now.timestamp_millis())
        );
    }

    #[test]
    fn same_name_different_instant_means_different_path() {
        let user = Uuid::new_v4();
        let t1 = Utc.with_ymd_and_hms(2026, 3, 1, 10, 30, 0).unwrap();
        let t2 = t1 + chrono::Duration::milliseconds(1);
        assert_ne!(
            document_path(user, DocumentType::Certificate, "cert.pdf", t1),
            document_path(user, DocumentType::Certificate, "cert.pdf", t2)
        );
    }

    #[test]
    fn mime_gate_names_the_offending_file() {
        let file = UploadedFile {
            filename: "notes.docx".to_string(),
            content_type: "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
                .to_string(),
            bytes: vec![0u8; 4],
        };
        let err = file.ensure_allowed().unwrap_err();
        assert!(err.to_string().contains("notes.docx"));

        for ct in ALLOWED_MIME_TYPES {
            let file = UploadedFile {
                filename: "ok".to_string(),
                content_type: ct.to_string(),
                bytes: vec![],
            };
            assert!(file.ensure_allowed().is_ok());
        }
    }
}
