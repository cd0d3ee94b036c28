use sqlx::Result as SqlxResult;
use uuid::Uuid;

use crate::{
    db::Db,
    models::{DocumentRow, DocumentType, Visibility},
};

const DOCUMENT_COLUMNS: &str = r#"id, user_id, type, file_url, visibility, bucket, created_at"#;

#[derive(Debug, Clone)]
pub struct NewDocument {
    pub user_id: Uuid,
    pub doc_type: DocumentType,
    pub file_url: String,
    pub visibility: Visibility,
    pub bucket: String,
}

#[derive(Clone)]
pub struct DocumentRepo {
    pool: Db,
}

impl DocumentRepo {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }

    /// Metadata row for an already-uploaded blob. The blob write must have
    /// succeeded before this runs; a failure here leaves an orphaned blob,
    /// which the caller surfaces rather than retries.
    pub async fn insert(&self, doc: &NewDocument) -> SqlxResult<DocumentRow> {
        sqlx::query_as::<_, DocumentRow>(&format!(
            r#"
            INSERT INTO documents (user_id, type, file_url, visibility, bucket)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {DOCUMENT_COLUMNS}
            "#
        ))
        .bind(doc.user_id)
        .bind(doc.doc_type)
        .bind(&doc.file_url)
        .bind(doc.visibility)
        .bind(&doc.bucket)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn get(&self, id: Uuid) -> SqlxResult<Option<DocumentRow>> {
        sqlx::query_as::<_, DocumentRow>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> SqlxResult<Vec<DocumentRow>> {
        sqlx::query_as::<_, DocumentRow>(&format!(
            r#"
            SELECT {DOCUMENT_COLUMNS}
            FROM documents
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }
}
