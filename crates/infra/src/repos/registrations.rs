use sqlx::Result as SqlxResult;
use uuid::Uuid;

use crate::{
    db::Db,
    models::{RegistrationRow, UserRegistrationRow},
};

const REGISTRATION_COLUMNS: &str = "id, event_id, user_id, category, payment_status, \
     verification_status, payment_screenshot, created_at, updated_at";

#[derive(Clone)]
pub struct RegistrationRepo {
    pool: Db,
}

impl RegistrationRepo {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }

    pub async fn find(&self, event_id: Uuid, user_id: Uuid) -> SqlxResult<Option<RegistrationRow>> {
        sqlx::query_as::<_, RegistrationRow>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM registrations WHERE event_id = $1 AND user_id = $2"
        ))
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Idempotent confirm: the (event_id, user_id) conflict target absorbs a
    /// double submission without touching the existing row. Both statuses
    /// start pending, category defaults to "Open".
    pub async fn confirm(&self, event_id: Uuid, user_id: Uuid, category: &str) -> SqlxResult<()> {
        sqlx::query(
            r#"
            INSERT INTO registrations (event_id, user_id, category, payment_status, verification_status)
            VALUES ($1, $2, $3, 'pending', 'pending')
            ON CONFLICT (event_id, user_id) DO NOTHING
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .bind(category)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// One-directional pending → paid. Returns None when no row matched,
    /// which includes the already-paid case (the guard is in the WHERE).
    pub async fn mark_paid(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        screenshot_path: &str,
    ) -> SqlxResult<Option<RegistrationRow>> {
        sqlx::query_as::<_, RegistrationRow>(&format!(
            r#"
            UPDATE registrations
            SET payment_status = 'paid', payment_screenshot = $3, updated_at = now()
            WHERE event_id = $1 AND user_id = $2 AND payment_status <> 'paid'
            RETURNING {REGISTRATION_COLUMNS}
            "#
        ))
        .bind(event_id)
        .bind(user_id)
        .bind(screenshot_path)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> SqlxResult<Vec<UserRegistrationRow>> {
        sqlx::query_as::<_, UserRegistrationRow>(
            r#"
            SELECT r.event_id,
                   e.name AS event_name,
                   e.location,
                   e.start_date,
                   e.end_date,
                   r.category,
                   r.payment_status,
                   r.verification_status
            FROM registrations r
            JOIN events e ON e.id = r.event_id
            WHERE r.user_id = $1
            ORDER BY e.start_date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }
}
