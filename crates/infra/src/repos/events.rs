use chrono::NaiveDate;
use sqlx::Result as SqlxResult;
use uuid::Uuid;

use crate::{db::Db, models::EventRow, pagination::LimitOffset};

const EVENT_COLUMNS: &str = "id, name, location, start_date, end_date, start_time, end_time, \
     fee_amount, organizer, support_whatsapp, description, rules_link, image_url, \
     registration_deadline, created_at, updated_at";

#[derive(Clone)]
pub struct EventRepo {
    pool: Db,
}

impl EventRepo {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: Uuid) -> SqlxResult<Option<EventRow>> {
        sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Events ending on or after `from`, soonest first.
    pub async fn list_upcoming(
        &self,
        from: NaiveDate,
        page: Option<LimitOffset>,
    ) -> SqlxResult<Vec<EventRow>> {
        let page = page.unwrap_or_default();

        sqlx::query_as::<_, EventRow>(&format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM events
            WHERE end_date >= $1
            ORDER BY start_date ASC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(from)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await
    }
}
