use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use infra::models::EventRow;
use infra::pagination::LimitOffset;
use infra::repos::EventRepo;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize, Default)]
pub struct EventListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /events: upcoming events, soonest first.
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventListQuery>,
) -> Result<Json<Vec<EventRow>>, AppError> {
    let page = LimitOffset::clamped(query.limit, query.offset);
    let today = Utc::now().date_naive();

    let events = EventRepo::new(state.db.clone())
        .list_upcoming(today, Some(page))
        .await?;

    Ok(Json(events))
}

/// GET /events/:id: detail, or the terminal not-found view.
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EventRow>, AppError> {
    let event = EventRepo::new(state.db.clone())
        .get(id)
        .await?
        .ok_or(AppError::NotFound("event"))?;

    Ok(Json(event))
}
