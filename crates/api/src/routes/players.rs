//! Public player directory plus the two thin JSON endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use infra::models::{Role, UserProfileRow};
use infra::pagination::LimitOffset;
use infra::repos::{NewProfile, ProfileFilter, ProfileRepo};

use crate::error::AppError;
use crate::state::AppState;

/// Public projection of a profile; contact details stay private.
#[derive(Debug, Serialize)]
pub struct PlayerPublic {
    pub id: Uuid,
    pub name: String,
    pub role: Role,
    pub city: String,
    pub state: String,
    pub fide_id: Option<String>,
    pub bio: Option<String>,
    pub profile_photo_url: Option<String>,
}

impl From<UserProfileRow> for PlayerPublic {
    fn from(row: UserProfileRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            role: row.role,
            city: row.city,
            state: row.state,
            fide_id: row.fide_id,
            bio: row.bio,
            profile_photo_url: row.profile_photo_url,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct PlayerListQuery {
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /players
pub async fn list_players(
    State(state): State<AppState>,
    Query(query): Query<PlayerListQuery>,
) -> Result<Json<Vec<PlayerPublic>>, AppError> {
    let page = LimitOffset::clamped(query.limit, query.offset);
    let rows = ProfileRepo::new(state.db.clone())
        .list(
            ProfileFilter {
                search: query.search.filter(|s| !s.trim().is_empty()),
            },
            Some(page),
        )
        .await?;

    Ok(Json(rows.into_iter().map(PlayerPublic::from).collect()))
}

/// GET /api/players/:id: thin passthrough profile fetch.
pub async fn get_player(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PlayerPublic>, AppError> {
    let row = ProfileRepo::new(state.db.clone())
        .get(id)
        .await?
        .ok_or(AppError::NotFound("profile"))?;

    Ok(Json(PlayerPublic::from(row)))
}

#[derive(Debug, Deserialize)]
pub struct CreateProfileRequest {
    pub user_id: Uuid,
    pub name: String,
    pub role: Role,
    pub city: String,
    #[serde(default)]
    pub state: String,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateProfileResponse {
    pub success: bool,
}

/// POST /api/profile: thin passthrough create with minimal validation.
pub async fn create_profile(
    State(state): State<AppState>,
    Json(body): Json<CreateProfileRequest>,
) -> Result<Json<CreateProfileResponse>, AppError> {
    if body.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }

    let result = ProfileRepo::new(state.db.clone())
        .create(&NewProfile {
            id: body.user_id,
            name: body.name.trim().to_string(),
            role: body.role,
            city: body.city,
            state: body.state,
            fide_id: None,
            phone: body.phone,
            profile_photo_url: None,
        })
        .await;

    match result {
        Ok(_) => Ok(Json(CreateProfileResponse { success: true })),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::BadRequest(
            "profile already exists".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}
