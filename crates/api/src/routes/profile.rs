//! The signed-in user's own profile page and its edit actions.

use axum::{
    extract::{Multipart, State},
    Extension, Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use infra::models::{DocumentRow, Role, UserProfileRow, UserRegistrationRow};
use infra::repos::{DocumentRepo, NewProfile, ProfileRepo, ProfileUpdate, RegistrationRepo};

use crate::auth::Claims;
use crate::error::AppError;
use crate::services::documents::profile_photo_path;
use crate::services::storage::PROFILE_PHOTOS_BUCKET;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ProfilePageView {
    /// No profile yet: the client routes to the complete-registration flow.
    NeedsProfile,
    Profile {
        profile: UserProfileRow,
        documents: Vec<DocumentRow>,
        registrations: Vec<UserRegistrationRow>,
    },
}

/// GET /profile
pub async fn profile_page(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ProfilePageView>, AppError> {
    let user_id = claims.user_id()?;

    let profile = match ProfileRepo::new(state.db.clone()).get(user_id).await? {
        Some(profile) => profile,
        None => return Ok(Json(ProfilePageView::NeedsProfile)),
    };

    let documents = DocumentRepo::new(state.db.clone())
        .list_for_user(user_id)
        .await?;
    let registrations = RegistrationRepo::new(state.db.clone())
        .list_for_user(user_id)
        .await?;

    Ok(Json(ProfilePageView::Profile {
        profile,
        documents,
        registrations,
    }))
}

#[derive(Debug, Deserialize)]
pub struct CompleteProfileRequest {
    pub name: String,
    pub role: Role,
    pub city: String,
    pub state: String,
    pub fide_id: Option<String>,
    pub phone: Option<String>,
}

/// POST /profile: first registration submission, keyed by the identity
/// subject; resubmission overwrites the same row.
pub async fn complete_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<CompleteProfileRequest>,
) -> Result<Json<UserProfileRow>, AppError> {
    let user_id = claims.user_id()?;

    if body.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }

    let profile = ProfileRepo::new(state.db.clone())
        .upsert(&NewProfile {
            id: user_id,
            name: body.name.trim().to_string(),
            role: body.role,
            city: body.city,
            state: body.state,
            fide_id: body.fide_id.filter(|v| !v.is_empty()),
            phone: body.phone,
            profile_photo_url: None,
        })
        .await?;

    Ok(Json(profile))
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub fide_id: Option<String>,
    pub bio: Option<String>,
}

/// PUT /profile
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<UserProfileRow>, AppError> {
    let user_id = claims.user_id()?;

    let profile = ProfileRepo::new(state.db.clone())
        .update(
            user_id,
            &ProfileUpdate {
                name: body.name,
                city: body.city,
                state: body.state,
                fide_id: body.fide_id,
                bio: body.bio,
            },
        )
        .await?
        .ok_or(AppError::NotFound("profile"))?;

    Ok(Json(profile))
}

/// POST /profile/photo: upload a new photo and replace the public URL
/// reference. The previous blob stays where it is.
pub async fn upload_photo(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    mut multipart: Multipart,
) -> Result<Json<UserProfileRow>, AppError> {
    let user_id = claims.user_id()?;

    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() == Some("file") {
            file = Some(super::read_file_field(field).await?);
        }
    }
    let file = file.ok_or_else(|| {
        AppError::BadRequest("multipart field \"file\" is required".to_string())
    })?;

    let path = profile_photo_path(user_id, &file.filename, Utc::now());
    state
        .storage()
        .upload(PROFILE_PHOTOS_BUCKET, &path, file.bytes, &file.content_type, true)
        .await?;

    let url = state.storage().public_url(PROFILE_PHOTOS_BUCKET, &path);
    let profile = ProfileRepo::new(state.db.clone())
        .set_photo_url(user_id, &url)
        .await?
        .ok_or(AppError::NotFound("profile"))?;

    Ok(Json(profile))
}
