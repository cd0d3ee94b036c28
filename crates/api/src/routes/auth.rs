//! Passwordless sign-in flow, fully delegated to the identity collaborator.

use axum::{extract::State, http::HeaderMap, Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::middleware::bearer_token;
use crate::auth::{Claims, SessionTokens};
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    /// Page to return to after the magic link lands; defaults to the root.
    pub redirect: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub sent: bool,
}

/// POST /auth/login: ask the provider to mail a magic link.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let email = body.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::BadRequest("a valid email is required".to_string()));
    }

    let redirect = body.redirect.unwrap_or_else(|| "/".to_string());
    state.identity().send_magic_link(email, &redirect).await?;

    Ok(Json(LoginResponse { sent: true }))
}

#[derive(Debug, Deserialize)]
pub struct CallbackRequest {
    pub code: String,
}

/// POST /auth/callback: exchange the code from the magic-link landing for a
/// session the client keeps.
pub async fn callback(
    State(state): State<AppState>,
    Json(body): Json<CallbackRequest>,
) -> Result<Json<SessionTokens>, AppError> {
    if body.code.trim().is_empty() {
        return Err(AppError::BadRequest("authorization code is required".to_string()));
    }

    let tokens = state.identity().exchange_code(body.code.trim()).await?;
    Ok(Json(tokens))
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: Uuid,
    pub email: String,
}

/// GET /auth/me: the identity behind the presented session token.
pub async fn me(Extension(claims): Extension<Claims>) -> Result<Json<MeResponse>, AppError> {
    Ok(Json(MeResponse {
        id: claims.user_id()?,
        email: claims.email.clone(),
    }))
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub signed_out: bool,
}

/// POST /auth/logout: revoke the caller's session upstream.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<LogoutResponse>, AppError> {
    let token = bearer_token(&headers)?;
    state.identity().sign_out(token).await?;
    Ok(Json(LogoutResponse { signed_out: true }))
}
