use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::state::AppState;

pub struct AuthMiddleware;

impl AuthMiddleware {
    /// Verifies the bearer token and stores the claims in request extensions
    /// for the handlers behind it.
    pub async fn require_auth(
        State(state): State<AppState>,
        mut request: Request,
        next: Next,
    ) -> Result<Response, AppError> {
        let auth_header = request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|header| header.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("missing authorization header".to_string()))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Unauthorized("invalid authorization header format".to_string())
        })?;

        let claims = state.jwt().verify_token(token)?;
        request.extensions_mut().insert(claims);

        Ok(next.run(request).await)
    }
}

/// The raw token is needed again when revoking the upstream session.
pub fn bearer_token(request_headers: &axum::http::HeaderMap) -> Result<&str, AppError> {
    request_headers
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("missing authorization header".to_string()))
}
