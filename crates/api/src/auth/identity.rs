use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppError;

/// Session returned by the identity collaborator after a code exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTokens {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub refresh_token: String,
    pub user: IdentityUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityUser {
    pub id: Uuid,
    pub email: Option<String>,
}

/// Client for the passwordless identity collaborator. Credentials never live
/// here: we ask it to mail a sign-in link, exchange the returned code for a
/// session, and revoke sessions on logout.
#[derive(Clone)]
pub struct IdentityService {
    base_url: String,
    service_key: String,
    http: HttpClient,
}

impl IdentityService {
    pub fn new(config: &Config, http: HttpClient) -> Self {
        Self {
            base_url: config.identity_url.trim_end_matches('/').to_string(),
            service_key: config.service_key.clone(),
            http,
        }
    }

    /// Ask the provider to email a magic link that lands on `redirect_to`.
    pub async fn send_magic_link(&self, email: &str, redirect_to: &str) -> Result<(), AppError> {
        self.http
            .post(format!("{}/otp", self.base_url))
            .bearer_auth(&self.service_key)
            .json(&json!({
                "email": email,
                "create_user": true,
                "redirect_to": redirect_to,
            }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Exchange the authorization code from the magic-link landing for a session.
    pub async fn exchange_code(&self, code: &str) -> Result<SessionTokens, AppError> {
        let tokens = self
            .http
            .post(format!("{}/token?grant_type=pkce", self.base_url))
            .bearer_auth(&self.service_key)
            .json(&json!({ "auth_code": code }))
            .send()
            .await?
            .error_for_status()?
            .json::<SessionTokens>()
            .await?;
        Ok(tokens)
    }

    /// Revoke the caller's session upstream. Local state holds nothing to clear.
    pub async fn sign_out(&self, access_token: &str) -> Result<(), AppError> {
        self.http
            .post(format!("{}/logout", self.base_url))
            .bearer_auth(access_token)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
