use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::json;

use crate::config::Config;
use crate::error::AppError;

pub const PROFILE_PHOTOS_BUCKET: &str = "profile-photos";
pub const DOCUMENTS_PUBLIC_BUCKET: &str = "documents-public";
pub const DOCUMENTS_PRIVATE_BUCKET: &str = "documents-private";
pub const PAYMENT_PROOFS_BUCKET: &str = "payment-proofs";

/// Private blobs are viewed through links this short-lived; a fresh one is
/// minted on every view and never stored.
pub const SIGNED_URL_EXPIRY_SECS: u32 = 60;

#[derive(Deserialize)]
struct SignedUrlResponse {
    #[serde(rename = "signedURL")]
    signed_url: String,
}

/// Client for the blob storage collaborator: raw uploads, stable public URLs
/// and time-limited signed URLs.
#[derive(Clone)]
pub struct StorageService {
    base_url: String,
    service_key: String,
    http: HttpClient,
}

impl StorageService {
    pub fn new(config: &Config, http: HttpClient) -> Self {
        Self {
            base_url: config.storage_url.trim_end_matches('/').to_string(),
            service_key: config.service_key.clone(),
            http,
        }
    }

    pub async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        upsert: bool,
    ) -> Result<(), AppError> {
        self.http
            .post(format!("{}/object/{}/{}", self.base_url, bucket, path))
            .bearer_auth(&self.service_key)
            .header("content-type", content_type)
            .header("x-upsert", if upsert { "true" } else { "false" })
            .body(bytes)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Stable, cacheable URL for public-bucket objects. Derived locally, no
    /// round trip.
    pub fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/object/public/{}/{}", self.base_url, bucket, path)
    }

    /// Mint a fresh time-limited URL for a private object.
    pub async fn create_signed_url(
        &self,
        bucket: &str,
        path: &str,
        expires_in_secs: u32,
    ) -> Result<String, AppError> {
        let response = self
            .http
            .post(format!("{}/object/sign/{}/{}", self.base_url, bucket, path))
            .bearer_auth(&self.service_key)
            .json(&json!({ "expiresIn": expires_in_secs }))
            .send()
            .await?
            .error_for_status()?
            .json::<SignedUrlResponse>()
            .await?;

        // The collaborator answers with a path relative to its own root.
        Ok(format!(
            "{}{}",
            self.base_url,
            response.signed_url
        ))
    }
}
