use std::time::Duration;

use anyhow::Context;

/// Runtime configuration, collected once at startup from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    /// Base URL of the passwordless identity collaborator.
    pub identity_url: String,
    /// Base URL of the blob storage collaborator.
    pub storage_url: String,
    /// Server-side key for collaborator calls made on our own behalf.
    pub service_key: String,
    /// Shared secret the identity provider signs access tokens with.
    pub jwt_secret: String,
    /// Uniform timeout applied to inbound requests and outbound reads.
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "8".into())
            .parse()
            .context("REQUEST_TIMEOUT_SECS must be a number of seconds")?;

        Ok(Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()
                .context("PORT must be a valid port number")?,
            database_url: std::env::var("DATABASE_URL").context("DATABASE_URL is required")?,
            identity_url: std::env::var("IDENTITY_URL").context("IDENTITY_URL is required")?,
            storage_url: std::env::var("STORAGE_URL").context("STORAGE_URL is required")?,
            service_key: std::env::var("SERVICE_KEY").context("SERVICE_KEY is required")?,
            jwt_secret: std::env::var("JWT_SECRET").context("JWT_SECRET is required")?,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
