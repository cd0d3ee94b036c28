use sqlx::PgPool;

use crate::auth::{IdentityService, JwtVerifier};
use crate::config::Config;
use crate::services::storage::StorageService;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    jwt: JwtVerifier,
    identity: IdentityService,
    storage: StorageService,
}

impl AppState {
    pub fn new(db: PgPool, config: Config) -> anyhow::Result<Self> {
        // One client, one timeout: every outbound read obeys the same policy.
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        let jwt = JwtVerifier::new(&config.jwt_secret);
        let identity = IdentityService::new(&config, http.clone());
        let storage = StorageService::new(&config, http);

        Ok(Self {
            db,
            config,
            jwt,
            identity,
            storage,
        })
    }

    pub fn jwt(&self) -> &JwtVerifier {
        &self.jwt
    }

    pub fn identity(&self) -> &IdentityService {
        &self.identity
    }

    pub fn storage(&self) -> &StorageService {
        &self.storage
    }
}
