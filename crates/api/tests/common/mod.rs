//! Shared fixtures for database-backed handler tests. Collaborator URLs
//! point at an unroutable port, so any test that reaches identity or
//! storage fails loudly instead of silently passing.

use std::time::Duration;

use chrono::{Duration as TokenTtl, NaiveDate, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use sqlx::PgPool;
use uuid::Uuid;

use api::auth::Claims;
use api::config::Config;
use api::AppState;

pub const TEST_JWT_SECRET: &str = "test-secret";

pub fn test_state(pool: PgPool) -> AppState {
    let config = Config {
        port: 0,
        database_url: String::new(),
        identity_url: "http://127.0.0.1:1/auth/v1".to_string(),
        storage_url: "http://127.0.0.1:1/storage/v1".to_string(),
        service_key: "service-key".to_string(),
        jwt_secret: TEST_JWT_SECRET.to_string(),
        request_timeout: Duration::from_secs(8),
    };
    AppState::new(pool, config).expect("state")
}

pub fn claims_for(user_id: Uuid) -> Claims {
    let now = Utc::now();
    Claims {
        sub: user_id.to_string(),
        email: "player@example.org".to_string(),
        iat: now.timestamp(),
        exp: (now + TokenTtl::hours(1)).timestamp(),
    }
}

pub fn bearer_for(user_id: Uuid) -> String {
    let token = encode(
        &Header::default(),
        &claims_for(user_id),
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("sign token");
    format!("Bearer {token}")
}

pub async fn seed_player(pool: &PgPool) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO user_profiles (id, name, role, city, state) \
         VALUES ($1, 'Test Player', 'player', 'Pune', 'Maharashtra')",
    )
    .bind(id)
    .execute(pool)
    .await
    .expect("seed player");
    id
}

pub async fn seed_event(pool: &PgPool, deadline: Option<NaiveDate>) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO events (name, location, start_date, end_date, fee_amount, registration_deadline) \
         VALUES ('District Open', 'Town Hall', '2030-05-01', '2030-05-03', 500, $1) \
         RETURNING id",
    )
    .bind(deadline)
    .fetch_one(pool)
    .await
    .expect("seed event")
}

pub async fn registration_count(pool: &PgPool, event_id: Uuid, user_id: Uuid) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM registrations WHERE event_id = $1 AND user_id = $2")
        .bind(event_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
        .expect("count")
}
