use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub type Db = PgPool;

pub async fn connect(url: &str) -> Result<Db, sqlx::Error> {
    PgPoolOptions::new().max_connections(8).connect(url).await
}

/// Quick round-trip used by the health endpoint.
pub async fn ping(pool: &Db) -> Result<(), sqlx::Error> {
    let _: i32 = sqlx::query_scalar("SELECT 1").fetch_one(pool).await?;
    Ok(())
}
