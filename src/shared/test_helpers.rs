use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

/// In-memory database with migrations applied.
///
/// A single connection keeps every query in the test on the same in-memory
/// database (each new sqlite::memory: connection is a fresh database).
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("failed to create in-memory pool");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("failed to run migrations");

    pool
}

/// Insert a user directly, returning its id. `credit_score` stays NULL.
pub async fn seed_user(pool: &SqlitePool, name: &str, phone: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO users (name, phone_number, password_hash) VALUES (?, ?, ?) RETURNING userid",
    )
    .bind(name)
    .bind(phone)
    .bind("$argon2id$test-hash")
    .fetch_one(pool)
    .await
    .expect("failed to seed user")
}

pub async fn credit_score_of(pool: &SqlitePool, userid: i64) -> i64 {
    sqlx::query_scalar("SELECT COALESCE(credit_score, 0) FROM users WHERE userid = ?")
        .bind(userid)
        .fetch_one(pool)
        .await
        .expect("failed to read credit score")
}
