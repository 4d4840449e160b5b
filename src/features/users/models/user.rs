use chrono::NaiveDateTime;
use sqlx::FromRow;

/// Database model for a registered user
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub userid: i64,
    pub name: String,
    pub phone_number: String,
    /// Argon2 PHC string, never the raw credential
    pub password_hash: String,
    pub occupation: Option<String>,
    pub aadhar_verified: i64,
    /// NULL is read as 0; incremented by one per approved report
    pub credit_score: Option<i64>,
    pub created_at: NaiveDateTime,
}

/// Projection used by the public leaderboard-style listing
#[derive(Debug, Clone, FromRow)]
pub struct UserSummary {
    pub userid: i64,
    pub name: String,
    pub credit_score: i64,
}
