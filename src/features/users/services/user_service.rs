use sqlx::SqlitePool;

use crate::core::error::{AppError, Result};
use crate::features::users::dtos::{
    LoginDto, LoginResponseDto, RegisterUserDto, UserCreatedDto, UserSummaryDto,
};
use crate::features::users::models::{User, UserSummary};
use crate::features::users::services::password;

/// Service for registration, login and the credit-score listing
pub struct UserService {
    pool: SqlitePool,
}

impl UserService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Register a new user. The phone number is the unique key.
    pub async fn register(&self, dto: RegisterUserDto) -> Result<UserCreatedDto> {
        let password_hash = password::hash_password(dto.password).await?;

        let userid: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (name, phone_number, password_hash)
            VALUES (?, ?, ?)
            RETURNING userid
            "#,
        )
        .bind(&dto.name)
        .bind(&dto.phone)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(|db| db.is_unique_violation())
            {
                AppError::Conflict(format!(
                    "A user with phone number '{}' already exists",
                    dto.phone
                ))
            } else {
                AppError::Database(e)
            }
        })?;

        tracing::info!("User registered: userid={}", userid);

        Ok(UserCreatedDto {
            userid,
            name: dto.name,
        })
    }

    /// Verify credentials against the stored argon2 hash.
    ///
    /// Unknown phone and wrong password produce the same error so the
    /// endpoint does not reveal which accounts exist.
    pub async fn login(&self, dto: LoginDto) -> Result<LoginResponseDto> {
        let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE phone_number = ?")
            .bind(&dto.phone)
            .fetch_optional(&self.pool)
            .await?;

        let Some(user) = user else {
            return Err(AppError::Unauthorized(
                "Invalid phone number or password".to_string(),
            ));
        };

        let userid = user.userid;
        if !password::verify_password(dto.password, user.password_hash).await? {
            return Err(AppError::Unauthorized(
                "Invalid phone number or password".to_string(),
            ));
        }

        Ok(LoginResponseDto { userid })
    }

    /// All users with their credit scores, highest first. NULL scores read as 0.
    pub async fn list(&self) -> Result<Vec<UserSummaryDto>> {
        let users: Vec<UserSummary> = sqlx::query_as(
            r#"
            SELECT userid, name, COALESCE(credit_score, 0) AS credit_score
            FROM users
            ORDER BY credit_score DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users.into_iter().map(UserSummaryDto::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::create_test_pool;

    fn register_dto(name: &str, phone: &str) -> RegisterUserDto {
        RegisterUserDto {
            name: name.to_string(),
            phone: phone.to_string(),
            password: "hunter2hunter2".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let pool = create_test_pool().await;
        let service = UserService::new(pool);

        let created = service.register(register_dto("Asha", "9990001111")).await.unwrap();
        assert_eq!(created.name, "Asha");

        let login = service
            .login(LoginDto {
                phone: "9990001111".to_string(),
                password: "hunter2hunter2".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(login.userid, created.userid);
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_unauthorized() {
        let pool = create_test_pool().await;
        let service = UserService::new(pool);

        service.register(register_dto("Asha", "9990001111")).await.unwrap();

        let err = service
            .login(LoginDto {
                phone: "9990001111".to_string(),
                password: "not the password".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_login_unknown_phone_is_unauthorized() {
        let pool = create_test_pool().await;
        let service = UserService::new(pool);

        let err = service
            .login(LoginDto {
                phone: "0000000000".to_string(),
                password: "whatever123".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_duplicate_phone_is_conflict() {
        let pool = create_test_pool().await;
        let service = UserService::new(pool);

        service.register(register_dto("Asha", "9990001111")).await.unwrap();
        let err = service
            .register(register_dto("Binod", "9990001111"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_list_sorted_by_credit_desc_with_null_as_zero() {
        let pool = create_test_pool().await;
        let service = UserService::new(pool.clone());

        let low = crate::shared::test_helpers::seed_user(&pool, "Low", "1110000001").await;
        let high = crate::shared::test_helpers::seed_user(&pool, "High", "1110000002").await;
        sqlx::query("UPDATE users SET credit_score = 5 WHERE userid = ?")
            .bind(high)
            .execute(&pool)
            .await
            .unwrap();

        let users = service.list().await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].userid, high);
        assert_eq!(users[0].credit_score, 5);
        assert_eq!(users[1].userid, low);
        assert_eq!(users[1].credit_score, 0);
    }
}
