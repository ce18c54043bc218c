//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use platform::password::HashedPassword;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{chirp::Chirp, refresh_token::RefreshToken, user::User};
use crate::domain::repository::{ChirpRepository, RefreshTokenRepository, UserRepository};
use crate::domain::value_object::{ChirpId, UserId, chirp_body::ChirpBody, email::Email};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed repository for users, refresh tokens and chirps
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Drop every row from the mutable tables (development reset)
    pub async fn reset(&self) -> AuthResult<()> {
        sqlx::query("TRUNCATE refresh_tokens, chirps, users")
            .execute(&self.pool)
            .await?;

        tracing::warn!("All users, chirps and refresh tokens deleted");
        Ok(())
    }
}

/// Map a unique-constraint violation on `users.email` to `EmailTaken`
fn email_conflict(err: sqlx::Error) -> AuthError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => AuthError::EmailTaken,
        _ => err.into(),
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                email,
                password_hash,
                is_chirpy_red,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.email.as_str())
        .bind(user.password_hash.as_phc_string())
        .bind(user.is_chirpy_red)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(email_conflict)?;

        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                email,
                password_hash,
                is_chirpy_red,
                created_at,
                updated_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                email,
                password_hash,
                is_chirpy_red,
                created_at,
                updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn update(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE users SET
                email = $2,
                password_hash = $3,
                updated_at = $4
            WHERE user_id = $1
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.email.as_str())
        .bind(user.password_hash.as_phc_string())
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(email_conflict)?;

        Ok(())
    }

    async fn mark_chirpy_red(&self, user_id: &UserId) -> AuthResult<bool> {
        let updated = sqlx::query(
            r#"
            UPDATE users SET
                is_chirpy_red = TRUE,
                updated_at = NOW()
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated == 1)
    }
}

// ============================================================================
// Refresh Token Repository Implementation
// ============================================================================

impl RefreshTokenRepository for PgAuthRepository {
    async fn insert(&self, token: &RefreshToken) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (
                token,
                user_id,
                expires_at,
                revoked_at,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&token.token)
        .bind(token.user_id.as_uuid())
        .bind(token.expires_at)
        .bind(token.revoked_at)
        .bind(token.created_at)
        .bind(token.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> AuthResult<Option<RefreshToken>> {
        let row = sqlx::query_as::<_, RefreshTokenRow>(
            r#"
            SELECT
                token,
                user_id,
                expires_at,
                revoked_at,
                created_at,
                updated_at
            FROM refresh_tokens
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(RefreshTokenRow::into_refresh_token))
    }

    async fn revoke(&self, token: &str, at: DateTime<Utc>) -> AuthResult<bool> {
        let revoked = sqlx::query(
            r#"
            UPDATE refresh_tokens SET
                revoked_at = $2,
                updated_at = $2
            WHERE token = $1 AND revoked_at IS NULL
            "#,
        )
        .bind(token)
        .bind(at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(revoked == 1)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AuthResult<u64> {
        let deleted = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted)
    }
}

// ============================================================================
// Chirp Repository Implementation
// ============================================================================

impl ChirpRepository for PgAuthRepository {
    async fn create(&self, chirp: &Chirp) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO chirps (
                chirp_id,
                body,
                user_id,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(chirp.chirp_id.as_uuid())
        .bind(chirp.body.as_str())
        .bind(chirp.user_id.as_uuid())
        .bind(chirp.created_at)
        .bind(chirp.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, chirp_id: &ChirpId) -> AuthResult<Option<Chirp>> {
        let row = sqlx::query_as::<_, ChirpRow>(
            r#"
            SELECT
                chirp_id,
                body,
                user_id,
                created_at,
                updated_at
            FROM chirps
            WHERE chirp_id = $1
            "#,
        )
        .bind(chirp_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ChirpRow::into_chirp))
    }

    async fn delete(&self, chirp_id: &ChirpId) -> AuthResult<bool> {
        let deleted = sqlx::query("DELETE FROM chirps WHERE chirp_id = $1")
            .bind(chirp_id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted == 1)
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    email: String,
    password_hash: String,
    is_chirpy_red: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let password_hash = HashedPassword::from_phc_string(self.password_hash)
            .map_err(|e| AuthError::Internal(format!("Invalid password_hash: {}", e)))?;

        Ok(User {
            user_id: UserId::from_uuid(self.user_id),
            email: Email::from_db(self.email),
            password_hash,
            is_chirpy_red: self.is_chirpy_red,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct RefreshTokenRow {
    token: String,
    user_id: Uuid,
    expires_at: DateTime<Utc>,
    revoked_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RefreshTokenRow {
    fn into_refresh_token(self) -> RefreshToken {
        RefreshToken {
            token: self.token,
            user_id: UserId::from_uuid(self.user_id),
            expires_at: self.expires_at,
            revoked_at: self.revoked_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ChirpRow {
    chirp_id: Uuid,
    body: String,
    user_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ChirpRow {
    fn into_chirp(self) -> Chirp {
        Chirp {
            chirp_id: ChirpId::from_uuid(self.chirp_id),
            body: ChirpBody::from_db(self.body),
            user_id: UserId::from_uuid(self.user_id),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
