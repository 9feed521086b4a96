//! User directory repository
//!
//! The directory is reference data for the attendance core: aggregation and
//! the reminder scan only ever see active users, while deactivated users
//! keep their historical responses.

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::error::{TrackerError, TrackerResult};
use crate::models::{CreateUserRequest, User, UserProfile};

/// Hash a password with argon2
pub fn hash_password(password: &str) -> TrackerResult<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| TrackerError::Hashing(e.to_string()))?
        .to_string();
    Ok(hash)
}

/// Verify a password against a stored argon2 hash
pub fn verify_password(password_hash: &str, password: &str) -> TrackerResult<bool> {
    let parsed_hash =
        PasswordHash::new(password_hash).map_err(|e| TrackerError::Hashing(e.to_string()))?;
    let argon2 = Argon2::default();
    Ok(argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user. A duplicate email is a validation error.
    pub async fn create(
        &self,
        payload: &CreateUserRequest,
        is_admin: bool,
    ) -> TrackerResult<UserProfile> {
        info!("Creating new user: {}", payload.email);

        let password_hash = hash_password(&payload.password)?;

        let row = sqlx::query(
            r#"
            INSERT INTO users (email, name, password_hash, is_admin)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, name, is_admin, is_active, created_at
            "#,
        )
        .bind(&payload.email)
        .bind(&payload.name)
        .bind(&password_hash)
        .bind(is_admin)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                TrackerError::Validation(format!("Email already registered: {}", payload.email))
            }
            _ => TrackerError::Database(e),
        })?;

        Ok(UserProfile {
            id: row.get("id"),
            email: row.get("email"),
            name: row.get("name"),
            is_admin: row.get("is_admin"),
            is_active: row.get("is_active"),
            created_at: row.get("created_at"),
        })
    }

    /// Find a user by email, credential hash included, for the external
    /// login collaborator. Emails are compared exactly.
    pub async fn find_by_email(&self, email: &str) -> TrackerResult<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, email, name, password_hash, is_admin, is_active, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| User {
            id: row.get("id"),
            email: row.get("email"),
            name: row.get("name"),
            password_hash: row.get("password_hash"),
            is_admin: row.get("is_admin"),
            is_active: row.get("is_active"),
            created_at: row.get("created_at"),
        }))
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: Uuid) -> TrackerResult<Option<UserProfile>> {
        let row = sqlx::query(
            r#"
            SELECT id, email, name, is_admin, is_active, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| UserProfile {
            id: row.get("id"),
            email: row.get("email"),
            name: row.get("name"),
            is_admin: row.get("is_admin"),
            is_active: row.get("is_active"),
            created_at: row.get("created_at"),
        }))
    }

    /// All users ordered by name (directory listing)
    pub async fn list_all(&self) -> TrackerResult<Vec<UserProfile>> {
        let rows = sqlx::query(
            r#"
            SELECT id, email, name, is_admin, is_active, created_at
            FROM users
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| UserProfile {
                id: row.get("id"),
                email: row.get("email"),
                name: row.get("name"),
                is_admin: row.get("is_admin"),
                is_active: row.get("is_active"),
                created_at: row.get("created_at"),
            })
            .collect())
    }

    /// Active users ordered by name (aggregation and reminder input)
    pub async fn list_active(&self) -> TrackerResult<Vec<UserProfile>> {
        let rows = sqlx::query(
            r#"
            SELECT id, email, name, is_admin, is_active, created_at
            FROM users
            WHERE is_active = TRUE
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| UserProfile {
                id: row.get("id"),
                email: row.get("email"),
                name: row.get("name"),
                is_admin: row.get("is_admin"),
                is_active: row.get("is_active"),
                created_at: row.get("created_at"),
            })
            .collect())
    }

    /// Activate or deactivate a user. Returns false when the user does not
    /// exist. Historical responses are untouched.
    pub async fn set_active(&self, id: Uuid, active: bool) -> TrackerResult<bool> {
        info!("Setting user {} active = {}", id, active);

        let result = sqlx::query("UPDATE users SET is_active = $1 WHERE id = $2")
            .bind(active)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_roundtrip() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password(&hash, "correct horse").unwrap());
        assert!(!verify_password(&hash, "wrong horse").unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let first = hash_password("secret1").unwrap();
        let second = hash_password("secret1").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn verify_rejects_garbage_hash() {
        assert!(verify_password("not-a-phc-string", "secret1").is_err());
    }
}
