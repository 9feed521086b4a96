//! Schema bootstrap and seed data
//!
//! Tables are created in-process on startup so the service can run against
//! a fresh database. Seeding is first-writer-wins: existing location names
//! and the admin email are left untouched.

use sqlx::PgPool;
use tracing::info;

use common::error::{DatabaseError, DatabaseResult};

use crate::error::TrackerResult;
use crate::models::CreateUserRequest;
use crate::repositories::{LocationRepository, UserRepository};

/// The fixed location catalog shipped with the service
pub const DEFAULT_LOCATIONS: &[(&str, &str, &str)] = &[
    ("HSR Office", "🏢", "#4CAF50"),
    ("MDP Office", "🏛️", "#2196F3"),
    ("Intuit Office", "🏭", "#FF9800"),
    ("Work From Home", "🏠", "#9C27B0"),
    ("Day Off", "🌴", "#F44336"),
];

const ADMIN_EMAIL: &str = "admin@company.com";

/// Create the four relations and the response indexes if they are missing
pub async fn init_schema(pool: &PgPool) -> DatabaseResult<()> {
    info!("Initializing database schema");

    let statements = [
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            email TEXT UNIQUE NOT NULL,
            name TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            is_admin BOOLEAN NOT NULL DEFAULT FALSE,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS locations (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name TEXT UNIQUE NOT NULL,
            emoji TEXT NOT NULL,
            color TEXT NOT NULL,
            is_active BOOLEAN NOT NULL DEFAULT TRUE
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS responses (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id UUID NOT NULL REFERENCES users(id),
            location_id UUID NOT NULL REFERENCES locations(id),
            date DATE NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            UNIQUE (user_id, date)
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS notifications (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id UUID REFERENCES users(id),
            kind TEXT NOT NULL,
            sent_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
        "CREATE INDEX IF NOT EXISTS idx_responses_date ON responses(date)",
        "CREATE INDEX IF NOT EXISTS idx_responses_user_date ON responses(user_id, date)",
    ];

    for statement in statements {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| DatabaseError::Schema(e.to_string()))?;
    }

    info!("Database schema ready");
    Ok(())
}

/// Seed the default location catalog and the admin account
pub async fn seed_defaults(
    locations: &LocationRepository,
    users: &UserRepository,
) -> TrackerResult<()> {
    for (name, emoji, color) in DEFAULT_LOCATIONS {
        locations.seed(name, emoji, color).await?;
    }

    if users.find_by_email(ADMIN_EMAIL).await?.is_none() {
        let admin = CreateUserRequest {
            email: ADMIN_EMAIL.to_string(),
            name: "Admin User".to_string(),
            password: "admin123".to_string(),
        };
        users.create(&admin, true).await?;
        info!("Seeded default admin user {}", ADMIN_EMAIL);
    }

    Ok(())
}
