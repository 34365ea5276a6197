//! PostgreSQL adapter for the `users` table.

use async_trait::async_trait;
use registrar_core::types::DbId;
use sqlx::PgPool;

use super::user_repo::UserRepository;
use crate::error::StoreError;
use crate::models::user::{CreateUser, LinkIdentity, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, username, email, name, provider, provider_id, role, created_at, updated_at";

/// Provides lookup and upsert operations for users.
#[derive(Clone)]
pub struct PgUserRepo {
    pool: PgPool,
}

impl PgUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepo {
    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_provider(
        &self,
        provider: &str,
        provider_id: &str,
    ) -> Result<Option<User>, StoreError> {
        let query =
            format!("SELECT {COLUMNS} FROM users WHERE provider = $1 AND provider_id = $2");
        let row = sqlx::query_as::<_, User>(&query)
            .bind(provider)
            .bind(provider_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        let row = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create(&self, input: &CreateUser) -> Result<User, StoreError> {
        let query = format!(
            "INSERT INTO users (username, email, name, provider, provider_id, role)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.name)
            .bind(&input.provider)
            .bind(&input.provider_id)
            .bind(&input.role)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn link_identity(
        &self,
        id: DbId,
        input: &LinkIdentity,
    ) -> Result<Option<User>, StoreError> {
        let query = format!(
            "UPDATE users SET
                name = $2,
                provider = $3,
                provider_id = $4
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.provider)
            .bind(&input.provider_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}
