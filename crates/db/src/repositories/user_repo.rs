//! Persistence port for OAuth2-linked users.

use async_trait::async_trait;
use registrar_core::types::DbId;

use crate::error::StoreError;
use crate::models::user::{CreateUser, LinkIdentity, User};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, StoreError>;

    /// Find a user by provider registration id and provider subject id.
    async fn find_by_provider(
        &self,
        provider: &str,
        provider_id: &str,
    ) -> Result<Option<User>, StoreError>;

    /// Find a user by email (case-sensitive).
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn create(&self, input: &CreateUser) -> Result<User, StoreError>;

    /// Refresh the display name and provider link of an existing user.
    ///
    /// Returns `None` if no row with the given `id` exists.
    async fn link_identity(
        &self,
        id: DbId,
        input: &LinkIdentity,
    ) -> Result<Option<User>, StoreError>;
}
