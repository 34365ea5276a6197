//! In-process user store used alongside the in-memory student stores.

use async_trait::async_trait;
use chrono::Utc;
use registrar_core::types::DbId;
use tokio::sync::RwLock;

use super::user_repo::UserRepository;
use crate::error::StoreError;
use crate::models::user::{CreateUser, LinkIdentity, User};

#[derive(Debug, Default)]
pub struct MemoryUserRepo {
    users: RwLock<Vec<User>>,
}

impl MemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepo {
    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_provider(
        &self,
        provider: &str,
        provider_id: &str,
    ) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|u| u.provider == provider && u.provider_id == provider_id)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn create(&self, input: &CreateUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;

        // Same uniqueness rules as the `users` table constraints.
        if users.iter().any(|u| u.email == input.email) {
            return Err(StoreError::Invariant(format!(
                "uq_users_email: {} already exists",
                input.email
            )));
        }
        if users
            .iter()
            .any(|u| u.provider == input.provider && u.provider_id == input.provider_id)
        {
            return Err(StoreError::Invariant(format!(
                "uq_users_provider_identity: {}/{} already exists",
                input.provider, input.provider_id
            )));
        }

        let now = Utc::now();
        let user = User {
            id: users.iter().map(|u| u.id).max().unwrap_or(0) + 1,
            username: input.username.clone(),
            email: input.email.clone(),
            name: input.name.clone(),
            provider: input.provider.clone(),
            provider_id: input.provider_id.clone(),
            role: input.role.clone(),
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn link_identity(
        &self,
        id: DbId,
        input: &LinkIdentity,
    ) -> Result<Option<User>, StoreError> {
        let mut users = self.users.write().await;
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        user.name = input.name.clone();
        user.provider = input.provider.clone();
        user.provider_id = input.provider_id.clone();
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn octocat() -> CreateUser {
        CreateUser {
            username: "octocat".into(),
            email: "octocat@github.com".into(),
            name: None,
            provider: "github".into(),
            provider_id: "1".into(),
            role: "user".into(),
        }
    }

    #[tokio::test]
    async fn duplicate_email_violates_uniqueness() {
        let repo = MemoryUserRepo::new();
        repo.create(&octocat()).await.unwrap();

        let dup = CreateUser {
            provider_id: "2".into(),
            ..octocat()
        };
        assert_matches!(
            repo.create(&dup).await,
            Err(StoreError::Invariant(msg)) if msg.contains("uq_users_email")
        );
    }

    #[tokio::test]
    async fn link_identity_updates_provider_fields() {
        let repo = MemoryUserRepo::new();
        let user = repo.create(&octocat()).await.unwrap();

        let linked = repo
            .link_identity(
                user.id,
                &LinkIdentity {
                    name: Some("Mona".into()),
                    provider: "google".into(),
                    provider_id: "g-1".into(),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(linked.provider, "google");
        assert!(repo.find_by_provider("github", "1").await.unwrap().is_none());

        let missing = LinkIdentity {
            name: None,
            provider: "github".into(),
            provider_id: "x".into(),
        };
        assert!(repo.link_identity(99, &missing).await.unwrap().is_none());
    }
}
