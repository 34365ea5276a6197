//! Mapping of OAuth2 sign-ins onto local users.

use registrar_core::error::CoreError;
use registrar_core::identity::ExternalProfile;
use registrar_core::roles::ROLE_USER;
use registrar_db::models::user::{CreateUser, LinkIdentity, User};
use registrar_db::repositories::UserRepository;

use crate::error::AppResult;

/// Find or create the local user for an external profile.
///
/// Lookup order is provider identity, then email. A user found by either key
/// has its display name and provider link refreshed. Unknown profiles become
/// new users with the `user` role.
pub async fn link_external_identity(
    users: &dyn UserRepository,
    profile: &ExternalProfile,
) -> AppResult<User> {
    let provider = profile.provider.as_str();

    let existing = match users.find_by_provider(provider, &profile.provider_id).await? {
        Some(user) => Some(user),
        None => users.find_by_email(&profile.email).await?,
    };

    let Some(existing) = existing else {
        let user = users
            .create(&CreateUser {
                username: profile.username.clone(),
                email: profile.email.clone(),
                name: profile.name.clone(),
                provider: provider.to_string(),
                provider_id: profile.provider_id.clone(),
                role: ROLE_USER.to_string(),
            })
            .await?;
        tracing::info!(user_id = user.id, provider, "Created user from external identity");
        return Ok(user);
    };

    let link = LinkIdentity {
        name: profile.name.clone().or(existing.name.clone()),
        provider: provider.to_string(),
        provider_id: profile.provider_id.clone(),
    };
    let user = users.link_identity(existing.id, &link).await?.ok_or_else(|| {
        CoreError::NotFound {
            entity: "User",
            id: existing.id,
        }
    })?;
    tracing::info!(user_id = user.id, provider, "Refreshed external identity link");
    Ok(user)
}
