//! User entity model and DTOs.
//!
//! Users are created on first sign-in through an OAuth2 provider. The
//! configured administrator is not stored here.

use registrar_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full user row from the `users` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub name: Option<String>,
    /// Registration id of the identity provider (e.g. `"github"`).
    pub provider: String,
    /// Subject identifier issued by the provider.
    pub provider_id: String,
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub name: Option<String>,
    pub provider: String,
    pub provider_id: String,
    pub role: String,
}

/// DTO for refreshing the provider link of an existing user.
#[derive(Debug, Clone)]
pub struct LinkIdentity {
    pub name: Option<String>,
    pub provider: String,
    pub provider_id: String,
}
