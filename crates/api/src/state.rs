use std::sync::Arc;

use registrar_db::repositories::UserRepository;
use registrar_db::StudentBackends;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// One student repository per backend.
    pub backends: StudentBackends,
    /// OAuth2-linked users (stored in the primary backend).
    pub users: Arc<dyn UserRepository>,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Outbound HTTP client for OAuth2 providers.
    pub http: reqwest::Client,
}
