#![allow(dead_code)]

use std::sync::Arc;

use argon2::password_hash::{PasswordHasher, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use registrar_core::backend::{Backend, BackendSelection};
use registrar_core::identity::OAuthProvider;
use registrar_core::roles::{ROLE_ADMIN, ROLE_USER};
use registrar_core::types::DbId;
use registrar_db::repositories::{MemoryStudentRepo, MemoryUserRepo};
use registrar_db::StudentBackends;
use tower::ServiceExt;

use registrar_api::auth::jwt::{generate_access_token, JwtConfig};
use registrar_api::auth::local::LocalAccount;
use registrar_api::auth::oauth::OAuthClientConfig;
use registrar_api::config::{
    AuthConfig, AuthMode, DatabaseConfig, OAuthConfig, ServerConfig,
};
use registrar_api::router::build_app_router;
use registrar_api::state::AppState;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "correct-horse-battery-staple";

/// Administrator whose hash uses minimal Argon2 parameters so tests stay fast.
pub fn test_admin() -> LocalAccount {
    let params = Params::new(1024, 1, 1, None).unwrap();
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    let salt = SaltString::from_b64("dGVzdHNhbHR0ZXN0c2FsdA").unwrap();
    let password_hash = argon2
        .hash_password(ADMIN_PASSWORD.as_bytes(), &salt)
        .unwrap()
        .to_string();

    LocalAccount {
        username: ADMIN_USERNAME.to_string(),
        password_hash,
        role: ROLE_ADMIN.to_string(),
    }
}

/// Build a test `ServerConfig` with safe defaults: API auth mode, permissive
/// backend selection, restricted student output and GitHub sign-in enabled.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        database: DatabaseConfig {
            primary_url: None,
            secondary_url: None,
            max_connections: 5,
        },
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
        auth: AuthConfig {
            mode: AuthMode::Api,
            admin_only_backend_routes: false,
            admin: Some(test_admin()),
            secure_cookies: false,
        },
        backend_selection: BackendSelection::Permissive,
        expose_sensitive_fields: false,
        oauth: OAuthConfig {
            public_base_url: "http://localhost:3000".to_string(),
            providers: vec![OAuthClientConfig::new(
                OAuthProvider::Github,
                "test-client-id",
                "test-client-secret",
            )],
        },
    }
}

/// The application plus handles on its in-memory stores.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub postgres: Arc<MemoryStudentRepo>,
    pub mysql: Arc<MemoryStudentRepo>,
}

impl TestApp {
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    pub fn repo(&self, backend: Backend) -> &MemoryStudentRepo {
        match backend {
            Backend::Postgres => &self.postgres,
            Backend::Mysql => &self.mysql,
        }
    }

    /// `Authorization` value carrying an admin bearer token.
    pub fn admin_auth(&self) -> String {
        bearer(&self.state.config.jwt, ADMIN_USERNAME, ROLE_ADMIN, None)
    }

    /// `Authorization` value carrying a plain user's bearer token.
    pub fn user_auth(&self) -> String {
        bearer(&self.state.config.jwt, "octocat", ROLE_USER, Some(1))
    }
}

/// Build the full application router (same middleware stack as `main.rs`)
/// over fresh in-memory stores.
pub fn build_test_app(config: ServerConfig) -> TestApp {
    let postgres = Arc::new(MemoryStudentRepo::new(Backend::Postgres));
    let mysql = Arc::new(MemoryStudentRepo::new(Backend::Mysql));

    let state = AppState {
        backends: StudentBackends::new(postgres.clone(), mysql.clone()),
        users: Arc::new(MemoryUserRepo::new()),
        config: Arc::new(config),
        http: reqwest::Client::new(),
    };
    let router = build_app_router(state.clone(), &state.config).unwrap();

    TestApp {
        router,
        state,
        postgres,
        mysql,
    }
}

pub fn bearer(jwt: &JwtConfig, username: &str, role: &str, user_id: Option<DbId>) -> String {
    let token = generate_access_token(username, role, user_id, jwt).unwrap();
    format!("Bearer {token}")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

fn request(method: Method, uri: &str, auth: Option<&str>) -> axum::http::request::Builder {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(AUTHORIZATION, auth);
    }
    builder
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, request(Method::GET, uri, None).body(Body::empty()).unwrap()).await
}

pub async fn get_auth(app: Router, uri: &str, auth: &str) -> Response {
    send(app, request(Method::GET, uri, Some(auth)).body(Body::empty()).unwrap()).await
}

pub async fn get_with_cookie(app: Router, uri: &str, cookie: &str) -> Response {
    let req = request(Method::GET, uri, None)
        .header(COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    send(app, req).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    json_request(app, Method::POST, uri, None, body).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    auth: &str,
    body: serde_json::Value,
) -> Response {
    json_request(app, Method::POST, uri, Some(auth), body).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    auth: &str,
    body: serde_json::Value,
) -> Response {
    json_request(app, Method::PUT, uri, Some(auth), body).await
}

pub async fn delete_auth(app: Router, uri: &str, auth: &str) -> Response {
    send(app, request(Method::DELETE, uri, Some(auth)).body(Body::empty()).unwrap()).await
}

pub async fn post_form(app: Router, uri: &str, body: &str) -> Response {
    let req = request(Method::POST, uri, None)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

async fn json_request(
    app: Router,
    method: Method,
    uri: &str,
    auth: Option<&str>,
    body: serde_json::Value,
) -> Response {
    let req = request(method, uri, auth)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// All `Set-Cookie` values of a response.
pub fn set_cookies(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(axum::http::header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(axum::http::header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}
