//! HTTP front end of the student registry.
//!
//! Routes student CRUD and search requests to one of two independent
//! backends and guards them with password, bearer-token and OAuth2
//! authentication.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod router;
pub mod routes;
pub mod services;
pub mod state;
