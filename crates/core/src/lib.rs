//! Domain building blocks shared by the persistence and HTTP layers.
//!
//! Nothing in this crate performs I/O: it defines identifiers, the domain
//! error type, the backend selection policy, role names, student field rules,
//! and the mapping from external identity-provider profiles to local users.

pub mod backend;
pub mod error;
pub mod identity;
pub mod roles;
pub mod types;
pub mod validation;
