//! Backend identifiers and the policy for resolving a caller-supplied name.
//!
//! Two relational backends hold student records. PostgreSQL is the primary
//! backend and the default whenever the caller does not name one.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::CoreError;

/// One of the two independent student stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Postgres,
    Mysql,
}

impl Backend {
    /// The backend used when a request does not name one.
    pub const PRIMARY: Backend = Backend::Postgres;

    pub const ALL: [Backend; 2] = [Backend::Postgres, Backend::Mysql];

    pub fn as_str(self) -> &'static str {
        match self {
            Backend::Postgres => "postgres",
            Backend::Mysql => "mysql",
        }
    }

    /// Match a backend name case-insensitively. Returns `None` for unknown names.
    pub fn parse(raw: &str) -> Option<Backend> {
        let raw = raw.trim();
        Backend::ALL
            .into_iter()
            .find(|b| b.as_str().eq_ignore_ascii_case(raw))
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How unknown backend names are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendSelection {
    /// Unknown names fall back to [`Backend::PRIMARY`].
    #[default]
    Permissive,
    /// Unknown names are rejected with a validation error.
    Strict,
}

impl FromStr for BackendSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "permissive" => Ok(BackendSelection::Permissive),
            "strict" => Ok(BackendSelection::Strict),
            other => Err(format!(
                "unknown backend selection '{other}' (expected 'permissive' or 'strict')"
            )),
        }
    }
}

/// Outcome of resolving a caller-supplied backend name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    pub backend: Backend,
    /// `true` when the name was not recognised and the primary was substituted.
    pub fell_back: bool,
}

/// Resolve an optional backend name under the given selection policy.
///
/// - `None` resolves to the primary backend.
/// - A recognised name resolves to that backend.
/// - An unknown name resolves to the primary backend under
///   [`BackendSelection::Permissive`] and fails under
///   [`BackendSelection::Strict`].
pub fn resolve(raw: Option<&str>, policy: BackendSelection) -> Result<Resolved, CoreError> {
    let Some(raw) = raw else {
        return Ok(Resolved {
            backend: Backend::PRIMARY,
            fell_back: false,
        });
    };

    match (Backend::parse(raw), policy) {
        (Some(backend), _) => Ok(Resolved {
            backend,
            fell_back: false,
        }),
        (None, BackendSelection::Permissive) => Ok(Resolved {
            backend: Backend::PRIMARY,
            fell_back: true,
        }),
        (None, BackendSelection::Strict) => Err(CoreError::Validation(format!(
            "Unknown backend '{raw}'. Expected one of: postgres, mysql"
        ))),
    }
}
