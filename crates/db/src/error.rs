/// Errors raised by repository adapters.
///
/// Connectivity problems are separated from query failures so the HTTP layer
/// can report an unreachable backend distinctly from a bad statement.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend could not be reached (I/O, TLS, pool exhausted or closed).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The backend was reached but the statement failed.
    #[error("store query failed: {0}")]
    Query(#[source] sqlx::Error),

    /// The backend returned data that violates a repository invariant.
    #[error("store invariant violated: {0}")]
    Invariant(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if is_connectivity_error(&err) {
            StoreError::Unavailable(err.to_string())
        } else {
            StoreError::Query(err)
        }
    }
}

fn is_connectivity_error(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
    )
}
