//! Query-string parameters shared by the student handlers.

use serde::Deserialize;

/// `?source=<backend>` on the list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct SourceParams {
    pub source: Option<String>,
}

/// Parameters of `GET /api/students/search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub name: Option<String>,
    #[serde(rename = "minAge")]
    pub min_age: Option<i32>,
    pub source: Option<String>,
}
