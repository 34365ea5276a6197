//! Persistence port for student records.

use async_trait::async_trait;
use registrar_core::backend::Backend;
use registrar_core::types::DbId;

use crate::error::StoreError;
use crate::models::student::{SaveStudent, Student};

/// CRUD contract implemented once per backend.
///
/// Implementations own their connection handles; callers hold no cached rows
/// and every call round-trips to the store.
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// The backend this repository writes to.
    fn backend(&self) -> Backend;

    /// All records ordered by id.
    async fn find_all(&self) -> Result<Vec<Student>, StoreError>;

    /// Returns `None` for a missing id; never an error.
    async fn find_by_id(&self, id: DbId) -> Result<Option<Student>, StoreError>;

    /// Insert (when `record.id` is `None`, assigning a fresh id) or replace the
    /// whole row with the given id, inserting it if absent. No merging happens
    /// here.
    async fn save(&self, record: SaveStudent) -> Result<Student, StoreError>;

    /// Remove the row if present. Returns whether a row was removed; a missing
    /// id is not an error.
    async fn delete_by_id(&self, id: DbId) -> Result<bool, StoreError>;

    /// Exact, case-sensitive name match, ordered by id.
    async fn find_by_name(&self, name: &str) -> Result<Vec<Student>, StoreError>;

    /// Records whose age is strictly greater than `age`, ordered by id.
    async fn find_by_age_greater_than(&self, age: i32) -> Result<Vec<Student>, StoreError>;
}
