//! Student CRUD and search over one backend.
//!
//! The service validates input and applies the update merge; the repository
//! only stores complete rows.

use std::sync::Arc;

use registrar_core::backend::Backend;
use registrar_core::types::DbId;
use registrar_db::models::student::{Student, StudentPayload};
use registrar_db::repositories::StudentRepository;

use crate::error::AppResult;

#[derive(Clone)]
pub struct StudentService {
    repo: Arc<dyn StudentRepository>,
}

impl StudentService {
    pub fn new(repo: Arc<dyn StudentRepository>) -> Self {
        Self { repo }
    }

    pub fn backend(&self) -> Backend {
        self.repo.backend()
    }

    pub async fn list(&self) -> AppResult<Vec<Student>> {
        Ok(self.repo.find_all().await?)
    }

    pub async fn get(&self, id: DbId) -> AppResult<Option<Student>> {
        Ok(self.repo.find_by_id(id).await?)
    }

    /// Validate and store a new record. Any client-sent id is ignored.
    pub async fn create(&self, input: StudentPayload) -> AppResult<Student> {
        let record = input.into_new()?;
        let student = self.repo.save(record).await?;
        tracing::info!(backend = %self.backend(), id = student.id, "Student created");
        Ok(student)
    }

    /// Merge `input` over the stored record. `None` if `id` does not exist.
    ///
    /// The read and the write are separate statements; a concurrent update
    /// of the same id in between is overwritten.
    pub async fn update(&self, id: DbId, input: StudentPayload) -> AppResult<Option<Student>> {
        let Some(existing) = self.repo.find_by_id(id).await? else {
            return Ok(None);
        };
        let record = input.merge_into(existing)?;
        let student = self.repo.save(record).await?;
        tracing::info!(backend = %self.backend(), id, "Student updated");
        Ok(Some(student))
    }

    /// `true` if a record was removed.
    pub async fn delete(&self, id: DbId) -> AppResult<bool> {
        let deleted = self.repo.delete_by_id(id).await?;
        if deleted {
            tracing::info!(backend = %self.backend(), id, "Student deleted");
        }
        Ok(deleted)
    }

    /// Exact, case-sensitive name match.
    pub async fn search_by_name(&self, name: &str) -> AppResult<Vec<Student>> {
        Ok(self.repo.find_by_name(name).await?)
    }

    /// Records with `age > age`. Records without an age never match.
    pub async fn search_by_older_than(&self, age: i32) -> AppResult<Vec<Student>> {
        Ok(self.repo.find_by_age_greater_than(age).await?)
    }

    /// Name takes precedence over age; with neither, the full list.
    pub async fn search(&self, name: Option<&str>, min_age: Option<i32>) -> AppResult<Vec<Student>> {
        match (name, min_age) {
            (Some(name), _) => self.search_by_name(name).await,
            (None, Some(age)) => self.search_by_older_than(age).await,
            (None, None) => self.list().await,
        }
    }
}
