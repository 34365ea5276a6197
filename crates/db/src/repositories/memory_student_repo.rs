//! In-process student store.
//!
//! Backs the API when no database URL is configured and drives the
//! integration tests. Ids start at 1 and are never reused, matching the
//! sequence-backed adapters.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use registrar_core::backend::Backend;
use registrar_core::types::DbId;
use tokio::sync::RwLock;

use super::student_repo::StudentRepository;
use crate::error::StoreError;
use crate::models::student::{SaveStudent, Student};

#[derive(Debug, Default)]
struct Rows {
    by_id: BTreeMap<DbId, Student>,
    last_id: DbId,
}

/// `BTreeMap`-backed [`StudentRepository`] for one backend.
#[derive(Debug)]
pub struct MemoryStudentRepo {
    backend: Backend,
    rows: RwLock<Rows>,
    offline: AtomicBool,
}

impl MemoryStudentRepo {
    /// Create an empty store that reports itself as `backend`.
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            rows: RwLock::new(Rows::default()),
            offline: AtomicBool::new(false),
        }
    }

    /// Simulate losing (or regaining) the connection. While offline every
    /// call fails with [`StoreError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!(
                "{} memory store is offline",
                self.backend
            )));
        }
        Ok(())
    }

    async fn filter<F>(&self, keep: F) -> Result<Vec<Student>, StoreError>
    where
        F: Fn(&Student) -> bool + Send,
    {
        self.ensure_online()?;
        let rows = self.rows.read().await;
        Ok(rows.by_id.values().filter(|s| keep(s)).cloned().collect())
    }
}

#[async_trait]
impl StudentRepository for MemoryStudentRepo {
    fn backend(&self) -> Backend {
        self.backend
    }

    async fn find_all(&self) -> Result<Vec<Student>, StoreError> {
        self.filter(|_| true).await
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Student>, StoreError> {
        self.ensure_online()?;
        Ok(self.rows.read().await.by_id.get(&id).cloned())
    }

    async fn save(&self, record: SaveStudent) -> Result<Student, StoreError> {
        self.ensure_online()?;
        let mut rows = self.rows.write().await;

        let id = match record.id {
            Some(id) => id,
            None => rows.last_id + 1,
        };
        rows.last_id = rows.last_id.max(id);

        let student = record.into_student(id);
        rows.by_id.insert(id, student.clone());
        Ok(student)
    }

    async fn delete_by_id(&self, id: DbId) -> Result<bool, StoreError> {
        self.ensure_online()?;
        Ok(self.rows.write().await.by_id.remove(&id).is_some())
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Student>, StoreError> {
        self.filter(|s| s.name == name).await
    }

    async fn find_by_age_greater_than(&self, age: i32) -> Result<Vec<Student>, StoreError> {
        self.filter(|s| s.age.is_some_and(|a| a > age)).await
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn record(name: &str, age: Option<i32>) -> SaveStudent {
        SaveStudent {
            id: None,
            name: name.to_string(),
            age,
            ssn: None,
            birth: None,
            credit_card_number: None,
        }
    }

    #[tokio::test]
    async fn save_assigns_increasing_ids() {
        let repo = MemoryStudentRepo::new(Backend::Postgres);
        let a = repo.save(record("a", None)).await.unwrap();
        let b = repo.save(record("b", None)).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let repo = MemoryStudentRepo::new(Backend::Postgres);
        let a = repo.save(record("a", None)).await.unwrap();
        assert!(repo.delete_by_id(a.id).await.unwrap());
        let b = repo.save(record("b", None)).await.unwrap();
        assert_eq!(b.id, 2);
    }

    #[tokio::test]
    async fn save_with_id_replaces_or_inserts() {
        let repo = MemoryStudentRepo::new(Backend::Mysql);
        let a = repo.save(record("a", Some(20))).await.unwrap();

        let replaced = repo
            .save(SaveStudent {
                id: Some(a.id),
                ..record("a2", None)
            })
            .await
            .unwrap();
        assert_eq!(replaced.age, None);
        assert_eq!(repo.find_all().await.unwrap().len(), 1);

        let inserted = repo
            .save(SaveStudent {
                id: Some(10),
                ..record("z", None)
            })
            .await
            .unwrap();
        assert_eq!(inserted.id, 10);
        assert_eq!(repo.save(record("next", None)).await.unwrap().id, 11);
    }

    #[tokio::test]
    async fn delete_missing_is_noop() {
        let repo = MemoryStudentRepo::new(Backend::Postgres);
        assert!(!repo.delete_by_id(42).await.unwrap());
        assert!(repo.find_by_id(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn filters_are_exact_and_strict() {
        let repo = MemoryStudentRepo::new(Backend::Postgres);
        repo.save(record("Alice", Some(20))).await.unwrap();
        repo.save(record("alice", Some(21))).await.unwrap();
        repo.save(record("Bob", None)).await.unwrap();

        let named = repo.find_by_name("Alice").await.unwrap();
        assert_eq!(named.len(), 1);
        assert_eq!(named[0].name, "Alice");

        let older = repo.find_by_age_greater_than(20).await.unwrap();
        assert_eq!(older.len(), 1);
        assert_eq!(older[0].name, "alice");
    }

    #[tokio::test]
    async fn offline_store_reports_unavailable() {
        let repo = MemoryStudentRepo::new(Backend::Mysql);
        repo.set_offline(true);
        assert_matches!(repo.find_all().await, Err(StoreError::Unavailable(msg)) if msg.contains("mysql"));
        repo.set_offline(false);
        assert!(repo.find_all().await.is_ok());
    }
}
