//! Registry of the student repositories, one per [`Backend`].

use std::sync::Arc;

use registrar_core::backend::Backend;

use crate::repositories::{MemoryStudentRepo, StudentRepository};

/// Holds one repository per backend and hands out the one a request selected.
///
/// Cheap to clone; repositories are shared behind `Arc`.
#[derive(Clone)]
pub struct StudentBackends {
    postgres: Arc<dyn StudentRepository>,
    mysql: Arc<dyn StudentRepository>,
}

impl StudentBackends {
    pub fn new(postgres: Arc<dyn StudentRepository>, mysql: Arc<dyn StudentRepository>) -> Self {
        Self { postgres, mysql }
    }

    /// Two independent in-memory stores.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryStudentRepo::new(Backend::Postgres)),
            Arc::new(MemoryStudentRepo::new(Backend::Mysql)),
        )
    }

    pub fn get(&self, backend: Backend) -> Arc<dyn StudentRepository> {
        match backend {
            Backend::Postgres => Arc::clone(&self.postgres),
            Backend::Mysql => Arc::clone(&self.mysql),
        }
    }
}
