//! Repository ports and their adapters.
//!
//! Each port is an object-safe async trait so the HTTP layer can hold
//! `Arc<dyn ...>` handles and pick an adapter at request time.

pub mod memory_student_repo;
pub mod memory_user_repo;
pub mod mysql_student_repo;
pub mod pg_student_repo;
pub mod pg_user_repo;
pub mod student_repo;
pub mod user_repo;

pub use memory_student_repo::MemoryStudentRepo;
pub use memory_user_repo::MemoryUserRepo;
pub use mysql_student_repo::MySqlStudentRepo;
pub use pg_student_repo::PgStudentRepo;
pub use pg_user_repo::PgUserRepo;
pub use student_repo::StudentRepository;
pub use user_repo::UserRepository;
