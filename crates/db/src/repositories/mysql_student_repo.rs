//! MySQL adapter for the `students` table (secondary backend).
//!
//! MySQL has no `RETURNING`, so writes run inside a transaction and read the
//! row back by id before committing.

use async_trait::async_trait;
use registrar_core::backend::Backend;
use registrar_core::types::DbId;
use sqlx::{MySqlConnection, MySqlPool};

use super::student_repo::StudentRepository;
use crate::error::StoreError;
use crate::models::student::{SaveStudent, Student};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, age, ssn, birth, credit_card_number";

/// Provides CRUD operations for students stored in MySQL.
#[derive(Clone)]
pub struct MySqlStudentRepo {
    pool: MySqlPool,
}

impl MySqlStudentRepo {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

/// Read a row back inside the write transaction.
async fn fetch_written(conn: &mut MySqlConnection, id: DbId) -> Result<Student, StoreError> {
    let query = format!("SELECT {COLUMNS} FROM students WHERE id = ?");
    let row = sqlx::query_as::<_, Student>(&query)
        .bind(id)
        .fetch_one(conn)
        .await?;
    Ok(row)
}

#[async_trait]
impl StudentRepository for MySqlStudentRepo {
    fn backend(&self) -> Backend {
        Backend::Mysql
    }

    async fn find_all(&self) -> Result<Vec<Student>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM students ORDER BY id");
        let rows = sqlx::query_as::<_, Student>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Student>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM students WHERE id = ?");
        let row = sqlx::query_as::<_, Student>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn save(&self, record: SaveStudent) -> Result<Student, StoreError> {
        let mut tx = self.pool.begin().await?;

        let id = match record.id {
            None => {
                let result = sqlx::query(
                    "INSERT INTO students (name, age, ssn, birth, credit_card_number)
                     VALUES (?, ?, ?, ?, ?)",
                )
                .bind(&record.name)
                .bind(record.age)
                .bind(&record.ssn)
                .bind(record.birth)
                .bind(&record.credit_card_number)
                .execute(&mut *tx)
                .await?;

                DbId::try_from(result.last_insert_id()).map_err(|_| {
                    StoreError::Invariant(format!(
                        "auto-increment id {} does not fit in a signed 64-bit id",
                        result.last_insert_id()
                    ))
                })?
            }
            Some(id) => {
                sqlx::query(
                    "INSERT INTO students (id, name, age, ssn, birth, credit_card_number)
                     VALUES (?, ?, ?, ?, ?, ?)
                     ON DUPLICATE KEY UPDATE
                        name = VALUES(name),
                        age = VALUES(age),
                        ssn = VALUES(ssn),
                        birth = VALUES(birth),
                        credit_card_number = VALUES(credit_card_number)",
                )
                .bind(id)
                .bind(&record.name)
                .bind(record.age)
                .bind(&record.ssn)
                .bind(record.birth)
                .bind(&record.credit_card_number)
                .execute(&mut *tx)
                .await?;
                id
            }
        };

        let row = fetch_written(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(row)
    }

    async fn delete_by_id(&self, id: DbId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM students WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Student>, StoreError> {
        let query = format!(
            "SELECT {COLUMNS} FROM students WHERE name = ? COLLATE utf8mb4_bin ORDER BY id"
        );
        let rows = sqlx::query_as::<_, Student>(&query)
            .bind(name)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_by_age_greater_than(&self, age: i32) -> Result<Vec<Student>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM students WHERE age > ? ORDER BY id");
        let rows = sqlx::query_as::<_, Student>(&query)
            .bind(age)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}
