//! PostgreSQL adapter for the `students` table (primary backend).

use async_trait::async_trait;
use registrar_core::backend::Backend;
use registrar_core::types::DbId;
use sqlx::PgPool;

use super::student_repo::StudentRepository;
use crate::error::StoreError;
use crate::models::student::{SaveStudent, Student};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, age, ssn, birth, credit_card_number";

/// Provides CRUD operations for students stored in PostgreSQL.
#[derive(Clone)]
pub struct PgStudentRepo {
    pool: PgPool,
}

impl PgStudentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StudentRepository for PgStudentRepo {
    fn backend(&self) -> Backend {
        Backend::Postgres
    }

    async fn find_all(&self) -> Result<Vec<Student>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM students ORDER BY id");
        let rows = sqlx::query_as::<_, Student>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Student>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM students WHERE id = $1");
        let row = sqlx::query_as::<_, Student>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn save(&self, record: SaveStudent) -> Result<Student, StoreError> {
        let Some(id) = record.id else {
            let query = format!(
                "INSERT INTO students (name, age, ssn, birth, credit_card_number)
                 VALUES ($1, $2, $3, $4, $5)
                 RETURNING {COLUMNS}"
            );
            let row = sqlx::query_as::<_, Student>(&query)
                .bind(&record.name)
                .bind(record.age)
                .bind(&record.ssn)
                .bind(record.birth)
                .bind(&record.credit_card_number)
                .fetch_one(&self.pool)
                .await?;
            return Ok(row);
        };

        let mut tx = self.pool.begin().await?;

        let query = format!(
            "INSERT INTO students (id, name, age, ssn, birth, credit_card_number)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                age = EXCLUDED.age,
                ssn = EXCLUDED.ssn,
                birth = EXCLUDED.birth,
                credit_card_number = EXCLUDED.credit_card_number
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, Student>(&query)
            .bind(id)
            .bind(&record.name)
            .bind(record.age)
            .bind(&record.ssn)
            .bind(record.birth)
            .bind(&record.credit_card_number)
            .fetch_one(&mut *tx)
            .await?;

        // An explicit id must never be handed out again by the sequence.
        sqlx::query(
            "SELECT setval('students_id_seq', $1)
             WHERE $1 > (SELECT last_value FROM students_id_seq)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row)
    }

    async fn delete_by_id(&self, id: DbId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Student>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM students WHERE name = $1 ORDER BY id");
        let rows = sqlx::query_as::<_, Student>(&query)
            .bind(name)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_by_age_greater_than(&self, age: i32) -> Result<Vec<Student>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM students WHERE age > $1 ORDER BY id");
        let rows = sqlx::query_as::<_, Student>(&query)
            .bind(age)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}
