/// Primary keys are 64-bit in both backends (`BIGSERIAL` / `BIGINT AUTO_INCREMENT`).
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
