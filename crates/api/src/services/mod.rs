pub mod accounts;
pub mod students;
