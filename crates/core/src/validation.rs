//! Field rules for student input.
//!
//! Length limits mirror the column sizes in both backends' migrations.
//! Structural checks are declared with `validator` on the request DTOs; the
//! rules that `validator` cannot express (blank names, age bounds on a
//! tri-state field) live here as plain functions.

use validator::{Validate, ValidationErrors};

use crate::error::CoreError;

pub const NAME_MAX_LEN: usize = 100;
pub const AGE_MIN: i32 = 0;
pub const AGE_MAX: i32 = 150;

/// Run the derived `validator` rules and convert failures into [`CoreError::Validation`].
pub fn check<T: Validate>(input: &T) -> Result<(), CoreError> {
    input
        .validate()
        .map_err(|errors| CoreError::Validation(describe(&errors)))
}

/// A name must be present and contain a non-whitespace character.
pub fn validate_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("name must not be blank".into()));
    }
    if name.chars().count() > NAME_MAX_LEN {
        return Err(CoreError::Validation(format!(
            "name must be at most {NAME_MAX_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_age(age: i32) -> Result<(), CoreError> {
    if !(AGE_MIN..=AGE_MAX).contains(&age) {
        return Err(CoreError::Validation(format!(
            "age must be between {AGE_MIN} and {AGE_MAX}"
        )));
    }
    Ok(())
}

/// Flatten `validator` errors into a single sorted, human-readable line.
fn describe(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let codes: Vec<&str> = errs.iter().map(|e| e.code.as_ref()).collect();
            format!("{field}: {}", codes.join(", "))
        })
        .collect();
    parts.sort();
    parts.join("; ")
}
