//! Student entity model and DTOs.

use chrono::NaiveDate;
use registrar_core::error::CoreError;
use registrar_core::types::DbId;
use registrar_core::validation::{self, validate_age, validate_name};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Full student row from the `students` table.
///
/// Contains sensitive fields -- serialize [`StudentResponse`] for external
/// output unless full exposure is explicitly configured.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: DbId,
    pub name: String,
    pub age: Option<i32>,
    pub ssn: Option<String>,
    pub birth: Option<NaiveDate>,
    pub credit_card_number: Option<String>,
}

/// Restricted representation for API responses (no sensitive fields).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentResponse {
    pub id: DbId,
    pub name: String,
    pub age: Option<i32>,
}

impl From<&Student> for StudentResponse {
    fn from(student: &Student) -> Self {
        Self {
            id: student.id,
            name: student.name.clone(),
            age: student.age,
        }
    }
}

/// A complete row handed to `StudentRepository::save`.
///
/// `id: None` asks the store to assign a new id; `Some(id)` replaces (or
/// inserts) the row with that id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveStudent {
    pub id: Option<DbId>,
    pub name: String,
    pub age: Option<i32>,
    pub ssn: Option<String>,
    pub birth: Option<NaiveDate>,
    pub credit_card_number: Option<String>,
}

impl SaveStudent {
    /// Materialise the stored row once an id is known.
    pub fn into_student(self, id: DbId) -> Student {
        Student {
            id,
            name: self.name,
            age: self.age,
            ssn: self.ssn,
            birth: self.birth,
            credit_card_number: self.credit_card_number,
        }
    }
}

/// Request body for creating or updating a student.
///
/// Every field is optional at the wire level so the same shape serves both
/// POST (where `name` is then required) and PUT (where omitted fields keep
/// their stored values). `age` is tri-state: absent, explicit `null`, or a
/// number.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StudentPayload {
    /// Accepted for compatibility but never trusted; ids come from the store
    /// or the request path.
    pub id: Option<DbId>,
    #[validate(length(max = 100))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub age: Option<Option<i32>>,
    #[validate(length(max = 20))]
    pub ssn: Option<String>,
    pub birth: Option<NaiveDate>,
    #[validate(length(max = 32))]
    pub credit_card_number: Option<String>,
}

impl StudentPayload {
    /// Validate the payload as a new record. `name` is required.
    pub fn into_new(self) -> Result<SaveStudent, CoreError> {
        self.check()?;
        let name = self
            .name
            .ok_or_else(|| CoreError::Validation("name is required".into()))?;

        Ok(SaveStudent {
            id: None,
            name,
            age: self.age.flatten(),
            ssn: self.ssn,
            birth: self.birth,
            credit_card_number: self.credit_card_number,
        })
    }

    /// Merge the payload over an existing record (preserve-on-omit).
    ///
    /// - `ssn`, `birth`, `creditCardNumber`: absent or `null` keeps the stored value.
    /// - `name`: absent or `null` keeps the stored value.
    /// - `age`: absent keeps, `null` clears, a number replaces.
    ///
    /// The id is always the existing record's id.
    pub fn merge_into(self, existing: Student) -> Result<SaveStudent, CoreError> {
        self.check()?;

        Ok(SaveStudent {
            id: Some(existing.id),
            name: self.name.unwrap_or(existing.name),
            age: self.age.unwrap_or(existing.age),
            ssn: self.ssn.or(existing.ssn),
            birth: self.birth.or(existing.birth),
            credit_card_number: self.credit_card_number.or(existing.credit_card_number),
        })
    }

    fn check(&self) -> Result<(), CoreError> {
        validation::check(self)?;
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(Some(age)) = self.age {
            validate_age(age)?;
        }
        Ok(())
    }
}

/// Deserialize a field that was present in the body, keeping `null` distinct
/// from absence (absence is handled by `#[serde(default)]`).
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn stored() -> Student {
        Student {
            id: 7,
            name: "alice".into(),
            age: Some(22),
            ssn: Some("123-45-6789".into()),
            birth: NaiveDate::from_ymd_opt(2003, 4, 1),
            credit_card_number: Some("4111111111111111".into()),
        }
    }

    fn payload(value: serde_json::Value) -> StudentPayload {
        serde_json::from_value(value).expect("payload should deserialize")
    }

    #[test]
    fn age_distinguishes_absent_from_null() {
        assert_eq!(payload(json!({})).age, None);
        assert_eq!(payload(json!({ "age": null })).age, Some(None));
        assert_eq!(payload(json!({ "age": 30 })).age, Some(Some(30)));
    }

    #[test]
    fn camel_case_sensitive_fields_deserialize() {
        let p = payload(json!({ "creditCardNumber": "4000", "birth": "2001-02-03" }));
        assert_eq!(p.credit_card_number.as_deref(), Some("4000"));
        assert_eq!(p.birth, NaiveDate::from_ymd_opt(2001, 2, 3));
    }

    #[test]
    fn new_record_requires_name() {
        let err = payload(json!({ "age": 3 })).into_new().unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("name"));
    }

    #[test]
    fn new_record_ignores_client_id() {
        let record = payload(json!({ "id": 99, "name": "bob" })).into_new().unwrap();
        assert_eq!(record.id, None);
        assert_eq!(record.name, "bob");
    }

    #[test]
    fn empty_update_preserves_everything() {
        let merged = payload(json!({})).merge_into(stored()).unwrap();
        assert_eq!(merged.into_student(7), stored());
    }

    #[test]
    fn name_only_update_changes_only_name() {
        let merged = payload(json!({ "name": "alice2" })).merge_into(stored()).unwrap();
        let expected = Student {
            name: "alice2".into(),
            ..stored()
        };
        assert_eq!(merged.into_student(7), expected);
    }

    #[test]
    fn null_sensitive_fields_are_preserved() {
        let merged = payload(json!({ "ssn": null, "creditCardNumber": null, "birth": null }))
            .merge_into(stored())
            .unwrap();
        assert_eq!(merged.ssn.as_deref(), Some("123-45-6789"));
        assert_eq!(merged.credit_card_number.as_deref(), Some("4111111111111111"));
        assert!(merged.birth.is_some());
    }

    #[test]
    fn explicit_null_age_clears_it() {
        let merged = payload(json!({ "age": null })).merge_into(stored()).unwrap();
        assert_eq!(merged.age, None);
    }

    #[test]
    fn merge_keeps_existing_id_over_payload_id() {
        let merged = payload(json!({ "id": 1000 })).merge_into(stored()).unwrap();
        assert_eq!(merged.id, Some(7));
    }

    #[test]
    fn invalid_fields_rejected() {
        assert_matches!(
            payload(json!({ "name": "x", "age": -4 })).into_new(),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            payload(json!({ "name": "x", "ssn": "1".repeat(21) })).into_new(),
            Err(CoreError::Validation(msg)) if msg.contains("ssn")
        );
        assert_matches!(
            payload(json!({ "name": "  " })).merge_into(stored()),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn response_strips_sensitive_fields() {
        let json = serde_json::to_value(StudentResponse::from(&stored())).unwrap();
        assert_eq!(json, json!({ "id": 7, "name": "alice", "age": 22 }));
    }
}
