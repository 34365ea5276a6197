//! Tests for `StudentService` over an in-memory repository.

use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use registrar_api::error::AppError;
use registrar_api::services::students::StudentService;
use registrar_core::backend::Backend;
use registrar_core::error::CoreError;
use registrar_db::models::student::StudentPayload;
use registrar_db::repositories::MemoryStudentRepo;

fn service() -> StudentService {
    StudentService::new(Arc::new(MemoryStudentRepo::new(Backend::Postgres)))
}

fn payload(name: &str, age: Option<i32>) -> StudentPayload {
    StudentPayload {
        name: Some(name.to_string()),
        age: age.map(Some),
        ..Default::default()
    }
}

fn sensitive(name: &str) -> StudentPayload {
    StudentPayload {
        ssn: Some("123-45-6789".into()),
        birth: NaiveDate::from_ymd_opt(2001, 9, 9),
        credit_card_number: Some("4000000000000002".into()),
        ..payload(name, Some(22))
    }
}

#[tokio::test]
async fn get_after_create_returns_the_created_record() {
    let svc = service();
    let created = svc.create(sensitive("alice")).await.unwrap();
    assert_eq!(svc.get(created.id).await.unwrap(), Some(created));
}

#[tokio::test]
async fn missing_ids_are_empty_and_not_deleted() {
    let svc = service();
    assert_eq!(svc.get(7).await.unwrap(), None);
    assert!(!svc.delete(7).await.unwrap());
    assert_eq!(svc.update(7, payload("x", None)).await.unwrap(), None);
}

#[tokio::test]
async fn empty_update_preserves_every_field() {
    let svc = service();
    let created = svc.create(sensitive("alice")).await.unwrap();

    let updated = svc
        .update(created.id, StudentPayload::default())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated, created);
}

#[tokio::test]
async fn name_only_update_changes_only_the_name() {
    let svc = service();
    let created = svc.create(sensitive("alice")).await.unwrap();

    let updated = svc
        .update(
            created.id,
            StudentPayload {
                name: Some("alice2".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.name, "alice2");
    assert_eq!(updated.age, created.age);
    assert_eq!(updated.ssn, created.ssn);
    assert_eq!(updated.birth, created.birth);
    assert_eq!(updated.credit_card_number, created.credit_card_number);
}

#[tokio::test]
async fn delete_then_get_is_empty() {
    let svc = service();
    let created = svc.create(payload("bob", None)).await.unwrap();
    assert!(svc.delete(created.id).await.unwrap());
    assert_eq!(svc.get(created.id).await.unwrap(), None);
}

#[tokio::test]
async fn create_requires_a_name() {
    let svc = service();
    let result = svc.create(StudentPayload::default()).await;
    assert_matches!(result, Err(AppError::Core(CoreError::Validation(_))));
    assert!(svc.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn invalid_update_leaves_record_untouched() {
    let svc = service();
    let created = svc.create(payload("carol", Some(30))).await.unwrap();

    let result = svc.update(created.id, payload("carol", Some(500))).await;
    assert_matches!(result, Err(AppError::Core(CoreError::Validation(_))));
    assert_eq!(svc.get(created.id).await.unwrap(), Some(created));
}

#[tokio::test]
async fn searches_are_exact_and_strict() {
    let svc = service();
    svc.create(payload("Alice", Some(20))).await.unwrap();
    svc.create(payload("alice", Some(21))).await.unwrap();
    svc.create(payload("Bob", None)).await.unwrap();

    let by_name = svc.search_by_name("Alice").await.unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].name, "Alice");

    let older = svc.search_by_older_than(20).await.unwrap();
    assert_eq!(older.len(), 1);
    assert_eq!(older[0].name, "alice");

    assert_eq!(svc.search(Some("Bob"), Some(99)).await.unwrap().len(), 1);
    assert_eq!(svc.search(None, Some(19)).await.unwrap().len(), 2);
    assert_eq!(svc.search(None, None).await.unwrap().len(), 3);
}

#[tokio::test]
async fn store_failures_propagate() {
    let repo = Arc::new(MemoryStudentRepo::new(Backend::Mysql));
    let svc = StudentService::new(repo.clone());
    repo.set_offline(true);

    assert_matches!(svc.list().await, Err(AppError::Store(_)));
    assert_eq!(svc.backend(), Backend::Mysql);
}
