// Integration tests for the Student Service
//
// Tests cover:
// - Create / get round trip
// - List filtering and projection
// - Patch semantics under both persistence policies
// - Delete and not-found handling
// - Store failures surfacing as server errors

use async_trait::async_trait;
use mockall::mock;
use rstest::rstest;
use serde_json::{Value, json};
use std::sync::Arc;

use rollcall::config::PatchPolicy;
use rollcall::error::{AppError, Result};
use rollcall::models::{Student, StudentPatch};
use rollcall::services::{StudentFilter, StudentService, StudentServiceImpl};
use rollcall::storage::{Document, DocumentStore, Filter, MemoryStore, StoredDocument, Update};

mock! {
    pub Store {}

    #[async_trait]
    impl DocumentStore for Store {
        async fn insert(&self, doc: Document) -> Result<String>;
        async fn find_one(&self, id: &str) -> Result<Option<StoredDocument>>;
        async fn find_many(&self, filter: &Filter) -> Result<Vec<StoredDocument>>;
        async fn update_one(&self, id: &str, update: Update) -> Result<u64>;
        async fn delete_one(&self, id: &str) -> Result<u64>;
        async fn ping(&self) -> Result<()>;
    }
}

fn student(value: Value) -> Student {
    Student::from_json(value).unwrap()
}

fn ann() -> Student {
    student(json!({"name": "Ann", "age": 20, "address": {"city": "Pune", "country": "IN"}}))
}

fn patch(value: Value) -> StudentPatch {
    StudentPatch::from_json(value).unwrap()
}

fn service(policy: PatchPolicy) -> (Arc<MemoryStore>, StudentServiceImpl) {
    let store = Arc::new(MemoryStore::new());
    let service = StudentServiceImpl::new(store.clone(), policy);
    (store, service)
}

fn store_down() -> AppError {
    AppError::Database("connection reset".to_string())
}

// ============ Create / Get ============

#[tokio::test]
async fn test_create_then_get_returns_input_plus_id() {
    let (_, service) = service(PatchPolicy::Set);

    let id = service.create(ann()).await.unwrap();
    assert!(!id.is_empty());

    let fetched = service.get(&id).await.unwrap();
    assert_eq!(fetched.id, id);
    assert_eq!(fetched.name, "Ann");
    assert_eq!(fetched.age, 20);
    assert_eq!(fetched.address.city.as_deref(), Some("Pune"));
    assert_eq!(fetched.address.country.as_deref(), Some("IN"));
}

#[tokio::test]
async fn test_get_unknown_id_is_not_found() {
    let (_, service) = service(PatchPolicy::Set);
    service.create(ann()).await.unwrap();

    for id in ["", "nope", "0123456789abcdef0123456789abcdef"] {
        assert_eq!(service.get(id).await.unwrap_err(), AppError::student_not_found());
    }
}

#[tokio::test]
async fn test_get_tolerates_legacy_record_without_address() {
    let (store, service) = service(PatchPolicy::Set);
    let mut legacy = Document::new();
    legacy.insert("name".into(), json!("Old"));
    legacy.insert("age".into(), json!(70));
    let id = store.insert(legacy).await.unwrap();

    let fetched = service.get(&id).await.unwrap();
    assert_eq!(fetched.address.city, None);
    assert_eq!(fetched.address.country, None);
}

// ============ List ============

async fn seeded(policy: PatchPolicy) -> StudentServiceImpl {
    let (_, service) = service(policy);
    for value in [
        json!({"name": "Ann", "age": 20, "address": {"city": "Pune", "country": "IN"}}),
        json!({"name": "Bob", "age": 15, "address": {"city": "Delhi", "country": "IN"}}),
        json!({"name": "Cy", "age": 18, "address": {"city": "Austin", "country": "US"}}),
        json!({"name": "Di", "age": 40, "address": {"city": "Lyon", "country": "FR"}}),
    ] {
        service.create(student(value)).await.unwrap();
    }
    service
}

fn names(rows: &[rollcall::models::StudentSummary]) -> Vec<&str> {
    rows.iter().map(|r| r.name.as_str()).collect()
}

#[rstest]
#[case::no_filter(None, None, vec!["Ann", "Bob", "Cy", "Di"])]
#[case::adults(None, Some(18), vec!["Ann", "Cy", "Di"])]
#[case::country(Some("IN"), None, vec!["Ann", "Bob"])]
#[case::both(Some("IN"), Some(18), vec!["Ann"])]
#[case::nobody(Some("JP"), None, vec![])]
#[tokio::test]
async fn test_list_filters(
    #[case] country: Option<&str>,
    #[case] age_gte: Option<i64>,
    #[case] expected: Vec<&str>,
) {
    let service = seeded(PatchPolicy::Set).await;
    let filter = StudentFilter {
        country: country.map(String::from),
        age_gte,
    };

    let rows = service.list(&filter).await.unwrap();
    assert_eq!(names(&rows), expected);
}

#[tokio::test]
async fn test_list_projects_name_and_age_only() {
    let service = seeded(PatchPolicy::Set).await;
    let rows = service.list(&StudentFilter::default()).await.unwrap();

    assert_eq!(
        serde_json::to_value(&rows[0]).unwrap(),
        json!({"name": "Ann", "age": 20})
    );
}

// ============ Patch ============

#[rstest]
#[case::set(PatchPolicy::Set)]
#[case::replace(PatchPolicy::Replace)]
#[tokio::test]
async fn test_empty_patch_is_no_op(#[case] policy: PatchPolicy) {
    let (_, service) = service(policy);
    let id = service.create(ann()).await.unwrap();
    let before = service.get(&id).await.unwrap();

    service.patch(&id, &patch(json!({}))).await.unwrap();
    service.patch(&id, &patch(json!({"address": {}}))).await.unwrap();

    assert_eq!(service.get(&id).await.unwrap(), before);
}

#[rstest]
#[case::set(PatchPolicy::Set)]
#[case::replace(PatchPolicy::Replace)]
#[tokio::test]
async fn test_patch_age_changes_only_age(#[case] policy: PatchPolicy) {
    let (_, service) = service(policy);
    let id = service.create(ann()).await.unwrap();
    let before = service.get(&id).await.unwrap();

    service.patch(&id, &patch(json!({"age": 30}))).await.unwrap();

    let after = service.get(&id).await.unwrap();
    assert_eq!(after.age, 30);
    assert_eq!(after.name, before.name);
    assert_eq!(after.address, before.address);
}

#[rstest]
#[case::set(PatchPolicy::Set)]
#[case::replace(PatchPolicy::Replace)]
#[tokio::test]
async fn test_patch_city_keeps_country(#[case] policy: PatchPolicy) {
    let (_, service) = service(policy);
    let id = service.create(ann()).await.unwrap();

    service
        .patch(&id, &patch(json!({"address": {"city": "Mumbai"}})))
        .await
        .unwrap();

    let after = service.get(&id).await.unwrap();
    assert_eq!(after.address.city.as_deref(), Some("Mumbai"));
    assert_eq!(after.address.country.as_deref(), Some("IN"));
}

#[rstest]
#[case::set(PatchPolicy::Set)]
#[case::replace(PatchPolicy::Replace)]
#[tokio::test]
async fn test_patch_same_value_is_accepted(#[case] policy: PatchPolicy) {
    let (_, service) = service(policy);
    let id = service.create(ann()).await.unwrap();

    service.patch(&id, &patch(json!({"name": "Ann"}))).await.unwrap();
    assert_eq!(service.get(&id).await.unwrap().name, "Ann");
}

#[rstest]
#[case::set(PatchPolicy::Set)]
#[case::replace(PatchPolicy::Replace)]
#[tokio::test]
async fn test_patch_unknown_id_is_not_found(#[case] policy: PatchPolicy) {
    let (_, service) = service(policy);
    let err = service
        .patch("0123456789abcdef0123456789abcdef", &patch(json!({"age": 1})))
        .await
        .unwrap_err();
    assert_eq!(err, AppError::student_not_found());
}

#[tokio::test]
async fn test_patch_record_deleted_between_read_and_write() {
    let mut store = MockStore::new();
    store.expect_find_one().returning(|id| {
        let mut body = Document::new();
        body.insert("name".into(), json!("Ann"));
        body.insert("age".into(), json!(20));
        Ok(Some(StoredDocument::new(id, body)))
    });
    store.expect_update_one().times(1).returning(|_, _| Ok(0));

    let service = StudentServiceImpl::new(Arc::new(store), PatchPolicy::Replace);
    let err = service.patch("abc", &patch(json!({"age": 21}))).await.unwrap_err();
    assert_eq!(err, AppError::student_not_found());
}

#[tokio::test]
async fn test_set_policy_sends_only_supplied_leaves() {
    let mut store = MockStore::new();
    store
        .expect_find_one()
        .returning(|id| Ok(Some(StoredDocument::new(id, Document::new()))));
    store
        .expect_update_one()
        .withf(|id, update| {
            id.to_string() == "abc"
                && update == &Update::Set(vec![("address.country".to_string(), json!("US"))])
        })
        .times(1)
        .returning(|_, _| Ok(1));

    let service = StudentServiceImpl::new(Arc::new(store), PatchPolicy::Set);
    service
        .patch("abc", &patch(json!({"address": {"country": "US"}})))
        .await
        .unwrap();
}

// ============ Delete ============

#[tokio::test]
async fn test_second_delete_is_not_found() {
    let (store, service) = service(PatchPolicy::Set);
    let id = service.create(ann()).await.unwrap();

    service.delete(&id).await.unwrap();
    assert!(store.is_empty());
    assert_eq!(service.delete(&id).await.unwrap_err(), AppError::student_not_found());
    assert_eq!(service.get(&id).await.unwrap_err(), AppError::student_not_found());
}

// ============ Store failures ============

#[tokio::test]
async fn test_store_failures_surface_as_store_errors() {
    let mut store = MockStore::new();
    store.expect_insert().returning(|_| Err(store_down()));
    store.expect_find_one().returning(|_| Err(store_down()));
    store.expect_find_many().returning(|_| Err(store_down()));
    store.expect_delete_one().returning(|_| Err(store_down()));

    let service = StudentServiceImpl::new(Arc::new(store), PatchPolicy::Set);

    assert_eq!(service.create(ann()).await.unwrap_err(), store_down());
    assert_eq!(service.get("abc").await.unwrap_err(), store_down());
    assert_eq!(
        service.list(&StudentFilter::default()).await.unwrap_err(),
        store_down()
    );
    assert_eq!(
        service.patch("abc", &patch(json!({"age": 1}))).await.unwrap_err(),
        store_down()
    );
    assert_eq!(service.delete("abc").await.unwrap_err(), store_down());
}

#[tokio::test]
async fn test_corrupt_record_is_store_error() {
    let mut store = MockStore::new();
    store.expect_find_many().returning(|_| {
        let mut body = Document::new();
        body.insert("name".into(), json!("Ann"));
        Ok(vec![StoredDocument::new("abc", body)])
    });

    let service = StudentServiceImpl::new(Arc::new(store), PatchPolicy::Set);
    let err = service.list(&StudentFilter::default()).await.unwrap_err();
    assert!(matches!(err, AppError::Database(_)));
}
