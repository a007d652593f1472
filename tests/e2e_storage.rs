//! End-to-end storage tests: fetch windows, sorting, and the default
//! `count` implementation.

use async_trait::async_trait;
use modelkit::{
    AttributeType, EntityDescription, EntityName, Expression, FetchRequest, InMemoryStore, Model,
    ModelData, ModelStorage, ObjectId, Result, SortDescriptor,
};
use pretty_assertions::assert_eq;

fn model() -> Model {
    Model::new(vec![EntityDescription::new("Person")
        .with_attribute("name", AttributeType::String)
        .with_attribute("age", AttributeType::Int64)])
    .unwrap()
}

async fn populated_store() -> InMemoryStore {
    let store = InMemoryStore::new(model());
    for (id, name, age) in [
        ("1", "Ada", 36i64),
        ("2", "Grace", 45),
        ("3", "Edsger", 28),
        ("4", "Barbara", 52),
    ] {
        store
            .insert(
                ModelData::new("Person", id)
                    .with_attribute("name", name)
                    .with_attribute("age", age),
            )
            .await
            .unwrap();
    }
    store
}

fn names(records: &[ModelData]) -> Vec<&str> {
    records
        .iter()
        .filter_map(|r| r.attribute(&"name".into())?.as_str())
        .collect()
}

// ============================================================================
// 1. Sorting and windowing
// ============================================================================

#[tokio::test]
async fn test_sort_ascending_and_descending() {
    let store = populated_store().await;

    let request = FetchRequest::new("Person").with_sort(SortDescriptor::ascending("age"));
    let records = store.fetch_all(&request).await.unwrap();
    assert_eq!(names(&records), vec!["Edsger", "Ada", "Grace", "Barbara"]);

    let request = FetchRequest::new("Person").with_sort(SortDescriptor::descending("name"));
    let records = store.fetch_all(&request).await.unwrap();
    assert_eq!(names(&records), vec!["Grace", "Edsger", "Barbara", "Ada"]);
}

#[tokio::test]
async fn test_window_applies_after_filter_and_sort() {
    let store = populated_store().await;

    let request = FetchRequest::new("Person")
        .with_predicate(Expression::key_path("age").ge(30i64))
        .with_sort(SortDescriptor::ascending("age"))
        .with_offset(1)
        .with_limit(1);
    let records = store.fetch_all(&request).await.unwrap();
    assert_eq!(names(&records), vec!["Grace"]);
}

#[tokio::test]
async fn test_offset_past_end_is_empty() {
    let store = populated_store().await;
    let request = FetchRequest::new("Person").with_offset(10);
    assert!(store.fetch_all(&request).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_zero_limit_is_unbounded() {
    let store = populated_store().await;
    let request = FetchRequest::new("Person").with_limit(0);
    assert_eq!(store.fetch_all(&request).await.unwrap().len(), 4);
}

// ============================================================================
// 2. Required fetch
// ============================================================================

#[tokio::test]
async fn test_fetch_required_distinguishes_absence() {
    let store = populated_store().await;
    assert!(store
        .fetch_required(&"Person".into(), &"1".into())
        .await
        .is_ok());
    assert!(matches!(
        store.fetch_required(&"Person".into(), &"99".into()).await,
        Err(modelkit::Error::NotFound { .. })
    ));
    assert!(matches!(
        store.fetch_required(&"Robot".into(), &"1".into()).await,
        Err(modelkit::Error::InvalidEntity(_))
    ));
}

// ============================================================================
// 3. Default count over a minimal backend
// ============================================================================

/// Implements only the required methods; `count` comes from the trait
/// default and must agree with `fetch_all` for any request.
struct MinimalStore {
    inner: InMemoryStore,
}

#[async_trait]
impl ModelStorage for MinimalStore {
    async fn fetch(&self, entity: &EntityName, id: &ObjectId) -> Result<Option<ModelData>> {
        self.inner.fetch(entity, id).await
    }

    async fn fetch_all(&self, request: &FetchRequest) -> Result<Vec<ModelData>> {
        self.inner.fetch_all(request).await
    }

    async fn insert(&self, data: ModelData) -> Result<()> {
        self.inner.insert(data).await
    }

    async fn delete(&self, entity: &EntityName, id: &ObjectId) -> Result<bool> {
        self.inner.delete(entity, id).await
    }
}

#[tokio::test]
async fn test_default_count_matches_fetch_all() {
    let store = MinimalStore {
        inner: populated_store().await,
    };

    let requests = [
        FetchRequest::new("Person"),
        FetchRequest::new("Person").with_predicate(Expression::key_path("age").ge(30i64)),
        FetchRequest::new("Person").with_limit(2),
        FetchRequest::new("Person").with_offset(3),
    ];
    for request in requests {
        let fetched = store.fetch_all(&request).await.unwrap().len() as u64;
        let counted = store.count(&request).await.unwrap();
        assert_eq!(counted, fetched);
    }
}
