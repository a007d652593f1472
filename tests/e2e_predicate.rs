//! End-to-end predicate tests: canonical rendering and evaluation against a
//! populated in-memory store.

use modelkit::{
    AttributeType, ComparisonOperator, EntityDescription, Expression, FetchRequest,
    InMemoryStore, Model, ModelData, ModelStorage, Predicate,
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
        ("1", "John Coleman", 30i64),
        ("2", "Carmen", 45),
        ("3", "Jorge", 19),
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

async fn matching_ids(store: &InMemoryStore, predicate: Predicate) -> Vec<String> {
    let request = FetchRequest::new("Person").with_predicate(predicate);
    store
        .fetch_all(&request)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.id.into_string())
        .collect()
}

// ============================================================================
// 1. Canonical rendering oracles
// ============================================================================

#[test]
fn test_simple_comparison_rendering() {
    let predicate = Expression::key_path("name").eq("Coleman");
    assert_eq!(predicate.to_string(), "name == \"Coleman\"");
}

#[test]
fn test_operator_chain_rendering() {
    let predicate = Expression::key_path("id").gt(0i64)
        & Expression::key_path("id").ne(99i64)
        & Expression::key_path("name").compare(ComparisonOperator::BeginsWith, "C");
    assert_eq!(
        predicate.to_string(),
        r#"((id > 0 AND id != 99) AND name BEGINSWITH "C")"#
    );
}

#[test]
fn test_rendering_is_descriptive_equality() {
    let a = Expression::key_path("age").ge(21i64) | Expression::key_path("name").eq("Carmen");
    let b = Predicate::or(vec![
        Expression::key_path("age").ge(21i64),
        Expression::key_path("name").eq("Carmen"),
    ]);
    assert_eq!(a.to_string(), b.to_string());
    assert_eq!(a, b);
}

// ============================================================================
// 2. Compound identities over a fixed record set
// ============================================================================

#[tokio::test]
async fn test_empty_and_selects_all() {
    let store = populated_store().await;
    let ids = matching_ids(&store, Predicate::and(vec![])).await;
    assert_eq!(ids.len(), 3);
}

#[tokio::test]
async fn test_empty_or_selects_none() {
    let store = populated_store().await;
    let ids = matching_ids(&store, Predicate::or(vec![])).await;
    assert!(ids.is_empty());
}

#[tokio::test]
async fn test_double_negation_selects_same_records() {
    let store = populated_store().await;
    let p = Expression::key_path("age").ge(21i64);
    let direct = matching_ids(&store, p.clone()).await;
    let doubled = matching_ids(&store, !!p).await;
    assert_eq!(direct, doubled);
}

// ============================================================================
// 3. Evaluation through fetch_all
// ============================================================================

#[tokio::test]
async fn test_filtering_by_comparison() {
    let store = populated_store().await;
    let adults = matching_ids(&store, Expression::key_path("age").ge(21i64)).await;
    assert_eq!(adults, vec!["1", "2"]);

    let begins = matching_ids(
        &store,
        Expression::key_path("name").compare(ComparisonOperator::BeginsWith, "C"),
    )
    .await;
    assert_eq!(begins, vec!["2"]);
}

#[tokio::test]
async fn test_compound_filtering() {
    let store = populated_store().await;
    let predicate = Expression::key_path("age").ge(21i64)
        & Expression::key_path("name").compare(ComparisonOperator::Contains, "Coleman");
    assert_eq!(matching_ids(&store, predicate).await, vec!["1"]);

    let negated = !Expression::key_path("age").ge(21i64);
    assert_eq!(matching_ids(&store, negated).await, vec!["3"]);
}

#[tokio::test]
async fn test_cross_case_comparison_fails_the_fetch() {
    let store = populated_store().await;
    let request = FetchRequest::new("Person")
        .with_predicate(Expression::key_path("age").gt(21i16));
    assert!(store.fetch_all(&request).await.is_err());
}

// ============================================================================
// 4. Serde round-trip of whole trees
// ============================================================================

#[test]
fn test_predicate_json_round_trip() {
    let predicate = !(Expression::key_path("age").ge(21i64)
        | Expression::key_path("name").compare(ComparisonOperator::Like, "C*"));
    let json = serde_json::to_string_pretty(&predicate).unwrap();
    let back: Predicate = serde_json::from_str(&json).unwrap();
    assert_eq!(back, predicate);
    assert_eq!(back.to_string(), predicate.to_string());
}
