//! # modelkit — Storage-Agnostic Typed Data Modeling
//!
//! A strongly-typed object-relational modeling layer with no opinion about
//! where the data lives.
//!
//! ## Design Principles
//!
//! 1. **Trait-first**: `ModelStorage` is the contract between the model layer and storage
//! 2. **Clean DTOs**: `ModelData`, `AttributeValue`, `Predicate` cross all boundaries
//! 3. **Bridge owns nothing**: domain value → `ModelData` is a pure, schema-checked function
//! 4. **Backend-agnostic predicates**: filter trees don't know about storage
//!
//! ## Layers
//!
//! | Layer | Module | Description |
//! |-------|--------|-------------|
//! | Values | `model` | Identifiers, tagged-union values, generic records |
//! | Schema | `schema` | Per-entity attribute/relationship descriptions |
//! | Predicates | `predicate` | Filter AST, canonical rendering, evaluation |
//! | Bridge | `bridge` | Typed value ↔ `ModelData` without reflection |
//! | Storage | `storage` | Async backend contract + in-memory reference |
//!
//! ## Quick Start
//!
//! Domain types implement [`Entity`] by hand (or via codegen, out of scope
//! here), then move through any [`ModelStorage`] backend as flat
//! [`ModelData`] records:
//!
//! ```rust,ignore
//! let model = Model::new(vec![Person::entity_description()])?;
//! let store = InMemoryStore::new(model);
//!
//! let options = CodingOptions::default();
//! let ada = Person { id: 1, name: "Ada".into() };
//! store.insert(ada.to_model_data(&options)?).await?;
//!
//! let request = FetchRequest::new("Person")
//!     .with_predicate(Expression::key_path("name").eq("Ada"));
//! for record in store.fetch_all(&request).await? {
//!     println!("{}", Person::from_model_data(&record, &options)?.name);
//! }
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod schema;
pub mod predicate;
pub mod bridge;
pub mod storage;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    AttributeMap, AttributeValue, EntityName, ModelData, ObjectId, PropertyKey,
    RelationshipMap, RelationshipValue,
};

// ============================================================================
// Re-exports: Schema
// ============================================================================

pub use schema::{
    Attribute, AttributeType, EntityDescription, Model, Relationship, RelationshipType,
};

// ============================================================================
// Re-exports: Predicates
// ============================================================================

pub use predicate::{
    Comparison, ComparisonModifier, ComparisonOperator, ComparisonOption, Compound, Expression,
    KeyPath, Predicate,
};

// ============================================================================
// Re-exports: Bridge
// ============================================================================

pub use bridge::{
    AttributeDecodable, AttributeEncodable, CodingOptions, Entity, ModelDecoder, ModelEncoder,
    ObjectIdConvertible, ToManyEncoder,
};

// ============================================================================
// Re-exports: Storage
// ============================================================================

pub use storage::{FetchRequest, InMemoryStore, ModelStorage, SortDescriptor};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request named an entity the `Model` doesn't know.
    #[error("invalid entity '{0}'")]
    InvalidEntity(EntityName),

    /// No record exists for the given entity/id pair.
    #[error("no '{entity}' record with id '{id}'")]
    NotFound { entity: EntityName, id: ObjectId },

    /// A required property is absent from the `EntityDescription`,
    /// or the schema itself is inconsistent.
    #[error("schema violation at '{path}': {message}")]
    SchemaViolation { path: String, message: String },

    /// The record has no value under the requested key.
    #[error("key not found at '{path}'")]
    KeyNotFound { path: String },

    /// The stored value's case doesn't match the requested type.
    #[error("type mismatch at '{path}': expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: String,
    },

    /// A syntactically valid stored value can't be converted to the
    /// requested strong type (e.g. an identifier string that doesn't parse).
    #[error("corrupted data at '{path}': {message}")]
    DataCorrupted { path: String, message: String },

    /// Predicate evaluation hit operands it cannot compare.
    /// Never silently coerced to `false`.
    #[error("cannot evaluate comparison: {left} {operator} {right}")]
    UnsupportedComparison {
        left: String,
        operator: String,
        right: String,
    },

    /// A key path can't be resolved against a single in-memory record
    /// (e.g. traversal into another entity's attributes).
    #[error("cannot resolve key path '{0}' against a single record")]
    InvalidKeyPath(String),

    /// Backend-specific failure surfaced through `ModelStorage`.
    #[error("storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, Error>;
