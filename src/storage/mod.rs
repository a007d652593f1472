//! # Storage Interface
//!
//! The async boundary between the data-model core and concrete backends.
//! Operations may suspend awaiting backend I/O and carry no implicit
//! cross-call ordering; transaction semantics belong to the backend.
//!
//! [`InMemoryStore`] is the reference backend, useful for tests and as a
//! template for real engines.

pub mod memory;

pub use memory::InMemoryStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::{EntityName, ModelData, ObjectId, PropertyKey};
use crate::predicate::Predicate;
use crate::{Error, Result};

// ============================================================================
// Fetch requests
// ============================================================================

/// One sort key: a property and a direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortDescriptor {
    pub property: PropertyKey,
    pub ascending: bool,
}

impl SortDescriptor {
    pub fn ascending(property: impl Into<PropertyKey>) -> Self {
        Self {
            property: property.into(),
            ascending: true,
        }
    }

    pub fn descending(property: impl Into<PropertyKey>) -> Self {
        Self {
            property: property.into(),
            ascending: false,
        }
    }
}

/// Query description: entity, optional filter, sort keys, and a window.
///
/// A `fetch_limit` of zero means unbounded. The window applies after
/// filtering and sorting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchRequest {
    pub entity: EntityName,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sort_descriptors: Vec<SortDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicate: Option<Predicate>,
    #[serde(default)]
    pub fetch_limit: usize,
    #[serde(default)]
    pub fetch_offset: usize,
}

impl FetchRequest {
    pub fn new(entity: impl Into<EntityName>) -> Self {
        Self {
            entity: entity.into(),
            sort_descriptors: Vec::new(),
            predicate: None,
            fetch_limit: 0,
            fetch_offset: 0,
        }
    }

    pub fn with_predicate(mut self, predicate: impl Into<Predicate>) -> Self {
        self.predicate = Some(predicate.into());
        self
    }

    pub fn with_sort(mut self, descriptor: SortDescriptor) -> Self {
        self.sort_descriptors.push(descriptor);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.fetch_limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.fetch_offset = offset;
        self
    }
}

// ============================================================================
// Storage trait
// ============================================================================

/// Backend-agnostic record store.
///
/// `NotFound` is reserved for callers that require presence; the trait
/// itself reports absence as `Ok(None)` / `Ok(false)` and keeps errors for
/// malformed requests (`InvalidEntity`) and backend failures.
#[async_trait]
pub trait ModelStorage: Send + Sync {
    /// Fetch one record by identifier.
    async fn fetch(&self, entity: &EntityName, id: &ObjectId) -> Result<Option<ModelData>>;

    /// Like [`fetch`](Self::fetch), but absence is `NotFound` instead of
    /// `None`, for callers that require the record to exist.
    async fn fetch_required(&self, entity: &EntityName, id: &ObjectId) -> Result<ModelData> {
        self.fetch(entity, id).await?.ok_or_else(|| Error::NotFound {
            entity: entity.clone(),
            id: id.clone(),
        })
    }

    /// Fetch all records matching a request, filtered, sorted, and windowed.
    async fn fetch_all(&self, request: &FetchRequest) -> Result<Vec<ModelData>>;

    /// Count matching records. Backends with a cheaper native count should
    /// override this.
    async fn count(&self, request: &FetchRequest) -> Result<u64> {
        Ok(self.fetch_all(request).await?.len() as u64)
    }

    /// Insert or replace a record (keyed on entity + id).
    async fn insert(&self, data: ModelData) -> Result<()>;

    /// Delete one record. `false` when it was not present.
    async fn delete(&self, entity: &EntityName, id: &ObjectId) -> Result<bool>;
}
