//! `ModelData` — the flat generic record.
//!
//! One schema instance: entity + id + attribute map + relationship map.
//! Produced by the encode bridge, consumed by storage backends and the
//! predicate evaluator. Treated as an immutable value once built; the
//! mutating setters exist for the bridge and for backends materializing
//! records.

use serde::{Deserialize, Serialize};

use super::{AttributeValue, EntityName, ObjectId, PropertyKey, RelationshipValue};

/// Map of attribute keys to scalar values.
pub type AttributeMap = hashbrown::HashMap<PropertyKey, AttributeValue>;

/// Map of relationship keys to reference values.
pub type RelationshipMap = hashbrown::HashMap<PropertyKey, RelationshipValue>;

/// Generic, storage-agnostic representation of one entity instance.
///
/// Keys present in the maps should appear in the matching
/// `EntityDescription`: the encoder enforces this (unknown keys are
/// silently dropped), the decoder tolerates extras.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelData {
    pub entity: EntityName,
    pub id: ObjectId,
    pub attributes: AttributeMap,
    pub relationships: RelationshipMap,
}

impl ModelData {
    pub fn new(entity: impl Into<EntityName>, id: impl Into<ObjectId>) -> Self {
        Self {
            entity: entity.into(),
            id: id.into(),
            attributes: AttributeMap::new(),
            relationships: RelationshipMap::new(),
        }
    }

    pub fn with_attribute(
        mut self,
        key: impl Into<PropertyKey>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_relationship(
        mut self,
        key: impl Into<PropertyKey>,
        value: impl Into<RelationshipValue>,
    ) -> Self {
        self.relationships.insert(key.into(), value.into());
        self
    }

    pub fn attribute(&self, key: &PropertyKey) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    pub fn relationship(&self, key: &PropertyKey) -> Option<&RelationshipValue> {
        self.relationships.get(key)
    }
}
