//! # Schema Model
//!
//! Static per-entity property descriptions. The bridge validates every
//! access against these, and backends use them to materialize native
//! schemas. Immutable once built — `Model::new` either returns a fully
//! consistent model or an error, never a partial state.
//!
//! The whole schema round-trips losslessly through serde, so a `Model` can
//! itself be persisted (e.g. as a migration artifact).

use serde::{Deserialize, Serialize};

use crate::model::{EntityName, PropertyKey};
use crate::{Error, Result};

// ============================================================================
// Attributes
// ============================================================================

/// Storage type of an attribute. Closed — not runtime-extensible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttributeType {
    Bool,
    Int16,
    Int32,
    Int64,
    Float,
    Double,
    String,
    Binary,
    Timestamp,
}

/// Description of one scalar-valued property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub key: PropertyKey,
    #[serde(rename = "type")]
    pub kind: AttributeType,
}

impl Attribute {
    pub fn new(key: impl Into<PropertyKey>, kind: AttributeType) -> Self {
        Self { key: key.into(), kind }
    }
}

// ============================================================================
// Relationships
// ============================================================================

/// Arity of a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationshipType {
    ToOne,
    ToMany,
}

/// Description of one reference-valued property.
///
/// The named inverse on `destination_entity` must reference back to the
/// origin entity; `Model::new` checks this instead of leaving it as a
/// documentation-only contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub key: PropertyKey,
    #[serde(rename = "type")]
    pub kind: RelationshipType,
    pub destination_entity: EntityName,
    pub inverse_relationship: PropertyKey,
}

impl Relationship {
    pub fn new(
        key: impl Into<PropertyKey>,
        kind: RelationshipType,
        destination_entity: impl Into<EntityName>,
        inverse_relationship: impl Into<PropertyKey>,
    ) -> Self {
        Self {
            key: key.into(),
            kind,
            destination_entity: destination_entity.into(),
            inverse_relationship: inverse_relationship.into(),
        }
    }
}

// ============================================================================
// EntityDescription
// ============================================================================

/// Schema of one entity: its name plus attribute and relationship lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDescription {
    pub id: EntityName,
    pub attributes: Vec<Attribute>,
    pub relationships: Vec<Relationship>,
}

impl EntityDescription {
    pub fn new(id: impl Into<EntityName>) -> Self {
        Self {
            id: id.into(),
            attributes: Vec::new(),
            relationships: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<PropertyKey>, kind: AttributeType) -> Self {
        self.attributes.push(Attribute::new(key, kind));
        self
    }

    pub fn with_relationship(mut self, relationship: Relationship) -> Self {
        self.relationships.push(relationship);
        self
    }

    /// Look up an attribute by key. Returns `None`, never errors.
    pub fn attribute(&self, key: &PropertyKey) -> Option<&Attribute> {
        self.attributes.iter().find(|a| &a.key == key)
    }

    /// Look up a relationship by key. Returns `None`, never errors.
    pub fn relationship(&self, key: &PropertyKey) -> Option<&Relationship> {
        self.relationships.iter().find(|r| &r.key == key)
    }
}

// ============================================================================
// Model
// ============================================================================

/// Ordered set of entity descriptions with lookup by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    entities: Vec<EntityDescription>,
}

impl Model {
    /// Build a model, validating cross-entity consistency:
    ///
    /// - entity names are unique
    /// - attribute and relationship key sets are disjoint per entity
    /// - every relationship's destination entity exists
    /// - the named inverse exists on the destination and points back
    pub fn new(entities: Vec<EntityDescription>) -> Result<Self> {
        let model = Self { entities };
        model.validate()?;
        Ok(model)
    }

    /// Skip validation. For schemas deserialized from a trusted artifact.
    pub fn new_unchecked(entities: Vec<EntityDescription>) -> Self {
        Self { entities }
    }

    pub fn entity(&self, name: &EntityName) -> Option<&EntityDescription> {
        self.entities.iter().find(|e| &e.id == name)
    }

    pub fn entities(&self) -> &[EntityDescription] {
        &self.entities
    }

    fn validate(&self) -> Result<()> {
        for (index, entity) in self.entities.iter().enumerate() {
            if self.entities[..index].iter().any(|e| e.id == entity.id) {
                return Err(Error::SchemaViolation {
                    path: entity.id.to_string(),
                    message: "duplicate entity name".into(),
                });
            }
            for relationship in &entity.relationships {
                let path = format!("{}.{}", entity.id, relationship.key);
                if entity.attribute(&relationship.key).is_some() {
                    return Err(Error::SchemaViolation {
                        path,
                        message: "key is declared as both attribute and relationship".into(),
                    });
                }
                let destination = self
                    .entity(&relationship.destination_entity)
                    .ok_or_else(|| Error::SchemaViolation {
                        path: path.clone(),
                        message: format!(
                            "destination entity '{}' does not exist",
                            relationship.destination_entity
                        ),
                    })?;
                let inverse = destination
                    .relationship(&relationship.inverse_relationship)
                    .ok_or_else(|| Error::SchemaViolation {
                        path: path.clone(),
                        message: format!(
                            "inverse relationship '{}' not found on '{}'",
                            relationship.inverse_relationship, destination.id
                        ),
                    })?;
                if inverse.destination_entity != entity.id
                    || inverse.inverse_relationship != relationship.key
                {
                    return Err(Error::SchemaViolation {
                        path,
                        message: format!(
                            "inverse relationship '{}.{}' does not reference back",
                            destination.id, inverse.key
                        ),
                    });
                }
            }
        }
        Ok(())
    }
}
