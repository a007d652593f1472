//! # Identifier & Value Model
//!
//! Clean DTOs that every other layer is built on: opaque identifiers,
//! tagged-union property values, and the flat generic record `ModelData`.
//! These types cross every boundary: bridge ↔ predicates ↔ storage ↔ user.
//!
//! Design rule: NO schema types, NO storage types here.
//! This module is pure data — no I/O, no state, no async.

pub mod identifier;
pub mod value;
pub mod data;

pub use identifier::{EntityName, ObjectId, PropertyKey};
pub use value::{AttributeValue, RelationshipValue};
pub use data::{AttributeMap, ModelData, RelationshipMap};
