//! Encoding: typed domain value → `ModelData`.
//!
//! `ModelEncoder` is the root keyed container: single-use, sequential, one
//! mutation per field in declaration order. Keys are validated against the
//! entity description — a key in neither namespace is silently dropped, the
//! forward/backward-compatibility escape hatch for schema drift.

use tracing::trace;

use crate::model::{ModelData, ObjectId, PropertyKey, RelationshipValue};
use crate::schema::EntityDescription;

use super::convert::{AttributeEncodable, ObjectIdConvertible};
use super::CodingOptions;

/// Root keyed encoding container for one record.
#[derive(Debug)]
pub struct ModelEncoder {
    description: EntityDescription,
    options: CodingOptions,
    data: ModelData,
}

impl ModelEncoder {
    pub fn new(description: EntityDescription, id: ObjectId, options: CodingOptions) -> Self {
        let data = ModelData::new(description.id.clone(), id);
        Self {
            description,
            options,
            data,
        }
    }

    /// Write one attribute. The identifier key is routed to `ModelData.id`
    /// at construction and skipped here; undeclared keys are dropped.
    pub fn encode_attribute<T>(&mut self, key: impl Into<PropertyKey>, value: &T)
    where
        T: AttributeEncodable + ?Sized,
    {
        let key = key.into();
        if key == self.options.identifier_key {
            return;
        }
        if self.description.attribute(&key).is_none() {
            trace!(entity = %self.data.entity, %key, "dropping undeclared attribute key");
            return;
        }
        self.data.attributes.insert(key, value.attribute_value());
    }

    /// Write one to-one relationship as an identifier reference.
    pub fn encode_to_one<T: ObjectIdConvertible>(&mut self, key: impl Into<PropertyKey>, value: &T) {
        let key = key.into();
        if self.description.relationship(&key).is_none() {
            trace!(entity = %self.data.entity, %key, "dropping undeclared relationship key");
            return;
        }
        self.data
            .relationships
            .insert(key, RelationshipValue::ToOne(value.to_object_id()));
    }

    /// Explicit absence: writes the null of whichever namespace declares the
    /// key.
    pub fn encode_none(&mut self, key: impl Into<PropertyKey>) {
        let key = key.into();
        if key == self.options.identifier_key {
            return;
        }
        if self.description.attribute(&key).is_some() {
            self.data
                .attributes
                .insert(key, crate::model::AttributeValue::Null);
        } else if self.description.relationship(&key).is_some() {
            self.data.relationships.insert(key, RelationshipValue::Null);
        } else {
            trace!(entity = %self.data.entity, %key, "dropping undeclared key");
        }
    }

    /// Open the unkeyed container for a to-many relationship. Identifiers
    /// accumulate in the container and land in the record as one atomic
    /// write when it goes out of scope.
    pub fn encode_to_many(&mut self, key: impl Into<PropertyKey>) -> ToManyEncoder<'_> {
        let key = key.into();
        let declared = self.description.relationship(&key).is_some();
        if !declared {
            trace!(entity = %self.data.entity, %key, "dropping undeclared relationship key");
        }
        ToManyEncoder {
            encoder: self,
            key,
            ids: Vec::new(),
            declared,
        }
    }

    /// Consume the encoder, yielding the finished record.
    pub fn finish(self) -> ModelData {
        self.data
    }
}

/// Unkeyed encoding container accumulating a to-many identifier sequence.
///
/// Nothing is visible in the record until the container closes; dropping it
/// commits the accumulated sequence in one replace.
#[derive(Debug)]
pub struct ToManyEncoder<'a> {
    encoder: &'a mut ModelEncoder,
    key: PropertyKey,
    ids: Vec<ObjectId>,
    declared: bool,
}

impl ToManyEncoder<'_> {
    pub fn append<T: ObjectIdConvertible>(&mut self, value: &T) {
        self.ids.push(value.to_object_id());
    }

    pub fn append_all<'v, T, I>(&mut self, values: I)
    where
        T: ObjectIdConvertible + 'v,
        I: IntoIterator<Item = &'v T>,
    {
        for value in values {
            self.append(value);
        }
    }

    /// Explicit commit point; equivalent to dropping the container.
    pub fn finish(self) {}
}

impl Drop for ToManyEncoder<'_> {
    fn drop(&mut self) {
        if !self.declared {
            return;
        }
        self.encoder.data.relationships.insert(
            self.key.clone(),
            RelationshipValue::ToMany(std::mem::take(&mut self.ids)),
        );
    }
}
