//! Decoding: `ModelData` → typed domain value.
//!
//! `ModelDecoder` is the keyed read container over one record. It is strict
//! where the encoder is lenient: every failure carries the coding path, and
//! the only silent recovery is an absent to-many reading as empty.

use crate::model::{AttributeValue, ModelData, PropertyKey, RelationshipValue};
use crate::schema::EntityDescription;
use crate::{Error, Result};

use super::convert::{AttributeDecodable, ObjectIdConvertible};
use super::CodingOptions;

/// Keyed decoding container over one record.
#[derive(Debug)]
pub struct ModelDecoder<'a> {
    description: EntityDescription,
    options: CodingOptions,
    data: &'a ModelData,
}

impl<'a> ModelDecoder<'a> {
    /// Fails with `InvalidEntity` when the record belongs to a different
    /// entity than the description.
    pub fn new(
        description: EntityDescription,
        data: &'a ModelData,
        options: CodingOptions,
    ) -> Result<Self> {
        if data.entity != description.id {
            return Err(Error::InvalidEntity(data.entity.clone()));
        }
        Ok(Self {
            description,
            options,
            data,
        })
    }

    fn path(&self, key: &PropertyKey) -> String {
        format!("{}.{}", self.data.entity, key)
    }

    /// Read the record identifier as the typed id.
    pub fn decode_id<T: ObjectIdConvertible>(&self) -> Result<T> {
        T::from_object_id(&self.data.id).ok_or_else(|| Error::DataCorrupted {
            path: self.path(&self.options.identifier_key),
            message: format!("identifier '{}' does not parse", self.data.id),
        })
    }

    /// Read one required attribute. The identifier key reads from
    /// `ModelData.id`, never the attribute map.
    pub fn decode_attribute<T: AttributeDecodable>(
        &self,
        key: impl Into<PropertyKey>,
    ) -> Result<T> {
        let key = key.into();
        if key == self.options.identifier_key {
            let value = AttributeValue::String(self.data.id.as_str().to_owned());
            return T::from_attribute_value(&value).ok_or_else(|| Error::TypeMismatch {
                path: self.path(&key),
                expected: std::any::type_name::<T>(),
                found: value.type_name().to_owned(),
            });
        }
        let value = self
            .data
            .attribute(&key)
            .ok_or_else(|| Error::KeyNotFound {
                path: self.path(&key),
            })?;
        T::from_attribute_value(value).ok_or_else(|| Error::TypeMismatch {
            path: self.path(&key),
            expected: std::any::type_name::<T>(),
            found: value.type_name().to_owned(),
        })
    }

    /// Read an attribute that may be absent or null.
    pub fn decode_optional_attribute<T: AttributeDecodable>(
        &self,
        key: impl Into<PropertyKey>,
    ) -> Result<Option<T>> {
        let key = key.into();
        match self.data.attribute(&key) {
            None | Some(AttributeValue::Null) => Ok(None),
            Some(value) => T::from_attribute_value(value)
                .map(Some)
                .ok_or_else(|| Error::TypeMismatch {
                    path: self.path(&key),
                    expected: std::any::type_name::<T>(),
                    found: value.type_name().to_owned(),
                }),
        }
    }

    /// Read one required to-one relationship. Absence (missing key or null)
    /// is key-not-found; a to-many value under the key is an arity mismatch.
    pub fn decode_to_one<T: ObjectIdConvertible>(&self, key: impl Into<PropertyKey>) -> Result<T> {
        let key = key.into();
        match self.data.relationship(&key) {
            None | Some(RelationshipValue::Null) => Err(Error::KeyNotFound {
                path: self.path(&key),
            }),
            Some(RelationshipValue::ToOne(id)) => {
                T::from_object_id(id).ok_or_else(|| Error::DataCorrupted {
                    path: self.path(&key),
                    message: format!("identifier '{id}' does not parse"),
                })
            }
            Some(value @ RelationshipValue::ToMany(_)) => Err(Error::TypeMismatch {
                path: self.path(&key),
                expected: "toOne",
                found: value.type_name().to_owned(),
            }),
        }
    }

    /// Read an optional to-one relationship.
    pub fn decode_optional_to_one<T: ObjectIdConvertible>(
        &self,
        key: impl Into<PropertyKey>,
    ) -> Result<Option<T>> {
        let key = key.into();
        match self.data.relationship(&key) {
            None | Some(RelationshipValue::Null) => Ok(None),
            _ => self.decode_to_one(key).map(Some),
        }
    }

    /// Read a to-many relationship. Absence (missing key or null) reads as
    /// empty — the documented leniency.
    pub fn decode_to_many<T: ObjectIdConvertible>(
        &self,
        key: impl Into<PropertyKey>,
    ) -> Result<Vec<T>> {
        let key = key.into();
        match self.data.relationship(&key) {
            None | Some(RelationshipValue::Null) => Ok(Vec::new()),
            Some(RelationshipValue::ToMany(ids)) => ids
                .iter()
                .enumerate()
                .map(|(index, id)| {
                    T::from_object_id(id).ok_or_else(|| Error::DataCorrupted {
                        path: format!("{}.{index}", self.path(&key)),
                        message: format!("identifier '{id}' does not parse"),
                    })
                })
                .collect(),
            Some(value @ RelationshipValue::ToOne(_)) => Err(Error::TypeMismatch {
                path: self.path(&key),
                expected: "toMany",
                found: value.type_name().to_owned(),
            }),
        }
    }

    pub fn description(&self) -> &EntityDescription {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ObjectId;
    use crate::schema::{AttributeType, Relationship, RelationshipType};

    fn person() -> EntityDescription {
        EntityDescription::new("Person")
            .with_attribute("name", AttributeType::String)
            .with_attribute("age", AttributeType::Int64)
            .with_relationship(Relationship::new(
                "events",
                RelationshipType::ToMany,
                "Event",
                "people",
            ))
            .with_relationship(Relationship::new(
                "employer",
                RelationshipType::ToOne,
                "Company",
                "staff",
            ))
    }

    fn record() -> ModelData {
        ModelData::new("Person", "42")
            .with_attribute("name", "Ada")
            .with_relationship("events", vec![ObjectId::from("10")])
    }

    #[test]
    fn test_entity_mismatch_is_rejected() {
        let data = ModelData::new("Event", "1");
        assert!(matches!(
            ModelDecoder::new(person(), &data, CodingOptions::default()),
            Err(Error::InvalidEntity(_))
        ));
    }

    #[test]
    fn test_identifier_reads_from_record_id() {
        let data = record();
        let decoder = ModelDecoder::new(person(), &data, CodingOptions::default()).unwrap();
        assert_eq!(decoder.decode_id::<u64>().unwrap(), 42);
        assert_eq!(decoder.decode_attribute::<String>("id").unwrap(), "42");
    }

    #[test]
    fn test_missing_attribute_is_key_not_found() {
        let data = record();
        let decoder = ModelDecoder::new(person(), &data, CodingOptions::default()).unwrap();
        assert!(matches!(
            decoder.decode_attribute::<i64>("age"),
            Err(Error::KeyNotFound { .. })
        ));
        assert_eq!(decoder.decode_optional_attribute::<i64>("age").unwrap(), None);
    }

    #[test]
    fn test_case_mismatch_carries_path() {
        let data = record();
        let decoder = ModelDecoder::new(person(), &data, CodingOptions::default()).unwrap();
        match decoder.decode_attribute::<i64>("name") {
            Err(Error::TypeMismatch { path, found, .. }) => {
                assert_eq!(path, "Person.name");
                assert_eq!(found, "string");
            }
            other => panic!("expected type mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_absent_to_many_reads_empty() {
        let data = ModelData::new("Person", "1");
        let decoder = ModelDecoder::new(person(), &data, CodingOptions::default()).unwrap();
        let events: Vec<ObjectId> = decoder.decode_to_many("events").unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_absent_to_one_is_key_not_found() {
        let data = record();
        let decoder = ModelDecoder::new(person(), &data, CodingOptions::default()).unwrap();
        assert!(matches!(
            decoder.decode_to_one::<ObjectId>("employer"),
            Err(Error::KeyNotFound { .. })
        ));
        assert_eq!(
            decoder.decode_optional_to_one::<ObjectId>("employer").unwrap(),
            None
        );
    }

    #[test]
    fn test_arity_mismatch_is_type_mismatch() {
        let data = record();
        let decoder = ModelDecoder::new(person(), &data, CodingOptions::default()).unwrap();
        assert!(matches!(
            decoder.decode_to_one::<ObjectId>("events"),
            Err(Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_unparsable_identifier_is_data_corrupted() {
        let data = ModelData::new("Person", "not-a-number");
        let decoder = ModelDecoder::new(person(), &data, CodingOptions::default()).unwrap();
        match decoder.decode_id::<u64>() {
            Err(Error::DataCorrupted { path, .. }) => assert_eq!(path, "Person.id"),
            other => panic!("expected data corrupted, got {other:?}"),
        }
    }

    #[test]
    fn test_corrupt_to_many_element_carries_indexed_path() {
        let data = ModelData::new("Person", "1")
            .with_relationship("events", vec![ObjectId::from("10"), ObjectId::from("x")]);
        let decoder = ModelDecoder::new(person(), &data, CodingOptions::default()).unwrap();
        match decoder.decode_to_many::<u64>("events") {
            Err(Error::DataCorrupted { path, .. }) => assert_eq!(path, "Person.events.1"),
            other => panic!("expected data corrupted, got {other:?}"),
        }
    }
}
