//! # Encode/Decode Bridge
//!
//! Converts strongly typed domain values to and from [`ModelData`] without
//! reflection. A domain type implements [`Entity`] and hand-writes its
//! `encode`/`decode` against the two container types:
//!
//! | Container | Type | Shape |
//! |-----------|------|-------|
//! | Keyed (root only) | [`ModelEncoder`] / [`ModelDecoder`] | one flat record |
//! | Unkeyed | [`ToManyEncoder`] | to-many identifier sequence |
//! | Single value | [`AttributeEncodable`] / [`ObjectIdConvertible`] | one scalar or identifier |
//!
//! Records are flat, so keyed containers never nest. Exactly two silent
//! recoveries exist: unknown keys are dropped on encode, and an absent
//! to-many decodes as empty. Everything else fails with the coding path
//! attached.
//!
//! [`ModelData`]: crate::model::ModelData

pub mod convert;
pub mod decode;
pub mod encode;
pub mod entity;

pub use convert::{AttributeDecodable, AttributeEncodable, ObjectIdConvertible};
pub use decode::ModelDecoder;
pub use encode::{ModelEncoder, ToManyEncoder};
pub use entity::Entity;

use crate::model::PropertyKey;

/// Bridge configuration, passed explicitly at encode/decode time.
///
/// `identifier_key` names the field a domain type exposes its identifier
/// under. The identifier never lives in the attribute map; it is routed to
/// and from `ModelData.id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodingOptions {
    pub identifier_key: PropertyKey,
}

impl Default for CodingOptions {
    fn default() -> Self {
        Self {
            identifier_key: PropertyKey::from("id"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_identifier_key() {
        assert_eq!(CodingOptions::default().identifier_key.as_str(), "id");
    }
}
