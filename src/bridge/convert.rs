//! Single-value conversion capabilities.
//!
//! Each supported primitive maps onto exactly one `AttributeValue` case, and
//! the mapping is resolved at compile time — there is no "unknown primitive"
//! fallback. Identifiers go through [`ObjectIdConvertible`], which is the
//! single-value container for relationship targets and record ids.

use chrono::{DateTime, Utc};
use url::Url;
use uuid::Uuid;

use crate::model::{AttributeValue, ObjectId};

// ============================================================================
// Attribute conversion
// ============================================================================

/// Produces the `AttributeValue` case for one primitive. Infallible.
pub trait AttributeEncodable {
    fn attribute_value(&self) -> AttributeValue;
}

/// Reads a primitive back out of its `AttributeValue` case. `None` on a
/// case mismatch; the decoder turns that into a type-mismatch error with the
/// coding path.
pub trait AttributeDecodable: Sized {
    fn from_attribute_value(value: &AttributeValue) -> Option<Self>;
}

macro_rules! attribute_convertible {
    ($($ty:ty => $case:ident via $mid:ty),* $(,)?) => {
        $(
            impl AttributeEncodable for $ty {
                fn attribute_value(&self) -> AttributeValue {
                    AttributeValue::$case(*self as $mid)
                }
            }
            impl AttributeDecodable for $ty {
                fn from_attribute_value(value: &AttributeValue) -> Option<Self> {
                    match value {
                        AttributeValue::$case(v) => <$ty>::try_from(*v).ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

// Unsized integers widen into the next signed case that holds their range.
attribute_convertible! {
    i8 => Int16 via i16,
    i16 => Int16 via i16,
    i32 => Int32 via i32,
    i64 => Int64 via i64,
    u8 => Int16 via i16,
    u16 => Int32 via i32,
    u32 => Int64 via i64,
}

// u64 exceeds every signed case; it round-trips through the int64 bit
// pattern instead.
impl AttributeEncodable for u64 {
    fn attribute_value(&self) -> AttributeValue {
        AttributeValue::Int64(*self as i64)
    }
}

impl AttributeDecodable for u64 {
    fn from_attribute_value(value: &AttributeValue) -> Option<Self> {
        match value {
            AttributeValue::Int64(v) => Some(*v as u64),
            _ => None,
        }
    }
}

macro_rules! attribute_convertible_clone {
    ($($ty:ty => $case:ident),* $(,)?) => {
        $(
            impl AttributeEncodable for $ty {
                fn attribute_value(&self) -> AttributeValue {
                    AttributeValue::$case(self.clone())
                }
            }
            impl AttributeDecodable for $ty {
                fn from_attribute_value(value: &AttributeValue) -> Option<Self> {
                    match value {
                        AttributeValue::$case(v) => Some(v.clone()),
                        _ => None,
                    }
                }
            }
        )*
    };
}

attribute_convertible_clone! {
    bool => Bool,
    f32 => Float,
    f64 => Double,
    String => String,
    Vec<u8> => Binary,
    DateTime<Utc> => Timestamp,
    Uuid => Uuid,
    Url => Url,
}

impl AttributeEncodable for str {
    fn attribute_value(&self) -> AttributeValue {
        AttributeValue::String(self.to_owned())
    }
}

impl<T: AttributeEncodable> AttributeEncodable for Option<T> {
    fn attribute_value(&self) -> AttributeValue {
        match self {
            Some(value) => value.attribute_value(),
            None => AttributeValue::Null,
        }
    }
}

impl<T: AttributeDecodable> AttributeDecodable for Option<T> {
    fn from_attribute_value(value: &AttributeValue) -> Option<Self> {
        match value {
            AttributeValue::Null => Some(None),
            value => T::from_attribute_value(value).map(Some),
        }
    }
}

// ============================================================================
// Identifier conversion
// ============================================================================

/// A typed identifier convertible to and from the opaque string `ObjectId`.
pub trait ObjectIdConvertible: Sized {
    fn to_object_id(&self) -> ObjectId;

    /// `None` when the stored identifier does not parse as this type; the
    /// decoder reports that as data corruption.
    fn from_object_id(id: &ObjectId) -> Option<Self>;
}

impl ObjectIdConvertible for ObjectId {
    fn to_object_id(&self) -> ObjectId {
        self.clone()
    }

    fn from_object_id(id: &ObjectId) -> Option<Self> {
        Some(id.clone())
    }
}

impl ObjectIdConvertible for String {
    fn to_object_id(&self) -> ObjectId {
        ObjectId::from(self.as_str())
    }

    fn from_object_id(id: &ObjectId) -> Option<Self> {
        Some(id.as_str().to_owned())
    }
}

impl ObjectIdConvertible for Uuid {
    fn to_object_id(&self) -> ObjectId {
        ObjectId::from(self.hyphenated().to_string().to_uppercase())
    }

    fn from_object_id(id: &ObjectId) -> Option<Self> {
        id.as_str().parse().ok()
    }
}

macro_rules! object_id_via_display {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ObjectIdConvertible for $ty {
                fn to_object_id(&self) -> ObjectId {
                    ObjectId::from(self.to_string())
                }

                fn from_object_id(id: &ObjectId) -> Option<Self> {
                    id.as_str().parse().ok()
                }
            }
        )*
    };
}

object_id_via_display!(u16, u32, u64, i16, i32, i64);
