//! Opaque string identifiers for entities, properties, and instances.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self(raw.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self(raw)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id! {
    /// Name of an entity type, unique within a `Model`.
    EntityName
}

string_id! {
    /// Name of an attribute or relationship on one entity.
    ///
    /// The attribute key set and relationship key set of an entity are
    /// disjoint; `Model::new` enforces this.
    PropertyKey
}

string_id! {
    /// Opaque identifier of one entity instance, stable for its lifetime.
    ///
    /// Doubles as the encoded form of foreign references: a relationship
    /// never embeds the destination record, only its `ObjectId`.
    ObjectId
}
