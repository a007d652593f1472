//! The `Entity` trait: a domain type's schema metadata and its hand-written
//! bridge logic.

use crate::model::{EntityName, ModelData};
use crate::schema::EntityDescription;
use crate::Result;

use super::convert::ObjectIdConvertible;
use super::decode::ModelDecoder;
use super::encode::ModelEncoder;
use super::CodingOptions;

/// A strongly typed domain value convertible to and from `ModelData`.
///
/// Implementations declare their schema statically and write field-by-field
/// encode/decode against the containers — there is no reflection and no
/// derive; the mapping is ordinary code.
///
/// ```rust,ignore
/// impl Entity for Person {
///     type Id = u64;
///
///     fn entity_name() -> EntityName { "Person".into() }
///     fn entity_description() -> EntityDescription { /* schema */ }
///     fn id(&self) -> u64 { self.id }
///
///     fn encode(&self, encoder: &mut ModelEncoder) -> Result<()> {
///         encoder.encode_attribute("name", self.name.as_str());
///         encoder.encode_to_many("events").append_all(&self.events);
///         Ok(())
///     }
///
///     fn decode(decoder: &ModelDecoder) -> Result<Self> {
///         Ok(Self {
///             id: decoder.decode_id()?,
///             name: decoder.decode_attribute("name")?,
///             events: decoder.decode_to_many("events")?,
///         })
///     }
/// }
/// ```
pub trait Entity: Sized {
    type Id: ObjectIdConvertible;

    fn entity_name() -> EntityName;

    fn entity_description() -> EntityDescription;

    fn id(&self) -> Self::Id;

    fn encode(&self, encoder: &mut ModelEncoder) -> Result<()>;

    fn decode(decoder: &ModelDecoder<'_>) -> Result<Self>;

    /// Encode into a generic record.
    fn to_model_data(&self, options: &CodingOptions) -> Result<ModelData> {
        let mut encoder = ModelEncoder::new(
            Self::entity_description(),
            self.id().to_object_id(),
            options.clone(),
        );
        self.encode(&mut encoder)?;
        Ok(encoder.finish())
    }

    /// Decode from a generic record.
    fn from_model_data(data: &ModelData, options: &CodingOptions) -> Result<Self> {
        let decoder = ModelDecoder::new(Self::entity_description(), data, options.clone())?;
        Self::decode(&decoder)
    }
}
