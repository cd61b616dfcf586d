//! The mappable-model capability.

use crate::descriptor::ModelDescriptor;
use crate::error::{ConfigurationError, FieldError};
use crate::platform::PlatformTag;
use crate::value::Fields;

/// A type that can be populated from, and exported to, a JSON object.
///
/// `describe` declares the property table; the mapper resolves it once and
/// hands each decode a [`Fields`] table holding one typed value per present
/// property, keyed by property name.
///
/// Platform-conditional properties resolve against [`JsonModel::PLATFORM`],
/// which defaults to the platform family the crate is compiled for. A model
/// whose fields hold one family's types names that family here.
///
/// ```
/// use json_model::{DeclaredType, DescriptorBuilder, Fields, JsonModel};
/// use json_model::{ConfigurationError, FieldError, ModelDescriptor};
///
/// struct Label {
///     text: String,
///     size: Option<i64>,
/// }
///
/// impl JsonModel for Label {
///     fn describe() -> Result<ModelDescriptor, ConfigurationError> {
///         let mut b = DescriptorBuilder::new("Label");
///         b.declare_property("text", DeclaredType::string(), None)?
///             .declare_optional_property("size", DeclaredType::int(), None)?;
///         b.build()
///     }
///
///     fn from_fields(fields: &mut Fields) -> Result<Self, FieldError> {
///         Ok(Self {
///             text: fields.take("text")?,
///             size: fields.take_opt("size")?,
///         })
///     }
///
///     fn to_fields(&self) -> Fields {
///         let mut fields = Fields::new();
///         fields.insert("text", self.text.clone()).insert_opt("size", self.size);
///         fields
///     }
/// }
/// ```
pub trait JsonModel: Sized + 'static {
    /// Platform family the model's field types belong to.
    const PLATFORM: PlatformTag = PlatformTag::current();

    fn describe() -> Result<ModelDescriptor, ConfigurationError>;

    fn from_fields(fields: &mut Fields) -> Result<Self, FieldError>;

    fn to_fields(&self) -> Fields;
}
