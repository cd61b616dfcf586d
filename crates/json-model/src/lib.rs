//! Declarative JSON model descriptors with a typed value-transformer registry.
//!
//! - [`descriptor`]: property tables, including platform-conditional types
//! - [`transformer`]: import/export transformers keyed by (raw kind, target type)
//! - [`mapper`]: decodes payloads into [`JsonModel`] instances and encodes them back
//! - [`key_mapper`]: property name to payload key mapping

pub mod constants;
pub mod descriptor;
pub mod error;
pub mod key_mapper;
pub mod mapper;
pub mod model;
pub mod platform;
pub mod transformer;
pub mod value;

pub use constants::FieldErrorCode;
pub use descriptor::{
    DeclaredType, DescriptorBuilder, ModelDescriptor, PrimitiveKind, PropertyDescriptor,
    ResolvedType, TransformerRef,
};
pub use error::{
    ConfigurationError, DecodeError, EncodeError, FieldError, FieldErrorKind, TransformError,
};
pub use key_mapper::KeyMapper;
pub use mapper::{Mapper, MapperOptions, PreparedModel};
pub use model::JsonModel;
pub use platform::PlatformTag;
pub use transformer::TransformerRegistry;
pub use value::{FieldValue, Fields, RawKind, TargetType};
