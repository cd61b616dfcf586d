//! Model descriptors: the declared, typed property table of a mappable model.
//!
//! A descriptor is built once through [`DescriptorBuilder`], validated, and
//! then shared read-only by every decode of that model.

pub mod builder;
pub mod validate;

pub use builder::DescriptorBuilder;
pub use validate::validate_descriptor;

use std::any::Any;

use indexmap::IndexMap;

use crate::error::ConfigurationError;
use crate::platform::PlatformTag;
use crate::value::{RawKind, TargetType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    Int,
    Float,
}

impl PrimitiveKind {
    /// Rust type a primitive property decodes into.
    pub fn target(self) -> TargetType {
        match self {
            Self::Bool => TargetType::of::<bool>(),
            Self::Int => TargetType::of::<i64>(),
            Self::Float => TargetType::of::<f64>(),
        }
    }

    pub fn kind(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
        }
    }
}

/// Declared type of a property, before platform resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclaredType {
    Primitive(PrimitiveKind),
    String,
    /// A type only a registered transformer can construct.
    Transformable(TargetType),
    /// One transformable type per platform family.
    PlatformConditional(Vec<(PlatformTag, TargetType)>),
}

impl DeclaredType {
    pub fn bool() -> Self {
        Self::Primitive(PrimitiveKind::Bool)
    }

    pub fn int() -> Self {
        Self::Primitive(PrimitiveKind::Int)
    }

    pub fn float() -> Self {
        Self::Primitive(PrimitiveKind::Float)
    }

    pub fn string() -> Self {
        Self::String
    }

    pub fn of<T: Any>() -> Self {
        Self::Transformable(TargetType::of::<T>())
    }

    pub fn platform(table: impl IntoIterator<Item = (PlatformTag, TargetType)>) -> Self {
        Self::PlatformConditional(table.into_iter().collect())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Primitive(p) => p.kind(),
            Self::String => "str",
            Self::Transformable(_) => "custom",
            Self::PlatformConditional(_) => "platform",
        }
    }

    /// Whether values of this type can only come out of a transformer.
    pub fn needs_transformer(&self) -> bool {
        matches!(self, Self::Transformable(_) | Self::PlatformConditional(_))
    }

    /// Picks the concrete type for `platform`. Non-conditional types ignore the tag.
    pub fn resolve(
        &self,
        property: &str,
        platform: PlatformTag,
    ) -> Result<ResolvedType, ConfigurationError> {
        match self {
            Self::Primitive(p) => Ok(ResolvedType::Primitive(*p)),
            Self::String => Ok(ResolvedType::String),
            Self::Transformable(t) => Ok(ResolvedType::Custom(*t)),
            Self::PlatformConditional(table) => table
                .iter()
                .find(|(tag, _)| *tag == platform)
                .map(|(_, t)| ResolvedType::Custom(*t))
                .ok_or_else(|| ConfigurationError::UnresolvedPlatform {
                    property: property.to_string(),
                    platform,
                }),
        }
    }
}

/// Concrete type a property instantiates on one platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolvedType {
    Primitive(PrimitiveKind),
    String,
    Custom(TargetType),
}

impl ResolvedType {
    pub fn target(&self) -> TargetType {
        match self {
            Self::Primitive(p) => p.target(),
            Self::String => TargetType::of::<String>(),
            Self::Custom(t) => *t,
        }
    }

    /// Raw kind that converts into this type without a transformer.
    pub fn native_source(&self) -> Option<RawKind> {
        match self {
            Self::Primitive(PrimitiveKind::Bool) => Some(RawKind::Bool),
            Self::Primitive(_) => Some(RawKind::Number),
            Self::String => Some(RawKind::String),
            Self::Custom(_) => None,
        }
    }
}

/// Marks a property whose raw values of kind `source` go through the transformer
/// registered for (`source`, resolved type).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransformerRef {
    source: RawKind,
}

impl TransformerRef {
    pub const STRING: Self = Self::from_raw(RawKind::String);
    pub const NUMBER: Self = Self::from_raw(RawKind::Number);

    pub const fn from_raw(source: RawKind) -> Self {
        Self { source }
    }

    pub const fn source(&self) -> RawKind {
        self.source
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub name: String,
    pub declared: DeclaredType,
    pub transformer: Option<TransformerRef>,
    pub optional: bool,
}

impl PropertyDescriptor {
    pub fn resolve(&self, platform: PlatformTag) -> Result<ResolvedType, ConfigurationError> {
        self.declared.resolve(&self.name, platform)
    }
}

/// Immutable, ordered property table of one model.
#[derive(Debug, Clone)]
pub struct ModelDescriptor {
    model: String,
    properties: IndexMap<String, PropertyDescriptor>,
}

impl ModelDescriptor {
    pub(crate) fn from_parts(
        model: String,
        properties: IndexMap<String, PropertyDescriptor>,
    ) -> Self {
        Self { model, properties }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.get(name)
    }

    /// Properties in declaration order.
    pub fn properties(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.properties.values()
    }

    /// Concrete type of property `name` under `platform`.
    pub fn resolve_field_type(
        &self,
        name: &str,
        platform: PlatformTag,
    ) -> Result<ResolvedType, ConfigurationError> {
        self.get(name)
            .ok_or_else(|| ConfigurationError::UnknownProperty {
                model: self.model.clone(),
                name: name.to_string(),
            })?
            .resolve(platform)
    }
}

// Declaration order is part of a descriptor's identity.
impl PartialEq for ModelDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.model == other.model && self.properties.iter().eq(other.properties.iter())
    }
}

impl Eq for ModelDescriptor {}
