//! Collects property declarations into a ModelDescriptor.

use indexmap::IndexMap;

use super::validate::validate_descriptor;
use super::{DeclaredType, ModelDescriptor, PropertyDescriptor, TransformerRef};
use crate::error::ConfigurationError;

#[derive(Debug, Clone)]
pub struct DescriptorBuilder {
    model: String,
    properties: IndexMap<String, PropertyDescriptor>,
}

impl DescriptorBuilder {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            properties: IndexMap::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Declares a required property. Fails if `name` is already declared.
    pub fn declare_property(
        &mut self,
        name: impl Into<String>,
        declared: DeclaredType,
        transformer: Option<TransformerRef>,
    ) -> Result<&mut Self, ConfigurationError> {
        self.declare(name.into(), declared, transformer, false)
    }

    /// Declares a property that may be absent or `null` in the payload.
    pub fn declare_optional_property(
        &mut self,
        name: impl Into<String>,
        declared: DeclaredType,
        transformer: Option<TransformerRef>,
    ) -> Result<&mut Self, ConfigurationError> {
        self.declare(name.into(), declared, transformer, true)
    }

    fn declare(
        &mut self,
        name: String,
        declared: DeclaredType,
        transformer: Option<TransformerRef>,
        optional: bool,
    ) -> Result<&mut Self, ConfigurationError> {
        if self.properties.contains_key(&name) {
            return Err(ConfigurationError::DuplicateProperty {
                model: self.model.clone(),
                name,
            });
        }
        let property = PropertyDescriptor {
            name: name.clone(),
            declared,
            transformer,
            optional,
        };
        self.properties.insert(name, property);
        Ok(self)
    }

    /// Validates the collected table and freezes it.
    pub fn build(self) -> Result<ModelDescriptor, ConfigurationError> {
        let descriptor = ModelDescriptor::from_parts(self.model, self.properties);
        validate_descriptor(&descriptor)?;
        Ok(descriptor)
    }
}
