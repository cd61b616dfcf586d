//! Descriptor integrity validator.

use std::collections::HashSet;

use super::{DeclaredType, ModelDescriptor, PropertyDescriptor};
use crate::error::ConfigurationError;
use crate::platform::PlatformTag;
use crate::value::TargetType;

/// Validate a descriptor for structural integrity.
pub fn validate_descriptor(descriptor: &ModelDescriptor) -> Result<(), ConfigurationError> {
    for property in descriptor.properties() {
        validate_property(descriptor.model(), property)?;
    }
    Ok(())
}

fn validate_property(model: &str, p: &PropertyDescriptor) -> Result<(), ConfigurationError> {
    if p.name.is_empty() {
        return Err(ConfigurationError::EmptyName {
            model: model.to_string(),
        });
    }
    if let DeclaredType::PlatformConditional(table) = &p.declared {
        validate_platform_table(&p.name, table)?;
    }
    if p.declared.needs_transformer() && p.transformer.is_none() {
        return Err(ConfigurationError::MissingTransformer {
            property: p.name.clone(),
            target: target_name(&p.declared),
        });
    }
    Ok(())
}

fn validate_platform_table(
    property: &str,
    table: &[(PlatformTag, TargetType)],
) -> Result<(), ConfigurationError> {
    if table.is_empty() {
        return Err(ConfigurationError::EmptyPlatformTable {
            property: property.to_string(),
        });
    }
    let mut seen = HashSet::new();
    for (tag, _) in table {
        if !seen.insert(*tag) {
            return Err(ConfigurationError::DuplicatePlatform {
                property: property.to_string(),
                platform: *tag,
            });
        }
    }
    Ok(())
}

fn target_name(declared: &DeclaredType) -> &'static str {
    match declared {
        DeclaredType::Transformable(t) => t.name(),
        DeclaredType::PlatformConditional(table) => {
            table.first().map_or("platform", |(_, t)| t.name())
        }
        other => other.kind(),
    }
}
