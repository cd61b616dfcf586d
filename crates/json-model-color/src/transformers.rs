//! Color transformers for the json-model registry.

use json_model::{
    DeclaredType, PlatformTag, RawKind, TargetType, TransformError, TransformerRegistry,
};
use serde_json::Value;
use tracing::trace;

use crate::color::{NativeColor, NsColor, UiColor};
use crate::hex::{format_hex, parse_hex};

/// Registers string import and export transformers for every platform color type.
pub fn install(registry: &mut TransformerRegistry) -> &mut TransformerRegistry {
    register_color::<UiColor>(registry);
    register_color::<NsColor>(registry);
    registry
}

/// Default primitive transformers plus the color transformers.
pub fn registry() -> TransformerRegistry {
    let mut registry = TransformerRegistry::with_defaults();
    install(&mut registry);
    registry
}

fn register_color<C: NativeColor>(registry: &mut TransformerRegistry) {
    registry
        .register(RawKind::String, color_from_value::<C>)
        .register_export(|color: &C| Value::String(format_hex(color.rgba())));
}

/// Parses a hex color string into `C`.
pub fn color_from_value<C: NativeColor>(raw: &Value) -> Result<C, TransformError> {
    let target = TargetType::of::<C>().name();
    let s = raw
        .as_str()
        .ok_or_else(|| TransformError::invalid(target, raw.to_string(), "not a string"))?;
    let rgba =
        parse_hex(s).map_err(|e| TransformError::invalid(target, raw.to_string(), e.to_string()))?;
    let platform = C::PLATFORM;
    trace!(input = s, %platform, "parsed hex color");
    Ok(C::from_rgba(rgba))
}

/// Declared type of a color property: one concrete color type per platform family.
pub fn color_property_type() -> DeclaredType {
    DeclaredType::platform([
        (PlatformTag::UIKIT, TargetType::of::<UiColor>()),
        (PlatformTag::APPKIT, TargetType::of::<NsColor>()),
    ])
}
