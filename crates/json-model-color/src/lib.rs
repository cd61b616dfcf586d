//! Platform color support for json-model.
//!
//! Color properties are declared with one concrete type per platform family
//! ([`UiColor`] for UIKit, [`NsColor`] for AppKit); [`PlatformColor`] names the
//! one selected for the compilation target. Values are read from and written
//! to hex strings.

pub mod color;
pub mod custom_property_model;
pub mod hex;
pub mod transformers;

pub use color::{NativeColor, NsColor, PlatformColor, Rgba, UiColor};
pub use custom_property_model::CustomPropertyModel;
pub use hex::{format_hex, parse_hex, HexColorError};
pub use transformers::{color_from_value, color_property_type, install, registry};
