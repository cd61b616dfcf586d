//! Typed value-transformer registry.
//!
//! Import transformers are keyed by (raw value kind, target type) and turn a
//! raw JSON value into a typed field value. Export transformers are keyed by
//! target type and turn a field value back into JSON.

pub mod defaults;

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::TransformError;
use crate::value::{FieldValue, RawKind, TargetType};

/// Import function: raw JSON value in, type-erased field value out.
pub type ImportFn = Arc<dyn Fn(&Value) -> Result<FieldValue, TransformError> + Send + Sync>;

/// Export function: type-erased field value in, raw JSON value out.
pub type ExportFn = Arc<dyn Fn(&FieldValue) -> Result<Value, TransformError> + Send + Sync>;

#[derive(Clone, Default)]
pub struct TransformerRegistry {
    imports: HashMap<(RawKind, TargetType), ImportFn>,
    exports: HashMap<TargetType, ExportFn>,
}

impl fmt::Debug for TransformerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformerRegistry")
            .field("imports_count", &self.imports.len())
            .field("exports_count", &self.exports.len())
            .finish()
    }
}

impl TransformerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the primitive conversions in [`defaults`].
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        defaults::install(&mut registry);
        registry
    }

    /// Registers an import transformer for raw values of kind `source` into `T`.
    /// Replaces any transformer already registered for the same key.
    pub fn register<T, F>(&mut self, source: RawKind, f: F) -> &mut Self
    where
        T: Any + Send + Sync,
        F: Fn(&Value) -> Result<T, TransformError> + Send + Sync + 'static,
    {
        let import: ImportFn = Arc::new(move |raw: &Value| f(raw).map(FieldValue::new));
        self.imports.insert((source, TargetType::of::<T>()), import);
        self
    }

    /// Registers an export transformer from `T` back into JSON.
    pub fn register_export<T, F>(&mut self, f: F) -> &mut Self
    where
        T: Any + Send + Sync,
        F: Fn(&T) -> Value + Send + Sync + 'static,
    {
        let target = TargetType::of::<T>();
        let export: ExportFn = Arc::new(move |value: &FieldValue| {
            value.downcast_ref::<T>().map(&f).ok_or_else(|| {
                TransformError::invalid(target.name(), value.target().name(), "wrong type")
            })
        });
        self.exports.insert(target, export);
        self
    }

    pub fn has_import(&self, source: RawKind, target: TargetType) -> bool {
        self.imports.contains_key(&(source, target))
    }

    pub fn has_export(&self, target: TargetType) -> bool {
        self.exports.contains_key(&target)
    }

    pub fn import_fn(&self, source: RawKind, target: TargetType) -> Option<&ImportFn> {
        self.imports.get(&(source, target))
    }

    /// Converts `raw` into `target` with the transformer keyed by its kind.
    pub fn transform(&self, raw: &Value, target: TargetType) -> Result<FieldValue, TransformError> {
        let source = RawKind::of(raw);
        let import = self
            .import_fn(source, target)
            .ok_or(TransformError::Unregistered {
                raw: source,
                target: target.name(),
            })?;
        import(raw)
    }

    /// Statically typed form of [`transform`](Self::transform).
    pub fn transform_to<T: Any>(&self, raw: &Value) -> Result<T, TransformError> {
        let target = TargetType::of::<T>();
        self.transform(raw, target)?.downcast::<T>().map_err(|value| {
            TransformError::invalid(
                target.name(),
                value.target().name(),
                "transformer produced the wrong type",
            )
        })
    }

    /// Converts a field value back into JSON with the export registered for its type.
    pub fn export(&self, value: &FieldValue) -> Result<Value, TransformError> {
        let target = value.target();
        let export = self.exports.get(&target).ok_or(TransformError::NoExport {
            target: target.name(),
        })?;
        export(value)
    }
}
