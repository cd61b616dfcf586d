//! Raw payload kinds, target type identities and type-erased field values.

use std::any::{type_name, Any, TypeId};
use std::fmt;

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::{FieldError, FieldErrorKind};

/// Kind of a raw JSON value, one half of a transformer registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl RawKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for RawKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identity of a concrete Rust type a field resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetType {
    id: TypeId,
    name: &'static str,
}

impl TargetType {
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name, for diagnostics only.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is<T: Any>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A decoded field value with its concrete type erased.
pub struct FieldValue {
    target: TargetType,
    value: Box<dyn Any + Send + Sync>,
}

impl FieldValue {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            target: TargetType::of::<T>(),
            value: Box::new(value),
        }
    }

    pub fn target(&self) -> TargetType {
        self.target
    }

    pub fn is<T: Any>(&self) -> bool {
        self.target.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    pub fn downcast<T: Any>(self) -> Result<T, Self> {
        let target = self.target;
        match self.value.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(value) => Err(Self { target, value }),
        }
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldValue")
            .field("target", &self.target.name())
            .finish()
    }
}

/// Ordered table of field values exchanged between a model and the mapper.
#[derive(Debug, Default)]
pub struct Fields {
    values: IndexMap<String, FieldValue>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn insert_value(&mut self, name: impl Into<String>, value: FieldValue) -> &mut Self {
        self.values.insert(name.into(), value);
        self
    }

    pub fn insert<T: Any + Send + Sync>(&mut self, name: impl Into<String>, value: T) -> &mut Self {
        self.insert_value(name, FieldValue::new(value))
    }

    /// Inserts `value` when present; `None` leaves the field absent.
    pub fn insert_opt<T: Any + Send + Sync>(
        &mut self,
        name: impl Into<String>,
        value: Option<T>,
    ) -> &mut Self {
        if let Some(value) = value {
            self.insert(name, value);
        }
        self
    }

    /// Removes a required field and downcasts it to `T`.
    pub fn take<T: Any>(&mut self, name: &str) -> Result<T, FieldError> {
        self.take_opt(name)?
            .ok_or_else(|| FieldError::new(name, FieldErrorKind::Missing))
    }

    /// Removes an optional field and downcasts it to `T`.
    pub fn take_opt<T: Any>(&mut self, name: &str) -> Result<Option<T>, FieldError> {
        let Some(value) = self.values.shift_remove(name) else {
            return Ok(None);
        };
        value.downcast::<T>().map(Some).map_err(|value| {
            FieldError::new(
                name,
                FieldErrorKind::TypeMismatch {
                    expected: type_name::<T>().to_string(),
                    found: value.target().name().to_string(),
                },
            )
        })
    }
}
