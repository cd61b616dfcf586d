//! Error types for descriptor configuration, transformation, decoding and encoding.

use thiserror::Error;

use crate::constants::FieldErrorCode;
use crate::platform::PlatformTag;
use crate::value::RawKind;

/// Descriptor or mapper misconfiguration, detected before any payload is read.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("model `{model}` declares property `{name}` more than once")]
    DuplicateProperty { model: String, name: String },
    #[error("model `{model}` declares a property with an empty name")]
    EmptyName { model: String },
    #[error("model `{model}` has no property `{name}`")]
    UnknownProperty { model: String, name: String },
    #[error("property `{property}` has no concrete type for platform `{platform}`")]
    UnresolvedPlatform {
        property: String,
        platform: PlatformTag,
    },
    #[error("property `{property}` has an empty platform table")]
    EmptyPlatformTable { property: String },
    #[error("property `{property}` lists platform `{platform}` more than once")]
    DuplicatePlatform {
        property: String,
        platform: PlatformTag,
    },
    #[error("property `{property}` of type `{target}` needs a transformer")]
    MissingTransformer {
        property: String,
        target: &'static str,
    },
    #[error("property `{property}`: no transformer registered for {raw} -> `{target}`")]
    UnregisteredTransformer {
        property: String,
        raw: RawKind,
        target: &'static str,
    },
    #[error("model `{model}` maps properties `{first}` and `{second}` to the same key `{key}`")]
    DuplicateKey {
        model: String,
        key: String,
        first: String,
        second: String,
    },
}

/// A transformer could not produce the requested value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransformError {
    #[error("no transformer registered for {raw} -> `{target}`")]
    Unregistered {
        raw: RawKind,
        target: &'static str,
    },
    #[error("no export transformer registered for `{target}`")]
    NoExport { target: &'static str },
    #[error("cannot convert {value} into `{target}`: {reason}")]
    Invalid {
        target: &'static str,
        value: String,
        reason: String,
    },
}

impl TransformError {
    pub fn invalid(
        target: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Invalid {
            target,
            value: value.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldErrorKind {
    #[error("missing required value")]
    Missing,
    #[error("expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error("key is not declared by the model")]
    UnknownKey,
}

impl FieldErrorKind {
    pub fn code(&self) -> FieldErrorCode {
        match self {
            Self::Missing => FieldErrorCode::Missing,
            Self::TypeMismatch { .. } => FieldErrorCode::Type,
            Self::Transform(_) => FieldErrorCode::Transform,
            Self::UnknownKey => FieldErrorCode::UnknownKey,
        }
    }
}

/// A failure attributed to one field of the payload.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("field `{field}`: {kind}")]
pub struct FieldError {
    pub field: String,
    pub kind: FieldErrorKind,
}

impl FieldError {
    pub fn new(field: impl Into<String>, kind: FieldErrorKind) -> Self {
        Self {
            field: field.into(),
            kind,
        }
    }

    pub fn code(&self) -> FieldErrorCode {
        self.kind.code()
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("payload for `{model}` must be {expected}, found {found}")]
    UnexpectedPayload {
        model: String,
        expected: RawKind,
        found: RawKind,
    },
    #[error("decoding `{model}` failed with {} field error(s)", .errors.len())]
    Fields {
        model: String,
        errors: Vec<FieldError>,
    },
    #[error("element {index}: {source}")]
    Element {
        index: usize,
        #[source]
        source: Box<DecodeError>,
    },
}

impl DecodeError {
    /// Field-level failures carried by this error, looking through array elements.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::Fields { errors, .. } => errors,
            Self::Element { source, .. } => source.field_errors(),
            _ => &[],
        }
    }

    /// First failure attributed to `field`, if any.
    pub fn field(&self, field: &str) -> Option<&FieldError> {
        self.field_errors().iter().find(|e| e.field == field)
    }
}

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("model `{model}` did not provide required field `{field}`")]
    MissingField { model: String, field: String },
    #[error("field `{field}`: {source}")]
    Transform {
        field: String,
        #[source]
        source: TransformError,
    },
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}
