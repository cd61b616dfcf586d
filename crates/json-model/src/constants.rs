/// Field-level decode error codes.
///
/// ATTENTION: Only add new error codes at the end of the list !!!
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldErrorCode {
    Missing = 0,
    Type = 1,
    Transform = 2,
    UnknownKey = 3,
}

impl FieldErrorCode {
    pub fn name(self) -> &'static str {
        match self {
            Self::Missing => "MISSING",
            Self::Type => "TYPE",
            Self::Transform => "TRANSFORM",
            Self::UnknownKey => "UNKNOWN_KEY",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Missing => "Missing required value.",
            Self::Type => "Value has the wrong type.",
            Self::Transform => "Transformer rejected the value.",
            Self::UnknownKey => "Key is not declared by the model.",
        }
    }
}
