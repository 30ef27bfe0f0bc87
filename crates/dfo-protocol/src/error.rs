//! Error types for stream event decoding.

use serde_json::Value;
use thiserror::Error;

/// Coarse failure classes a consumer can act on.
///
/// Unknown enum names are not represented here: they degrade to the
/// `Undefined` sentinel and never fail a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeCategory {
    /// Not JSON, or a required field is absent or mistyped.
    MalformedInput,
    /// A value's JSON type cannot be coerced into the model.
    UnsupportedShape,
    /// Two views of the same entity disagree.
    ConsistencyViolation,
}

/// Errors that can occur while decoding one event record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid json: {0}")]
    InvalidJson(String),
    #[error("invalid event structure: {0}")]
    InvalidStructure(String),
    #[error("missing required field {0}")]
    MissingField(String),
    #[error("malformed field {field}: {reason}")]
    MalformedField { field: String, reason: String },
    #[error("unsupported {found} value for {field}")]
    UnsupportedShape { field: String, found: &'static str },
    #[error("case/contact mismatch: {0}")]
    CaseContactMismatch(String),
}

impl DecodeError {
    pub fn category(&self) -> DecodeCategory {
        match self {
            Self::InvalidJson(_)
            | Self::InvalidStructure(_)
            | Self::MissingField(_)
            | Self::MalformedField { .. } => DecodeCategory::MalformedInput,
            Self::UnsupportedShape { .. } => DecodeCategory::UnsupportedShape,
            Self::CaseContactMismatch(_) => DecodeCategory::ConsistencyViolation,
        }
    }

    /// Redelivering the same bytes can never fix a decode failure.
    pub fn is_retryable(&self) -> bool {
        false
    }
}

/// Convenience result type for decode operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// JSON type name used in error messages.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_follow_taxonomy() {
        assert_eq!(
            DecodeError::InvalidJson("eof".into()).category(),
            DecodeCategory::MalformedInput
        );
        assert_eq!(
            DecodeError::MissingField("createdAt".into()).category(),
            DecodeCategory::MalformedInput
        );
        assert_eq!(
            DecodeError::UnsupportedShape {
                field: "currentValue".into(),
                found: "array"
            }
            .category(),
            DecodeCategory::UnsupportedShape
        );
        assert_eq!(
            DecodeError::CaseContactMismatch("status".into()).category(),
            DecodeCategory::ConsistencyViolation
        );
    }

    #[test]
    fn display_names_the_field() {
        let err = DecodeError::MalformedField {
            field: "data.case.createdAt".into(),
            reason: "bad timestamp".into(),
        };
        assert_eq!(
            err.to_string(),
            "malformed field data.case.createdAt: bad timestamp"
        );
        assert!(!err.is_retryable());
    }
}
