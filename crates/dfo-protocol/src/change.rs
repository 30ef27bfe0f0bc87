//! Tolerant scalar-change codec.
//!
//! `*Updated` events list the fields that changed as
//! `{"fieldName": .., "currentValue": ..}` objects. Upstream sends
//! `currentValue` with the field's natural JSON type (`false`, `42`,
//! `"Sales"`), while the model keeps it as text. The change object is read
//! as an untyped map and the scalar is rendered to its literal JSON text;
//! reinterpreting that text is up to the consumer, which knows the field's
//! type.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::error::json_kind;

/// Errors produced by the scalar-change codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChangeValueError {
    #[error("change entry must be an object, found {0}")]
    NotAnObject(&'static str),
    #[error("fieldName must be a string, found {0}")]
    FieldName(&'static str),
    #[error("unsupported {0} currentValue")]
    UnsupportedValue(&'static str),
}

/// One changed field and its new value, as text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldChange {
    pub field_name: String,
    pub current_value: String,
}

impl FieldChange {
    pub fn new(field_name: impl Into<String>, current_value: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            current_value: current_value.into(),
        }
    }

    pub fn from_value(value: &Value) -> Result<Self, ChangeValueError> {
        match value {
            Value::Object(fields) => Self::from_map(fields),
            other => Err(ChangeValueError::NotAnObject(json_kind(other))),
        }
    }

    pub fn from_map(fields: &Map<String, Value>) -> Result<Self, ChangeValueError> {
        let field_name = match fields.get("fieldName") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(name)) => name.clone(),
            Some(other) => return Err(ChangeValueError::FieldName(json_kind(other))),
        };
        let current_value = match fields.get("currentValue") {
            None => String::new(),
            Some(value) => render_scalar(value)?,
        };
        Ok(Self {
            field_name,
            current_value,
        })
    }

    /// Reads the value as a boolean (`"true"` / `"false"`).
    pub fn as_bool(&self) -> Option<bool> {
        self.current_value.parse().ok()
    }

    /// Reads the value as an integer.
    pub fn as_i64(&self) -> Option<i64> {
        self.current_value.parse().ok()
    }
}

/// Render a JSON scalar as the text the model stores.
///
/// Strings pass through unquoted, booleans and numbers keep their literal
/// JSON spelling, `null` becomes the empty string. Objects and arrays are
/// rejected.
pub fn render_scalar(value: &Value) -> Result<String, ChangeValueError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(ChangeValueError::UnsupportedValue(json_kind(other))),
    }
}

impl<'de> Deserialize<'de> for FieldChange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Self::from_value(&raw).map_err(D::Error::custom)
    }
}

/// Well-known `fieldName` values.
pub mod fields {
    /// Fields reported by `Channel` / `ChannelUpdated` events.
    pub mod channel_updated {
        pub const NAME: &str = "name";
        pub const ID_ON_EXTERNAL_PLATFORM: &str = "idOnExternalPlatform";
        pub const REAL_EXTERNAL_PLATFORM_ID: &str = "realExternalPlatformId";
    }

    /// Fields reported by `RoutingQueue` / `RoutingQueueUpdated` events.
    pub mod routing_queue_updated {
        pub const NAME: &str = "name";
        pub const IS_ACCEPT_REJECT_FLOW_ENABLED: &str = "isAcceptRejectFlowEnabled";
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boolean_value_becomes_text() {
        let change: FieldChange = serde_json::from_str(
            r#"{"fieldName":"isAcceptRejectFlowEnabled","currentValue":false}"#,
        )
        .unwrap();
        assert_eq!(
            change,
            FieldChange::new(fields::routing_queue_updated::IS_ACCEPT_REJECT_FLOW_ENABLED, "false")
        );
        assert_eq!(change.as_bool(), Some(false));
    }

    #[test]
    fn string_value_is_unchanged() {
        let change: FieldChange =
            serde_json::from_str(r#"{"fieldName":"name","currentValue":"Sales"}"#).unwrap();
        assert_eq!(change.current_value, "Sales");
        assert_eq!(change.as_bool(), None);
    }

    #[test]
    fn numbers_keep_their_literal_form() {
        let change: FieldChange =
            serde_json::from_str(r#"{ "currentValue" : 42 , "fieldName" : "skillId" }"#).unwrap();
        assert_eq!(change.current_value, "42");
        assert_eq!(change.as_i64(), Some(42));

        let negative: FieldChange =
            serde_json::from_str(r#"{"fieldName":"offset","currentValue":-1.5}"#).unwrap();
        assert_eq!(negative.current_value, "-1.5");
    }

    #[test]
    fn quoted_looking_text_is_not_reinterpreted() {
        let change: FieldChange =
            serde_json::from_str(r#"{"fieldName":"name","currentValue":"currentValue\":false"}"#)
                .unwrap();
        assert_eq!(change.current_value, "currentValue\":false");
    }

    #[test]
    fn null_and_missing_values_are_empty() {
        let change: FieldChange =
            serde_json::from_str(r#"{"fieldName":"name","currentValue":null}"#).unwrap();
        assert_eq!(change.current_value, "");
        let change: FieldChange = serde_json::from_str(r#"{"fieldName":"name"}"#).unwrap();
        assert_eq!(change.current_value, "");
    }

    #[test]
    fn nested_values_are_rejected() {
        let err = FieldChange::from_value(&serde_json::json!({
            "fieldName": "tags",
            "currentValue": ["a", "b"]
        }))
        .unwrap_err();
        assert_eq!(err, ChangeValueError::UnsupportedValue("array"));

        let err = FieldChange::from_value(&serde_json::json!({
            "fieldName": "afterContactWork",
            "currentValue": {"isEnabled": true}
        }))
        .unwrap_err();
        assert_eq!(err, ChangeValueError::UnsupportedValue("object"));
    }

    #[test]
    fn non_object_entries_are_rejected() {
        assert_eq!(
            FieldChange::from_value(&serde_json::json!("name")),
            Err(ChangeValueError::NotAnObject("string"))
        );
        assert_eq!(
            FieldChange::from_value(&serde_json::json!({"fieldName": 7})),
            Err(ChangeValueError::FieldName("number"))
        );
    }

    #[test]
    fn serializes_as_strings() {
        let json = serde_json::to_value(FieldChange::new("name", "Sales")).unwrap();
        assert_eq!(json, serde_json::json!({"fieldName": "name", "currentValue": "Sales"}));
    }
}
