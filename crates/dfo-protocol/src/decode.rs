//! Envelope decoding from raw record bytes.
//!
//! Decoding runs in two passes over a generic JSON tree:
//!
//! 1. Normalisation walks the tree once, tracking the JSON path. It drops
//!    `null` members (upstream uses them for "absent") and turns `null` list
//!    items into empty objects. At the positions the model decodes, it also
//!    checks timestamps with the tolerant timestamp codec, rewrites each
//!    `_changes` entry into its canonical all-string form, and resolves the
//!    `ID`/`id` spelling. Failures here name the exact path. Keys the model
//!    does not know are never inspected.
//! 2. Structural decoding maps the normalised tree onto the typed model and
//!    reconciles the `case`/`contact` aliases.
//!
//! Unknown classification names never fail a record.

use serde_json::{Map, Value};

use crate::change::{ChangeValueError, FieldChange};
use crate::envelope::{EventEnvelope, WireEnvelope};
use crate::error::{DecodeError, DecodeResult, json_kind};
use crate::timestamp::Timestamp;

/// How the decoder treats a known key.
#[derive(Clone, Copy)]
enum Field {
    Timestamp,
    Changes,
    Entity(&'static [(&'static str, Field)]),
    /// Lower-case spelling of the named key; dropped when both are sent.
    AliasOf(&'static str),
}

const ENVELOPE: &[(&str, Field)] = &[
    ("createdAt", Field::Timestamp),
    ("createdAtWithMilliseconds", Field::Timestamp),
    ("data", Field::Entity(DATA)),
];

const DATA: &[(&str, Field)] = &[
    ("channel", Field::Entity(WITH_CHANGES)),
    ("routingQueue", Field::Entity(WITH_CHANGES)),
    ("case", Field::Entity(CASE)),
    ("contact", Field::Entity(CASE)),
    ("agentContact", Field::Entity(AGENT_CONTACT)),
    ("customerContact", Field::Entity(OPENED_CLOSED)),
    ("interaction", Field::Entity(OPENED_CLOSED)),
    ("message", Field::Entity(MESSAGE)),
];

const WITH_CHANGES: &[(&str, Field)] = &[("_changes", Field::Changes)];

const END_USER_IDENTITY: &[(&str, Field)] = &[("id", Field::AliasOf("ID"))];

const CASE: &[(&str, Field)] = &[
    ("createdAt", Field::Timestamp),
    ("createdAtWithMilliseconds", Field::Timestamp),
    ("statusUpdatedAt", Field::Timestamp),
    ("statusUpdatedAtWithMilliseconds", Field::Timestamp),
    ("abandon", Field::Entity(ABANDON)),
    ("authorEndUserIdentity", Field::Entity(END_USER_IDENTITY)),
];

const ABANDON: &[(&str, Field)] = &[
    ("abandonedAt", Field::Timestamp),
    ("abandonedAtWithMilliseconds", Field::Timestamp),
];

const AGENT_CONTACT: &[(&str, Field)] = &[
    ("createdAt", Field::Timestamp),
    ("createdAtWithMilliseconds", Field::Timestamp),
    ("closedAt", Field::Timestamp),
    ("closedAtWithMilliseconds", Field::Timestamp),
];

const OPENED_CLOSED: &[(&str, Field)] = &[
    ("createdAt", Field::Timestamp),
    ("closedAt", Field::Timestamp),
];

const MESSAGE: &[(&str, Field)] = &[
    ("id", Field::AliasOf("ID")),
    ("createdAt", Field::Timestamp),
    ("readAt", Field::Timestamp),
    ("authorEndUserIdentity", Field::Entity(END_USER_IDENTITY)),
    ("authorNameRemoved", Field::Entity(CONTENT_REMOVED)),
    ("contentRemoved", Field::Entity(CONTENT_REMOVED)),
    ("replyToMessage", Field::Entity(&[("id", Field::AliasOf("ID"))])),
];

const CONTENT_REMOVED: &[(&str, Field)] = &[("removedAt", Field::Timestamp)];

/// The only envelope field without a zero-value fallback.
const REQUIRED_CREATED_AT: &str = "createdAt";

/// Decode one record's raw bytes into an envelope.
pub fn decode(raw: &[u8]) -> DecodeResult<EventEnvelope> {
    let value: Value =
        serde_json::from_slice(raw).map_err(|e| DecodeError::InvalidJson(e.to_string()))?;
    decode_value(value)
}

/// Decode an already parsed JSON tree into an envelope.
pub fn decode_value(mut value: Value) -> DecodeResult<EventEnvelope> {
    let root = match &mut value {
        Value::Object(root) => root,
        other => {
            return Err(DecodeError::InvalidStructure(format!(
                "expected an object, found {}",
                json_kind(other)
            )));
        }
    };
    normalize_object(root, "", ENVELOPE)?;
    if !root.contains_key(REQUIRED_CREATED_AT) {
        return Err(DecodeError::MissingField(REQUIRED_CREATED_AT.to_owned()));
    }

    let wire: WireEnvelope = serde_json::from_value(value)
        .map_err(|e| DecodeError::InvalidStructure(e.to_string()))?;
    EventEnvelope::try_from(wire)
}

fn child_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_owned()
    } else {
        format!("{parent}.{key}")
    }
}

fn lookup(fields: &[(&str, Field)], key: &str) -> Option<Field> {
    fields
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, field)| *field)
}

fn normalize_object(
    object: &mut Map<String, Value>,
    path: &str,
    fields: &[(&str, Field)],
) -> DecodeResult<()> {
    object.retain(|_, value| !value.is_null());
    for (key, field) in fields {
        if let Field::AliasOf(canonical) = field {
            if object.contains_key(*canonical) {
                object.remove(*key);
            }
        }
    }
    for (key, value) in object.iter_mut() {
        let path = child_path(path, key);
        match lookup(fields, key) {
            Some(Field::Timestamp) => {
                Timestamp::decode_value(value).map_err(|e| DecodeError::MalformedField {
                    field: path.clone(),
                    reason: e.to_string(),
                })?;
            }
            Some(Field::Changes) => normalize_changes(value, &path)?,
            Some(Field::Entity(inner)) => normalize_value(value, &path, inner)?,
            Some(Field::AliasOf(_)) | None => normalize_value(value, &path, &[])?,
        }
    }
    Ok(())
}

fn normalize_value(value: &mut Value, path: &str, fields: &[(&str, Field)]) -> DecodeResult<()> {
    match value {
        Value::Object(object) => normalize_object(object, path, fields),
        Value::Array(items) => {
            for (index, item) in items.iter_mut().enumerate() {
                if item.is_null() {
                    *item = Value::Object(Map::new());
                }
                normalize_value(item, &format!("{path}[{index}]"), fields)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn normalize_changes(value: &mut Value, path: &str) -> DecodeResult<()> {
    let entries = match value {
        Value::Array(entries) => entries,
        other => {
            return Err(DecodeError::MalformedField {
                field: path.to_owned(),
                reason: format!("expected an array, found {}", json_kind(other)),
            });
        }
    };
    for (index, entry) in entries.iter_mut().enumerate() {
        let entry_path = format!("{path}[{index}]");
        if entry.is_null() {
            *entry = Value::Object(Map::new());
        }
        let change = FieldChange::from_value(entry).map_err(|e| match e {
            ChangeValueError::UnsupportedValue(found) => DecodeError::UnsupportedShape {
                field: format!("{entry_path}.currentValue"),
                found,
            },
            other => DecodeError::MalformedField {
                field: entry_path.clone(),
                reason: other.to_string(),
            },
        })?;
        *entry = serde_json::json!({
            "fieldName": change.field_name,
            "currentValue": change.current_value,
        });
    }
    Ok(())
}
