//! Tolerant timestamp codec.
//!
//! Upstream sends instants either as RFC-3339 strings or as protobuf-style
//! `{seconds, nanos}` objects, sometimes both within one stream. Decoding
//! accepts either shape; encoding always emits an RFC-3339 string in UTC,
//! with nanosecond fractional digits only when the sub-second part is
//! nonzero.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use crate::error::json_kind;

const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// `0001-01-01T00:00:00Z`, the earliest instant with a four-digit year.
pub const MIN_SECONDS: i64 = -62_135_596_800;

/// `9999-12-31T23:59:59Z`, the latest whole second with a four-digit year.
pub const MAX_SECONDS: i64 = 253_402_300_799;

/// Errors produced by the timestamp codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    #[error("invalid RFC-3339 timestamp {value:?}: {reason}")]
    InvalidRfc3339 { value: String, reason: String },
    #[error("invalid {component} component: {reason}")]
    InvalidComponent {
        component: &'static str,
        reason: String,
    },
    #[error("nanos {0} outside 0..=999999999")]
    NanosOutOfRange(i64),
    #[error("seconds {0} outside years 0001..=9999")]
    SecondsOutOfRange(i64),
    #[error("expected an RFC-3339 string or a {{seconds, nanos}} object, found {0}")]
    UnsupportedShape(&'static str),
}

/// A point in time as seconds since the UNIX epoch plus a nanosecond
/// remainder in `0..1_000_000_000`.
///
/// Construction always validates, so every value can be rendered as
/// RFC-3339.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp {
    seconds: i64,
    nanos: i32,
}

impl Timestamp {
    pub fn new(seconds: i64, nanos: i32) -> Result<Self, TimestampError> {
        if !(0..NANOS_PER_SECOND).contains(&i64::from(nanos)) {
            return Err(TimestampError::NanosOutOfRange(i64::from(nanos)));
        }
        if !(MIN_SECONDS..=MAX_SECONDS).contains(&seconds) {
            return Err(TimestampError::SecondsOutOfRange(seconds));
        }
        Ok(Self { seconds, nanos })
    }

    /// Convert from a chrono instant. A leap-second representation is
    /// folded into the last nanosecond of its second.
    pub fn from_datetime(instant: DateTime<Utc>) -> Result<Self, TimestampError> {
        let nanos = instant.timestamp_subsec_nanos().min(999_999_999);
        Self::new(instant.timestamp(), nanos as i32)
    }

    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    pub fn nanos(&self) -> i32 {
        self.nanos
    }

    pub fn to_datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.seconds, self.nanos as u32).unwrap_or_default()
    }

    /// Parse an RFC-3339 string with or without fractional seconds and with
    /// any offset.
    pub fn parse_rfc3339(value: &str) -> Result<Self, TimestampError> {
        let invalid = |reason: String| TimestampError::InvalidRfc3339 {
            value: value.to_owned(),
            reason,
        };
        if value.is_empty() {
            return Err(invalid("empty string".to_owned()));
        }
        let parsed = DateTime::parse_from_rfc3339(value).map_err(|e| invalid(e.to_string()))?;
        if parsed.timestamp_subsec_nanos() >= NANOS_PER_SECOND as u32 {
            return Err(invalid("leap seconds are not supported".to_owned()));
        }
        Self::from_datetime(parsed.with_timezone(&Utc))
    }

    /// Canonical wire form.
    pub fn to_rfc3339(&self) -> String {
        let format = if self.nanos == 0 {
            SecondsFormat::Secs
        } else {
            SecondsFormat::Nanos
        };
        self.to_datetime().to_rfc3339_opts(format, true)
    }

    /// Decode either accepted wire shape. `null` is rejected here; optional
    /// fields handle absence before reaching the codec.
    pub fn decode_value(value: &Value) -> Result<Self, TimestampError> {
        match value {
            Value::String(s) => Self::parse_rfc3339(s),
            Value::Object(fields) => {
                let seconds = integer_component(fields.get("seconds"), "seconds")?;
                let nanos = integer_component(fields.get("nanos"), "nanos")?;
                let nanos =
                    i32::try_from(nanos).map_err(|_| TimestampError::NanosOutOfRange(nanos))?;
                Self::new(seconds, nanos)
            }
            other => Err(TimestampError::UnsupportedShape(json_kind(other))),
        }
    }
}

/// Protobuf JSON omits zero-valued components.
fn integer_component(value: Option<&Value>, component: &'static str) -> Result<i64, TimestampError> {
    match value {
        None | Some(Value::Null) => Ok(0),
        Some(Value::Number(n)) => n.as_i64().ok_or_else(|| TimestampError::InvalidComponent {
            component,
            reason: format!("{n} is not a 64-bit integer"),
        }),
        Some(other) => Err(TimestampError::InvalidComponent {
            component,
            reason: format!("expected integer, found {}", json_kind(other)),
        }),
    }
}

impl TryFrom<DateTime<Utc>> for Timestamp {
    type Error = TimestampError;

    fn try_from(instant: DateTime<Utc>) -> Result<Self, Self::Error> {
        Self::from_datetime(instant)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_rfc3339())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Self::decode_value(&raw).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn string_and_struct_forms_agree() {
        let from_string = Timestamp::decode_value(&json!("2023-05-01T12:00:00Z")).unwrap();
        let from_struct =
            Timestamp::decode_value(&json!({"seconds": 1_682_942_400, "nanos": 0})).unwrap();
        assert_eq!(from_string, from_struct);
        assert_eq!(from_string.seconds(), 1_682_942_400);
    }

    #[test]
    fn fractional_seconds_are_kept() {
        let ts = Timestamp::parse_rfc3339("2023-05-01T12:00:00.125Z").unwrap();
        assert_eq!(ts.nanos(), 125_000_000);
        assert_eq!(ts.to_rfc3339(), "2023-05-01T12:00:00.125000000Z");
    }

    #[test]
    fn whole_seconds_encode_without_fraction() {
        let ts = Timestamp::new(1_682_942_400, 0).unwrap();
        assert_eq!(ts.to_rfc3339(), "2023-05-01T12:00:00Z");
        assert_eq!(serde_json::to_string(&ts).unwrap(), "\"2023-05-01T12:00:00Z\"");
    }

    #[test]
    fn offsets_are_normalised_to_utc() {
        let ts = Timestamp::parse_rfc3339("2023-05-01T14:00:00+02:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2023-05-01T12:00:00Z");
    }

    #[test]
    fn omitted_struct_components_default_to_zero() {
        let ts = Timestamp::decode_value(&json!({"seconds": 60})).unwrap();
        assert_eq!(ts, Timestamp::new(60, 0).unwrap());
        let epoch = Timestamp::decode_value(&json!({})).unwrap();
        assert_eq!(epoch, Timestamp::default());
    }

    #[test]
    fn rejects_unparseable_inputs() {
        assert!(matches!(
            Timestamp::decode_value(&json!("yesterday")),
            Err(TimestampError::InvalidRfc3339 { .. })
        ));
        assert!(matches!(
            Timestamp::decode_value(&json!("")),
            Err(TimestampError::InvalidRfc3339 { .. })
        ));
        assert_eq!(
            Timestamp::decode_value(&json!(1_682_942_400)),
            Err(TimestampError::UnsupportedShape("number"))
        );
        assert_eq!(
            Timestamp::decode_value(&json!({"seconds": 1, "nanos": 1_000_000_000})),
            Err(TimestampError::NanosOutOfRange(1_000_000_000))
        );
        assert!(matches!(
            Timestamp::decode_value(&json!({"seconds": "1"})),
            Err(TimestampError::InvalidComponent {
                component: "seconds",
                ..
            })
        ));
    }

    #[test]
    fn seconds_are_limited_to_four_digit_years() {
        assert_eq!(
            Timestamp::decode_value(&json!({"seconds": 253_402_300_800i64})),
            Err(TimestampError::SecondsOutOfRange(253_402_300_800))
        );
        assert_eq!(
            Timestamp::new(MIN_SECONDS - 1, 0),
            Err(TimestampError::SecondsOutOfRange(MIN_SECONDS - 1))
        );

        let last = Timestamp::new(MAX_SECONDS, 999_999_999).unwrap();
        assert_eq!(last.to_rfc3339(), "9999-12-31T23:59:59.999999999Z");
        assert_eq!(Timestamp::parse_rfc3339(&last.to_rfc3339()), Ok(last));
        let first = Timestamp::new(MIN_SECONDS, 0).unwrap();
        assert_eq!(first.to_rfc3339(), "0001-01-01T00:00:00Z");
        assert_eq!(Timestamp::parse_rfc3339(&first.to_rfc3339()), Ok(first));
    }

    #[test]
    fn offsets_cannot_push_past_the_year_range() {
        assert!(matches!(
            Timestamp::parse_rfc3339("9999-12-31T23:59:59-01:00"),
            Err(TimestampError::SecondsOutOfRange(_))
        ));
        let instant = DateTime::parse_from_rfc3339("2023-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(
            Timestamp::try_from(instant).map(|t| t.seconds()),
            Ok(1_682_942_400)
        );
    }

    #[test]
    fn serde_accepts_both_shapes() {
        let a: Timestamp = serde_json::from_str("\"1970-01-01T00:00:01.5Z\"").unwrap();
        let b: Timestamp = serde_json::from_str(r#"{"seconds":1,"nanos":500000000}"#).unwrap();
        assert_eq!(a, b);
        let missing: Option<Timestamp> = serde_json::from_str("null").unwrap();
        assert!(missing.is_none());
    }

    proptest! {
        #[test]
        fn rfc3339_roundtrip(
            seconds in MIN_SECONDS..=MAX_SECONDS,
            nanos in 0i32..1_000_000_000,
        ) {
            let ts = Timestamp::new(seconds, nanos).unwrap();
            let encoded = serde_json::to_value(ts).unwrap();
            let decoded = Timestamp::decode_value(&encoded).unwrap();
            prop_assert_eq!(decoded, ts);
        }
    }
}
