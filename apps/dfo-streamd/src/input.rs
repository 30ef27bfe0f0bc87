//! Batch framing: turns an input document into tracker records.
//!
//! Two framings are accepted. `kinesis` is the stream trigger document,
//! `{"Records":[{"kinesis":{"sequenceNumber":..,"data":<base64>}}]}`, where
//! each record's token is its sequence number. `jsonl` carries one raw event
//! per line and uses the 1-based line number as the token.

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use dfo_batch::Record;
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Deserialize)]
pub struct KinesisEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<KinesisEventRecord>,
}

#[derive(Debug, Deserialize)]
pub struct KinesisEventRecord {
    #[serde(rename = "eventID", default)]
    pub event_id: Option<String>,
    pub kinesis: KinesisPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KinesisPayload {
    pub sequence_number: String,
    #[serde(default)]
    pub partition_key: Option<String>,
    pub data: String,
}

/// Parse a stream trigger document.
///
/// A record whose payload is not valid base64 keeps its token with an empty
/// payload, so it fails decoding and is reported instead of aborting the
/// whole batch.
pub fn kinesis_records(raw: &[u8]) -> Result<Vec<Record>> {
    let event: KinesisEvent =
        serde_json::from_slice(raw).context("input is not a stream trigger document")?;
    Ok(event
        .records
        .into_iter()
        .map(|record| {
            let payload = record.kinesis;
            let data = STANDARD.decode(payload.data.trim()).unwrap_or_else(|error| {
                warn!(
                    token = %payload.sequence_number,
                    event_id = record.event_id.as_deref().unwrap_or_default(),
                    partition_key = payload.partition_key.as_deref().unwrap_or_default(),
                    error = %error,
                    "record payload is not valid base64"
                );
                Vec::new()
            });
            Record::new(payload.sequence_number, data)
        })
        .collect())
}

pub fn jsonl_records(raw: &[u8]) -> Vec<Record> {
    raw.split(|byte| *byte == b'\n')
        .enumerate()
        .filter(|(_, line)| !line.trim_ascii().is_empty())
        .map(|(index, line)| Record::new((index + 1).to_string(), line.trim_ascii()))
        .collect()
}
