//! Batch outcome tracking for stream records.
//!
//! A batch is a sequence of records, each carrying an opaque sequence token
//! and the raw event bytes. [`BatchTracker`] decodes every record with
//! `dfo-protocol`, runs the configured [`RecordCheck`]s, and yields one
//! [`BatchOutcome`] per record in input order. [`BatchReport`] turns the
//! outcomes into the partial-failure report the transport redelivers from.

pub mod check;
pub mod outcome;
mod tracker;

pub use check::{ClassificationRequired, PlaceholderTenant, RecordCheck, Rejection};
pub use outcome::{
    BatchItemFailure, BatchOutcome, BatchReport, BatchSummary, FailureReason, Outcome, Record,
};
pub use tracker::{BatchTracker, TrackerConfig};
