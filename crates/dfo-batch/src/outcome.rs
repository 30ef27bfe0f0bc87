//! Per-record outcomes and the batch-level partial-failure report.

use dfo_protocol::{DecodeError, EventEnvelope, SequenceToken};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::check::Rejection;

/// One input record: its log position token and raw payload bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub token: SequenceToken,
    pub data: Vec<u8>,
}

impl Record {
    pub fn new(token: impl Into<SequenceToken>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            token: token.into(),
            data: data.into(),
        }
    }
}

/// Why a record must be reported as failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureReason {
    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),
    #[error("rejected by {0}")]
    Rejected(#[from] Rejection),
    #[error("record worker failed: {0}")]
    Worker(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(Box<EventEnvelope>),
    Failure(FailureReason),
}

/// The outcome of one record, keyed by its token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    pub token: SequenceToken,
    pub outcome: Outcome,
}

impl BatchOutcome {
    pub fn success(token: SequenceToken, envelope: EventEnvelope) -> Self {
        Self {
            token,
            outcome: Outcome::Success(Box::new(envelope)),
        }
    }

    pub fn failure(token: SequenceToken, reason: impl Into<FailureReason>) -> Self {
        Self {
            token,
            outcome: Outcome::Failure(reason.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success(_))
    }

    pub fn envelope(&self) -> Option<&EventEnvelope> {
        match &self.outcome {
            Outcome::Success(envelope) => Some(envelope),
            Outcome::Failure(_) => None,
        }
    }

    pub fn failure_reason(&self) -> Option<&FailureReason> {
        match &self.outcome {
            Outcome::Success(_) => None,
            Outcome::Failure(reason) => Some(reason),
        }
    }
}

/// A failed record, as the transport expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItemFailure {
    pub item_identifier: SequenceToken,
}

/// Partial-failure report: only the listed records are redelivered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub batch_item_failures: Vec<BatchItemFailure>,
}

impl BatchReport {
    pub fn from_outcomes(outcomes: &[BatchOutcome]) -> Self {
        Self {
            batch_item_failures: outcomes
                .iter()
                .filter(|outcome| !outcome.is_success())
                .map(|outcome| BatchItemFailure {
                    item_identifier: outcome.token.clone(),
                })
                .collect(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.batch_item_failures.is_empty()
    }
}

/// Counts used for the per-batch log line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub decode_failures: usize,
    pub rejected: usize,
    pub worker_failures: usize,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[BatchOutcome]) -> Self {
        let mut summary = Self {
            total: outcomes.len(),
            ..Self::default()
        };
        for outcome in outcomes {
            match &outcome.outcome {
                Outcome::Success(_) => summary.succeeded += 1,
                Outcome::Failure(FailureReason::Decode(_)) => summary.decode_failures += 1,
                Outcome::Failure(FailureReason::Rejected(_)) => summary.rejected += 1,
                Outcome::Failure(FailureReason::Worker(_)) => summary.worker_failures += 1,
            }
        }
        summary
    }

    pub fn failed(&self) -> usize {
        self.total - self.succeeded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_failure(token: &str) -> BatchOutcome {
        BatchOutcome::failure(token.into(), DecodeError::InvalidJson("eof".into()))
    }

    #[test]
    fn report_lists_failed_tokens_in_order() {
        let outcomes = vec![
            decode_failure("1"),
            BatchOutcome::failure("2".into(), Rejection::new("placeholder_tenant", "tenant 0")),
            decode_failure("3"),
        ];
        let report = BatchReport::from_outcomes(&outcomes);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"batchItemFailures": [
                {"itemIdentifier": "1"},
                {"itemIdentifier": "2"},
                {"itemIdentifier": "3"}
            ]})
        );
    }

    #[test]
    fn empty_report_serializes_an_empty_list() {
        let report = BatchReport::from_outcomes(&[]);
        assert!(report.is_clean());
        assert_eq!(
            serde_json::to_string(&report).unwrap(),
            r#"{"batchItemFailures":[]}"#
        );
    }

    #[test]
    fn summary_separates_failure_kinds() {
        let outcomes = vec![
            decode_failure("1"),
            BatchOutcome::failure("2".into(), Rejection::new("placeholder_tenant", "tenant 0")),
            BatchOutcome::failure("3".into(), FailureReason::Worker("panicked".into())),
        ];
        let summary = BatchSummary::from_outcomes(&outcomes);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.decode_failures, 1);
        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.worker_failures, 1);
        assert_eq!(summary.failed(), 3);
    }

    #[test]
    fn failure_reason_mentions_cause() {
        let outcome = decode_failure("9");
        assert_eq!(
            outcome.failure_reason().map(ToString::to_string).as_deref(),
            Some("decode failed: invalid json: eof")
        );
        assert!(outcome.envelope().is_none());
    }
}
