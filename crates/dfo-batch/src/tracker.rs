//! The batch outcome tracker.
//!
//! Each record is decoded and checked inside its own `record` span, so every
//! log line carries the record's token and, once decoded, its event id,
//! tenant and classification.

use std::sync::Arc;

use dfo_protocol::decode;
use futures_util::{StreamExt, stream};
use tracing::{Span, debug, debug_span, field, info, instrument, warn};

use crate::check::{ClassificationRequired, PlaceholderTenant, RecordCheck};
use crate::outcome::{BatchOutcome, BatchSummary, FailureReason, Record};

#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Records decoded in parallel by [`BatchTracker::process_batch_concurrent`].
    pub concurrency: usize,
    pub reject_placeholder_tenant: bool,
    pub require_classification: bool,
}

impl TrackerConfig {
    pub fn new() -> Self {
        Self {
            concurrency: 8,
            reject_placeholder_tenant: true,
            require_classification: false,
        }
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Decodes each record of a batch and keeps one outcome per record.
///
/// Records are independent: a failing record never affects its neighbours,
/// and the returned outcomes are in input order whatever the processing
/// order was.
#[derive(Clone)]
pub struct BatchTracker {
    config: TrackerConfig,
    checks: Arc<Vec<Arc<dyn RecordCheck>>>,
}

impl BatchTracker {
    pub fn new(config: TrackerConfig) -> Self {
        let mut checks: Vec<Arc<dyn RecordCheck>> = Vec::new();
        if config.reject_placeholder_tenant {
            checks.push(Arc::new(PlaceholderTenant));
        }
        if config.require_classification {
            checks.push(Arc::new(ClassificationRequired));
        }
        Self {
            config,
            checks: Arc::new(checks),
        }
    }

    /// Append a check, run after the configured ones.
    pub fn with_check(mut self, check: impl RecordCheck + 'static) -> Self {
        Arc::make_mut(&mut self.checks).push(Arc::new(check));
        self
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn check_names(&self) -> Vec<&'static str> {
        self.checks.iter().map(|check| check.name()).collect()
    }

    pub fn process_record(&self, record: &Record) -> BatchOutcome {
        let span = debug_span!(
            "record",
            token = %record.token,
            event_id = field::Empty,
            tenant_id = field::Empty,
            event_object = field::Empty,
            event_type = field::Empty,
        );
        let _entered = span.enter();

        let envelope = match decode(&record.data) {
            Ok(envelope) => envelope,
            Err(error) => {
                warn!(
                    error = %error,
                    category = ?error.category(),
                    bytes = record.data.len(),
                    "record failed to decode"
                );
                return BatchOutcome::failure(record.token.clone(), error);
            }
        };

        span.record("event_id", envelope.event_id.as_str());
        span.record("tenant_id", envelope.tenant_id());
        span.record("event_object", envelope.event_object.name());
        span.record("event_type", envelope.event_type.name());

        for check in self.checks.iter() {
            if let Err(rejection) = check.check(&envelope) {
                warn!(check = rejection.check, reason = %rejection.reason, "record rejected");
                return BatchOutcome::failure(record.token.clone(), rejection);
            }
        }

        if !envelope.is_classified() {
            debug!("record decoded with undefined classification");
        }
        debug!("record decoded");
        BatchOutcome::success(record.token.clone(), envelope)
    }

    /// Process records one after another on the calling thread.
    #[instrument(skip_all, fields(records = records.len()))]
    pub fn process_batch(&self, records: &[Record]) -> Vec<BatchOutcome> {
        let outcomes: Vec<BatchOutcome> = records
            .iter()
            .map(|record| self.process_record(record))
            .collect();
        log_summary(&outcomes);
        outcomes
    }

    /// Process records on the blocking pool, at most `concurrency` at a time.
    #[instrument(skip_all, fields(records = records.len(), concurrency = self.config.concurrency))]
    pub async fn process_batch_concurrent(&self, records: Vec<Record>) -> Vec<BatchOutcome> {
        let concurrency = self.config.concurrency.max(1);
        let parent = Span::current();
        let outcomes: Vec<BatchOutcome> = stream::iter(records)
            .map(|record| {
                let tracker = self.clone();
                let parent = parent.clone();
                let token = record.token.clone();
                async move {
                    let worker = tokio::task::spawn_blocking(move || {
                        parent.in_scope(|| tracker.process_record(&record))
                    });
                    match worker.await {
                        Ok(outcome) => outcome,
                        Err(error) => {
                            warn!(token = %token, error = %error, "record worker failed");
                            BatchOutcome::failure(token, FailureReason::Worker(error.to_string()))
                        }
                    }
                }
            })
            .buffered(concurrency)
            .collect()
            .await;
        log_summary(&outcomes);
        outcomes
    }
}

fn log_summary(outcomes: &[BatchOutcome]) {
    let summary = BatchSummary::from_outcomes(outcomes);
    info!(
        total = summary.total,
        succeeded = summary.succeeded,
        decode_failures = summary.decode_failures,
        rejected = summary.rejected,
        worker_failures = summary.worker_failures,
        "batch processed"
    );
}
