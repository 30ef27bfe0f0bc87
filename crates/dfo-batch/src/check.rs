//! Business checks applied to successfully decoded events.
//!
//! A rejected event is reported exactly like a decode failure: its token
//! lands in the partial-failure report and the transport decides whether to
//! redeliver it.

use dfo_protocol::EventEnvelope;
use thiserror::Error;

/// Why a decoded event was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{check}: {reason}")]
pub struct Rejection {
    pub check: &'static str,
    pub reason: String,
}

impl Rejection {
    pub fn new(check: &'static str, reason: impl Into<String>) -> Self {
        Self {
            check,
            reason: reason.into(),
        }
    }
}

/// A synchronous rule every decoded event must satisfy.
pub trait RecordCheck: Send + Sync {
    fn name(&self) -> &'static str;

    fn check(&self, envelope: &EventEnvelope) -> Result<(), Rejection>;
}

/// Rejects events published for the placeholder tenant `"0"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderTenant;

impl RecordCheck for PlaceholderTenant {
    fn name(&self) -> &'static str {
        "placeholder_tenant"
    }

    fn check(&self, envelope: &EventEnvelope) -> Result<(), Rejection> {
        if envelope.tenant_id().trim() == "0" {
            return Err(Rejection::new(self.name(), "event carries placeholder tenant id 0"));
        }
        Ok(())
    }
}

/// Rejects events whose object or type did not resolve to a known name.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassificationRequired;

impl RecordCheck for ClassificationRequired {
    fn name(&self) -> &'static str {
        "classification_required"
    }

    fn check(&self, envelope: &EventEnvelope) -> Result<(), Rejection> {
        if envelope.is_classified() {
            return Ok(());
        }
        Err(Rejection::new(
            self.name(),
            format!(
                "unclassified event (object {}, type {})",
                envelope.event_object, envelope.event_type
            ),
        ))
    }
}
