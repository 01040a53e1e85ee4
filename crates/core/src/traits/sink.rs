//! Lead sink trait
//!
//! The conversation controller hands every completed lead to a sink. The
//! call is synchronous and fire-and-forget: an error is logged by the
//! caller and never rolls back the capture state. Implementations that do
//! I/O should enqueue the lead and return quickly.

use thiserror::Error;

use crate::lead::LeadRecord;

/// Failure reported by a lead sink
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    /// The downstream consumer is gone
    #[error("Lead sink closed")]
    Closed,

    /// The sink could not accept the lead right now
    #[error("Lead sink rejected lead: {0}")]
    Rejected(String),
}

/// Receives completed lead records
pub trait LeadSink: Send + Sync {
    /// Called once for each lead that reaches completion
    fn on_lead_complete(&self, lead: &LeadRecord) -> Result<(), SinkError>;
}

/// Sink that drops every lead
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLeadSink;

impl LeadSink for NoopLeadSink {
    fn on_lead_complete(&self, _lead: &LeadRecord) -> Result<(), SinkError> {
        Ok(())
    }
}

impl<S: LeadSink + ?Sized> LeadSink for std::sync::Arc<S> {
    fn on_lead_complete(&self, lead: &LeadRecord) -> Result<(), SinkError> {
        (**self).on_lead_complete(lead)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_noop_sink_accepts() {
        let sink: Arc<dyn LeadSink> = Arc::new(NoopLeadSink);
        assert!(sink.on_lead_complete(&LeadRecord::new()).is_ok());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(SinkError::Closed.to_string(), "Lead sink closed");
        assert_eq!(
            SinkError::Rejected("full".into()).to_string(),
            "Lead sink rejected lead: full"
        );
    }
}
