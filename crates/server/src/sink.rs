//! Lead hand-off
//!
//! Conversations complete leads synchronously inside `submit_turn`. The
//! [`ChannelLeadSink`] wraps the lead into a [`StoredLead`] and pushes it
//! onto a bounded queue; a single background worker drains the queue into
//! the configured [`LeadStore`]. The chat turn never waits on storage.

use std::sync::Arc;

use concierge_core::{LeadRecord, LeadSink, SinkError};
use concierge_persistence::{LeadStore, StoredLead};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::metrics;

/// Sending half of the lead queue, shared by every session
#[derive(Clone)]
pub struct LeadQueue {
    tx: mpsc::Sender<StoredLead>,
    source: Arc<str>,
}

impl LeadQueue {
    /// Create a queue and the receiver to hand to [`spawn_lead_worker`]
    pub fn new(capacity: usize, source: &str) -> (Self, mpsc::Receiver<StoredLead>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (
            Self {
                tx,
                source: Arc::from(source),
            },
            rx,
        )
    }

    /// Sink bound to one session
    pub fn sink_for(&self, session_id: &str) -> Arc<dyn LeadSink> {
        Arc::new(ChannelLeadSink {
            session_id: session_id.to_string(),
            source: self.source.clone(),
            tx: self.tx.clone(),
        })
    }
}

/// [`LeadSink`] that enqueues completed leads for the background worker
pub struct ChannelLeadSink {
    session_id: String,
    source: Arc<str>,
    tx: mpsc::Sender<StoredLead>,
}

impl LeadSink for ChannelLeadSink {
    fn on_lead_complete(&self, lead: &LeadRecord) -> Result<(), SinkError> {
        let stored = StoredLead::new(self.session_id.clone(), self.source.as_ref(), lead.clone())
            .map_err(|e| SinkError::Rejected(e.to_string()))?;

        self.tx.try_send(stored).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => {
                metrics::record_lead_dropped("queue_full");
                SinkError::Rejected("lead queue is full".to_string())
            },
            mpsc::error::TrySendError::Closed(_) => {
                metrics::record_lead_dropped("queue_closed");
                SinkError::Closed
            },
        })?;

        metrics::record_lead_completed();
        Ok(())
    }
}

/// Drain the queue into `store` until every sender is dropped
pub fn spawn_lead_worker(
    mut rx: mpsc::Receiver<StoredLead>,
    store: Arc<dyn LeadStore>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(stored) = rx.recv().await {
            match store.save(&stored).await {
                Ok(()) => {
                    tracing::info!(
                        lead_id = %stored.lead_id,
                        session_id = %stored.session_id,
                        store = store.name(),
                        "Lead stored"
                    );
                },
                Err(e) => {
                    metrics::record_store_failure(store.name());
                    tracing::warn!(
                        lead_id = %stored.lead_id,
                        session_id = %stored.session_id,
                        store = store.name(),
                        error = %e,
                        "Failed to store lead"
                    );
                },
            }
        }
        tracing::info!("Lead worker stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use concierge_persistence::InMemoryLeadStore;

    fn complete() -> LeadRecord {
        LeadRecord {
            name: Some("Jane Doe".to_string()),
            email: Some("jane@x.com".to_string()),
            contact: Some("5551234567".to_string()),
            service_interest: Some("Logo Design".to_string()),
            budget_range: Some("Under $500".to_string()),
        }
    }

    #[tokio::test]
    async fn test_sink_to_worker() {
        let store = Arc::new(InMemoryLeadStore::new());
        let (queue, rx) = LeadQueue::new(4, "chatbot");
        let worker = spawn_lead_worker(rx, store.clone());

        queue.sink_for("s1").on_lead_complete(&complete()).unwrap();
        drop(queue);
        worker.await.unwrap();

        let leads = store.leads().await;
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].session_id, "s1");
        assert_eq!(leads[0].source, "chatbot");
        assert_eq!(leads[0].lead, complete());
    }

    #[test]
    fn test_partial_lead_rejected() {
        let (queue, _rx) = LeadQueue::new(4, "chatbot");
        let partial = LeadRecord {
            name: Some("Jane".to_string()),
            ..LeadRecord::default()
        };
        assert!(matches!(
            queue.sink_for("s1").on_lead_complete(&partial),
            Err(SinkError::Rejected(_))
        ));
    }

    #[test]
    fn test_full_and_closed_queue() {
        let (queue, rx) = LeadQueue::new(1, "chatbot");
        let sink = queue.sink_for("s1");
        assert!(sink.on_lead_complete(&complete()).is_ok());
        assert!(matches!(
            sink.on_lead_complete(&complete()),
            Err(SinkError::Rejected(_))
        ));

        drop(rx);
        assert!(matches!(sink.on_lead_complete(&complete()), Err(SinkError::Closed)));
    }

    #[test]
    fn test_dropped_leads_counted() {
        let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        let (queue, rx) = LeadQueue::new(1, "chatbot");
        let sink = queue.sink_for("s1");
        ::metrics::with_local_recorder(&recorder, || {
            sink.on_lead_complete(&complete()).unwrap();
            let _ = sink.on_lead_complete(&complete());
            drop(rx);
            let _ = sink.on_lead_complete(&complete());
        });

        let rendered = handle.render();
        assert!(rendered.contains(r#"concierge_leads_dropped_total{reason="queue_full"} 1"#));
        assert!(rendered.contains(r#"concierge_leads_dropped_total{reason="queue_closed"} 1"#));
        assert!(rendered.contains("concierge_leads_completed_total 1"));
    }
}
