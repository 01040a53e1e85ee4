//! Stores that keep leads in process: in-memory and log-only

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::leads::{LeadStore, StoredLead};
use crate::PersistenceError;

/// Collects leads in memory
#[derive(Default)]
pub struct InMemoryLeadStore {
    leads: RwLock<Vec<StoredLead>>,
}

impl InMemoryLeadStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of saved leads in arrival order
    pub async fn leads(&self) -> Vec<StoredLead> {
        self.leads.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.leads.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.leads.read().await.is_empty()
    }
}

#[async_trait]
impl LeadStore for InMemoryLeadStore {
    async fn save(&self, lead: &StoredLead) -> Result<(), PersistenceError> {
        self.leads.write().await.push(lead.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// Writes each lead as a structured log event and nothing else
#[derive(Debug, Default, Clone, Copy)]
pub struct LogLeadStore;

#[async_trait]
impl LeadStore for LogLeadStore {
    async fn save(&self, stored: &StoredLead) -> Result<(), PersistenceError> {
        let lead = &stored.lead;
        tracing::info!(
            lead_id = %stored.lead_id,
            session_id = %stored.session_id,
            source = %stored.source,
            name = lead.name.as_deref().unwrap_or_default(),
            email = lead.masked_email().as_deref().unwrap_or_default(),
            contact = lead.masked_contact().as_deref().unwrap_or_default(),
            service_interest = lead.service_interest.as_deref().unwrap_or_default(),
            budget_range = lead.budget_range.as_deref().unwrap_or_default(),
            "Lead collected"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
