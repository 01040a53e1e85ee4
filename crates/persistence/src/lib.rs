//! Lead persistence for the studio concierge
//!
//! Provides storage for completed leads behind the async [`LeadStore`]
//! trait:
//! - ScyllaDB (`leads` and `leads_by_email` tables)
//! - JSON-lines file
//! - CRM webhook
//! - Log-only and in-memory stores

pub mod client;
pub mod error;
pub mod jsonl;
pub mod leads;
pub mod memory;
pub mod schema;
pub mod webhook;

use std::sync::Arc;

use concierge_config::{LeadStoreKind, LeadsConfig};

pub use client::ScyllaClient;
pub use error::PersistenceError;
pub use jsonl::JsonlLeadStore;
pub use leads::{LeadStore, ScyllaLeadStore, StoredLead};
pub use memory::{InMemoryLeadStore, LogLeadStore};
pub use webhook::WebhookLeadStore;

/// Build the lead store selected by configuration
///
/// For ScyllaDB this connects and ensures the schema before returning.
pub async fn init(config: &LeadsConfig) -> Result<Arc<dyn LeadStore>, PersistenceError> {
    let store: Arc<dyn LeadStore> = match config.store {
        LeadStoreKind::Log => Arc::new(LogLeadStore),
        LeadStoreKind::Jsonl => Arc::new(JsonlLeadStore::new(&config.jsonl_path)),
        LeadStoreKind::Webhook => Arc::new(WebhookLeadStore::new(&config.webhook)?),
        LeadStoreKind::Scylla => {
            Arc::new(ScyllaLeadStore::new(ScyllaClient::for_leads(config).await?))
        },
    };

    tracing::info!(store = store.name(), "Lead store initialized");
    Ok(store)
}
