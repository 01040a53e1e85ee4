//! Lead persistence using ScyllaDB

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use concierge_core::LeadRecord;
use scylla::frame::value::CqlTimestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{PersistenceError, ScyllaClient};

/// A completed lead as written to a store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredLead {
    pub lead_id: Uuid,
    pub session_id: String,
    /// Where the lead came from (e.g. "chatbot")
    pub source: String,
    pub captured_at: DateTime<Utc>,
    #[serde(flatten)]
    pub lead: LeadRecord,
}

impl StoredLead {
    /// Wrap a completed lead; partial leads are rejected
    pub fn new(
        session_id: impl Into<String>,
        source: impl Into<String>,
        lead: LeadRecord,
    ) -> Result<Self, PersistenceError> {
        lead.ensure_complete()?;
        Ok(Self {
            lead_id: Uuid::new_v4(),
            session_id: session_id.into(),
            source: source.into(),
            captured_at: Utc::now(),
            lead,
        })
    }

    pub fn email(&self) -> &str {
        self.lead.email.as_deref().unwrap_or_default()
    }
}

/// Lead store trait
#[async_trait]
pub trait LeadStore: Send + Sync {
    /// Persist one completed lead
    async fn save(&self, lead: &StoredLead) -> Result<(), PersistenceError>;

    /// Short name for logs and metrics labels
    fn name(&self) -> &'static str;
}

/// ScyllaDB implementation of lead store
#[derive(Clone)]
pub struct ScyllaLeadStore {
    client: ScyllaClient,
}

impl ScyllaLeadStore {
    pub fn new(client: ScyllaClient) -> Self {
        Self { client }
    }

    /// Leads captured for an email address, newest first
    pub async fn list_by_email(
        &self,
        email: &str,
        limit: i32,
    ) -> Result<Vec<(Uuid, DateTime<Utc>)>, PersistenceError> {
        let query = format!(
            "SELECT lead_id, captured_at FROM {}.leads_by_email WHERE email = ? LIMIT ?",
            self.client.keyspace()
        );

        let result = self
            .client
            .session()
            .query_unpaged(query, (email, limit))
            .await?;

        let mut leads = Vec::new();
        if let Some(rows) = result.rows {
            for row in rows {
                let (lead_id, captured_at): (Uuid, CqlTimestamp) = row
                    .into_typed()
                    .map_err(|e| PersistenceError::InvalidData(e.to_string()))?;
                let captured_at = Utc
                    .timestamp_millis_opt(captured_at.0)
                    .single()
                    .ok_or_else(|| {
                        PersistenceError::InvalidData(format!(
                            "Invalid captured_at for lead {}",
                            lead_id
                        ))
                    })?;
                leads.push((lead_id, captured_at));
            }
        }

        Ok(leads)
    }
}

#[async_trait]
impl LeadStore for ScyllaLeadStore {
    async fn save(&self, stored: &StoredLead) -> Result<(), PersistenceError> {
        let captured_at = CqlTimestamp(stored.captured_at.timestamp_millis());
        let lead = &stored.lead;

        let query = format!(
            "INSERT INTO {}.leads (
                lead_id, session_id, source, name, email, contact,
                service_interest, budget_range, captured_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            self.client.keyspace()
        );

        self.client
            .session()
            .query_unpaged(
                query,
                (
                    stored.lead_id,
                    &stored.session_id,
                    &stored.source,
                    &lead.name,
                    &lead.email,
                    &lead.contact,
                    &lead.service_interest,
                    &lead.budget_range,
                    captured_at,
                ),
            )
            .await?;

        let by_email = format!(
            "INSERT INTO {}.leads_by_email (
                email, captured_at, lead_id, name, service_interest
            ) VALUES (?, ?, ?, ?, ?)",
            self.client.keyspace()
        );

        self.client
            .session()
            .query_unpaged(
                by_email,
                (
                    stored.email(),
                    captured_at,
                    stored.lead_id,
                    &lead.name,
                    &lead.service_interest,
                ),
            )
            .await?;

        tracing::info!(
            lead_id = %stored.lead_id,
            session_id = %stored.session_id,
            "Lead saved to ScyllaDB"
        );

        Ok(())
    }

    fn name(&self) -> &'static str {
        "scylla"
    }
}
