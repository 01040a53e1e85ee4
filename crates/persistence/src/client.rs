//! ScyllaDB connection for the lead store
//!
//! The keyspace name is spliced into CQL text by [`crate::schema`] and
//! [`crate::leads`], so it is checked here before any statement is built.

use concierge_config::{LeadsConfig, ScyllaConfig};
use scylla::{Session, SessionBuilder};
use std::sync::Arc;

use crate::error::PersistenceError;
use crate::schema;

/// Connected session plus the keyspace that holds the lead tables
#[derive(Clone)]
pub struct ScyllaClient {
    session: Arc<Session>,
    keyspace: String,
    replication_factor: u8,
}

impl ScyllaClient {
    /// Connect using the `leads.scylla` section and create the lead tables
    pub async fn for_leads(config: &LeadsConfig) -> Result<Self, PersistenceError> {
        let client = Self::connect(&config.scylla).await?;
        client.ensure_schema().await?;
        tracing::info!(
            keyspace = %client.keyspace,
            source = %config.source,
            "Lead tables ready"
        );
        Ok(client)
    }

    /// Connect without touching the schema
    pub async fn connect(config: &ScyllaConfig) -> Result<Self, PersistenceError> {
        let hosts = contact_points(config)?;
        let keyspace = checked_keyspace(&config.keyspace)?;
        if config.replication_factor == 0 {
            return Err(PersistenceError::InvalidData(
                "leads.scylla.replication_factor must be at least 1".to_string(),
            ));
        }

        tracing::info!(hosts = ?hosts, keyspace = %keyspace, "Connecting to ScyllaDB");
        let session = SessionBuilder::new().known_nodes(&hosts).build().await?;

        Ok(Self {
            session: Arc::new(session),
            keyspace,
            replication_factor: config.replication_factor,
        })
    }

    /// Create the keyspace and lead tables if missing
    pub async fn ensure_schema(&self) -> Result<(), PersistenceError> {
        schema::create_keyspace(&self.session, &self.keyspace, self.replication_factor).await?;
        schema::create_tables(&self.session, &self.keyspace).await
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn keyspace(&self) -> &str {
        &self.keyspace
    }
}

/// Configured hosts, trimmed, with blanks and repeats removed
fn contact_points(config: &ScyllaConfig) -> Result<Vec<String>, PersistenceError> {
    let mut hosts: Vec<String> = Vec::with_capacity(config.hosts.len());
    for host in config.hosts.iter().map(|h| h.trim()).filter(|h| !h.is_empty()) {
        if !hosts.iter().any(|h| h == host) {
            hosts.push(host.to_string());
        }
    }

    if hosts.is_empty() {
        return Err(PersistenceError::InvalidData(
            "leads.scylla.hosts is empty; set at least one host:port".to_string(),
        ));
    }
    Ok(hosts)
}

/// CQL identifiers: a letter followed by up to 47 letters, digits or underscores
fn checked_keyspace(keyspace: &str) -> Result<String, PersistenceError> {
    let keyspace = keyspace.trim();
    let mut chars = keyspace.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && keyspace.len() <= 48;

    if valid {
        Ok(keyspace.to_string())
    } else {
        Err(PersistenceError::InvalidData(format!(
            "invalid leads.scylla.keyspace {:?}",
            keyspace
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scylla(hosts: &[&str], keyspace: &str) -> ScyllaConfig {
        ScyllaConfig {
            hosts: hosts.iter().map(|h| h.to_string()).collect(),
            keyspace: keyspace.to_string(),
            ..ScyllaConfig::default()
        }
    }

    #[test]
    fn test_contact_points_cleaned() {
        let config = scylla(&[" 10.0.0.1:9042", "", "10.0.0.1:9042 ", "10.0.0.2:9042"], "leads");
        assert_eq!(
            contact_points(&config).unwrap(),
            vec!["10.0.0.1:9042".to_string(), "10.0.0.2:9042".to_string()]
        );
    }

    #[test]
    fn test_contact_points_empty() {
        assert!(matches!(
            contact_points(&scylla(&[], "leads")),
            Err(PersistenceError::InvalidData(_))
        ));
        assert!(matches!(
            contact_points(&scylla(&["  ", ""], "leads")),
            Err(PersistenceError::InvalidData(_))
        ));
    }

    #[test]
    fn test_keyspace_checked() {
        assert_eq!(checked_keyspace(" studio_leads ").unwrap(), "studio_leads");
        let long = "k".repeat(49);
        for bad in ["", "1leads", "leads; DROP KEYSPACE x", "my-leads", long.as_str()] {
            assert!(checked_keyspace(bad).is_err(), "{:?} accepted", bad);
        }
    }

    #[tokio::test]
    async fn test_connect_rejects_blank_hosts_before_network() {
        let mut leads = LeadsConfig::default();
        leads.scylla.hosts = vec![" ".to_string()];
        assert!(matches!(
            ScyllaClient::for_leads(&leads).await,
            Err(PersistenceError::InvalidData(_))
        ));

        leads.scylla = scylla(&["127.0.0.1:9042"], "leads");
        leads.scylla.replication_factor = 0;
        assert!(matches!(
            ScyllaClient::connect(&leads.scylla).await,
            Err(PersistenceError::InvalidData(_))
        ));
    }
}
