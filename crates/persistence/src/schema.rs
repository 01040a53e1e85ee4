//! ScyllaDB schema creation

use scylla::Session;

use crate::error::PersistenceError;

/// Create the keyspace if it doesn't exist
pub async fn create_keyspace(
    session: &Session,
    keyspace: &str,
    replication_factor: u8,
) -> Result<(), PersistenceError> {
    let query = format!(
        "CREATE KEYSPACE IF NOT EXISTS {} WITH replication = {{'class': 'SimpleStrategy', 'replication_factor': {}}}",
        keyspace, replication_factor
    );

    session
        .query_unpaged(query, &[])
        .await
        .map_err(|e| PersistenceError::SchemaError(format!("Failed to create keyspace: {}", e)))?;

    Ok(())
}

/// Create all required tables
pub async fn create_tables(session: &Session, keyspace: &str) -> Result<(), PersistenceError> {
    session
        .query_unpaged(leads_table(keyspace), &[])
        .await
        .map_err(|e| PersistenceError::SchemaError(format!("Failed to create leads table: {}", e)))?;

    session
        .query_unpaged(leads_by_email_table(keyspace), &[])
        .await
        .map_err(|e| {
            PersistenceError::SchemaError(format!("Failed to create leads_by_email table: {}", e))
        })?;

    Ok(())
}

/// Completed leads, one row per capture
fn leads_table(keyspace: &str) -> String {
    format!(
        r#"
        CREATE TABLE IF NOT EXISTS {}.leads (
            lead_id UUID,
            session_id TEXT,
            source TEXT,
            name TEXT,
            email TEXT,
            contact TEXT,
            service_interest TEXT,
            budget_range TEXT,
            captured_at TIMESTAMP,
            PRIMARY KEY (lead_id)
        )
    "#,
        keyspace
    )
}

/// Lookup of leads by email, newest first
fn leads_by_email_table(keyspace: &str) -> String {
    format!(
        r#"
        CREATE TABLE IF NOT EXISTS {}.leads_by_email (
            email TEXT,
            captured_at TIMESTAMP,
            lead_id UUID,
            name TEXT,
            service_interest TEXT,
            PRIMARY KEY ((email), captured_at, lead_id)
        ) WITH CLUSTERING ORDER BY (captured_at DESC, lead_id ASC)
    "#,
        keyspace
    )
}
