//! Integration tests for the file-backed and in-process lead stores

use std::sync::Arc;

use concierge_config::{LeadStoreKind, LeadsConfig, WebhookConfig};
use concierge_core::LeadRecord;
use concierge_persistence::{
    init, InMemoryLeadStore, JsonlLeadStore, LeadStore, LogLeadStore, PersistenceError,
    StoredLead, WebhookLeadStore,
};

fn lead(name: &str) -> LeadRecord {
    LeadRecord {
        name: Some(name.to_string()),
        email: Some(format!("{}@x.com", name.to_lowercase())),
        contact: Some("5551234567".to_string()),
        service_interest: Some("Logo Design".to_string()),
        budget_range: Some("Under $500".to_string()),
    }
}

#[tokio::test]
async fn test_jsonl_appends_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("leads.jsonl");
    let store = JsonlLeadStore::new(&path);

    let first = StoredLead::new("s1", "chatbot", lead("Jane")).unwrap();
    let second = StoredLead::new("s2", "chatbot", lead("John")).unwrap();
    store.save(&first).await.unwrap();
    store.save(&second).await.unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    assert_eq!(raw.lines().count(), 2);

    let back = store.read_all().await.unwrap();
    assert_eq!(back, vec![first, second]);
}

#[tokio::test]
async fn test_jsonl_concurrent_saves_do_not_interleave() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonlLeadStore::new(dir.path().join("leads.jsonl")));

    let mut handles = vec![];
    for i in 0..20 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            let stored = StoredLead::new(format!("s{}", i), "chatbot", lead("Jane")).unwrap();
            store.save(&stored).await
        }));
    }
    for h in handles {
        h.await.unwrap().unwrap();
    }

    assert_eq!(store.read_all().await.unwrap().len(), 20);
}

#[tokio::test]
async fn test_jsonl_missing_file_reads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonlLeadStore::new(dir.path().join("none.jsonl"));
    assert!(store.read_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_in_memory_and_log_stores() {
    let memory = InMemoryLeadStore::new();
    let stored = StoredLead::new("s1", "chatbot", lead("Jane")).unwrap();
    memory.save(&stored).await.unwrap();
    assert_eq!(memory.leads().await, vec![stored.clone()]);

    assert!(LogLeadStore.save(&stored).await.is_ok());
}

#[tokio::test]
async fn test_webhook_unreachable_is_error() {
    let store = WebhookLeadStore::new(&WebhookConfig {
        url: Some("http://127.0.0.1:9/leads".to_string()),
        auth_token: None,
        timeout_ms: 500,
    })
    .unwrap();

    let stored = StoredLead::new("s1", "chatbot", lead("Jane")).unwrap();
    assert!(matches!(
        store.save(&stored).await,
        Err(PersistenceError::Webhook(_))
    ));
}

#[tokio::test]
async fn test_init_selects_store() {
    let dir = tempfile::tempdir().unwrap();

    let log = init(&LeadsConfig::default()).await.unwrap();
    assert_eq!(log.name(), "log");

    let config = LeadsConfig {
        store: LeadStoreKind::Jsonl,
        jsonl_path: dir.path().join("l.jsonl").display().to_string(),
        ..LeadsConfig::default()
    };
    assert_eq!(init(&config).await.unwrap().name(), "jsonl");

    let config = LeadsConfig {
        store: LeadStoreKind::Webhook,
        ..LeadsConfig::default()
    };
    assert!(init(&config).await.is_err());
}
