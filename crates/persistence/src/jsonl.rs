//! JSON-lines file store
//!
//! Appends one JSON object per lead. Writes are serialized through a mutex
//! so concurrent saves never interleave within a line.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::leads::{LeadStore, StoredLead};
use crate::PersistenceError;

pub struct JsonlLeadStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlLeadStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every lead back from the file
    pub async fn read_all(&self) -> Result<Vec<StoredLead>, PersistenceError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        contents
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).map_err(PersistenceError::from))
            .collect()
    }
}

#[async_trait]
impl LeadStore for JsonlLeadStore {
    async fn save(&self, lead: &StoredLead) -> Result<(), PersistenceError> {
        let mut line = serde_json::to_vec(lead)?;
        line.push(b'\n');

        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(&line).await?;
        file.flush().await?;

        tracing::debug!(
            lead_id = %lead.lead_id,
            path = %self.path.display(),
            "Lead appended"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "jsonl"
    }
}
