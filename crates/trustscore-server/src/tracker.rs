//! Observes submitted registry writes from pending to confirmed.
//!
//! The tracker only records what the confirmation future reports. It never
//! resubmits or reconciles.

use std::collections::HashMap;
use std::sync::Arc;

use alloy::primitives::B256;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::registry::SubmittedWrite;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WriteStatus {
    Pending,
    Confirmed { block_number: Option<u64> },
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackedWrite {
    pub tx_hash: B256,
    pub function: &'static str,
    pub submitted_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub status: WriteStatus,
}

impl TrackedWrite {
    fn expired(&self, now: DateTime<Utc>, retention: Duration) -> bool {
        self.finished_at
            .is_some_and(|finished| finished + retention <= now)
    }
}

/// How long a confirmed or failed write stays queryable.
pub const FINISHED_RETENTION_SECS: i64 = 3600;

#[derive(Clone)]
pub struct WriteTracker {
    writes: Arc<RwLock<HashMap<B256, TrackedWrite>>>,
    retention: Duration,
}

impl Default for WriteTracker {
    fn default() -> Self {
        Self::with_retention(Duration::seconds(FINISHED_RETENTION_SECS))
    }
}

impl WriteTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retention(retention: Duration) -> Self {
        Self {
            writes: Arc::new(RwLock::new(HashMap::new())),
            retention,
        }
    }

    /// Record `submitted` as pending and watch its confirmation in the
    /// background.
    pub async fn track(&self, function: &'static str, submitted: SubmittedWrite) -> JoinHandle<()> {
        let SubmittedWrite { tx_hash, confirmation } = submitted;

        let now = Utc::now();
        {
            let mut writes = self.writes.write().await;
            let before = writes.len();
            writes.retain(|_, w| !w.expired(now, self.retention));
            let pruned = before - writes.len();
            if pruned > 0 {
                tracing::debug!(pruned = pruned, "Pruned finished registry writes");
            }

            writes.insert(
                tx_hash,
                TrackedWrite {
                    tx_hash,
                    function,
                    submitted_at: now,
                    finished_at: None,
                    status: WriteStatus::Pending,
                },
            );
        }
        tracing::info!(tx_hash = %tx_hash, function = function, "Registry write pending");

        let writes = Arc::clone(&self.writes);
        tokio::spawn(async move {
            let status = match confirmation.await {
                Ok(block_number) => {
                    tracing::info!(
                        tx_hash = %tx_hash,
                        block_number = ?block_number,
                        "Registry write confirmed"
                    );
                    WriteStatus::Confirmed { block_number }
                }
                Err(e) => {
                    tracing::warn!(tx_hash = %tx_hash, error = %e, "Registry write failed");
                    WriteStatus::Failed { error: e.to_string() }
                }
            };

            if let Some(write) = writes.write().await.get_mut(&tx_hash) {
                write.status = status;
                write.finished_at = Some(Utc::now());
            }
        })
    }

    pub async fn get(&self, tx_hash: &B256) -> Option<TrackedWrite> {
        self.writes.read().await.get(tx_hash).cloned()
    }

    pub async fn pending_count(&self) -> usize {
        self.writes
            .read()
            .await
            .values()
            .filter(|w| w.status == WriteStatus::Pending)
            .count()
    }
}
