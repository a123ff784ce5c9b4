//! Queue handoff and worker loop for compliance sync.
//!
//! `dispatch` is fire-and-forget: it pushes the complaint id onto a bounded
//! channel and returns immediately. The worker owns the HTTP client and the
//! audit trail; a failed delivery becomes a `failed` audit row, never an
//! error for the caller. In-flight dispatches are lost if the process dies,
//! which the best-effort contract accepts.

use std::time::Duration;

use sqlx::PgPool;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use coachlog_core::types::DbId;
use coachlog_db::models::compliance_sync::{SYNC_FAILED, SYNC_SUCCESS};
use coachlog_db::repositories::{ComplaintRepo, ComplianceSyncRepo};

use crate::payload::SheetsRow;

/// HTTP request timeout for a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Default queue depth. Dispatches beyond this while the worker is busy are
/// dropped with an error log.
const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Configuration for the sync worker.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// The compliance webhook endpoint.
    pub webhook_url: String,
    /// Bounded queue depth.
    pub queue_capacity: usize,
}

impl SyncConfig {
    /// Load from environment: `SHEETS_WEBHOOK_URL` (required),
    /// `SYNC_QUEUE_CAPACITY` (default 64).
    pub fn from_env() -> Self {
        let webhook_url = std::env::var("SHEETS_WEBHOOK_URL")
            .expect("SHEETS_WEBHOOK_URL must be set in the environment");
        let queue_capacity = std::env::var("SYNC_QUEUE_CAPACITY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_QUEUE_CAPACITY);
        Self {
            webhook_url,
            queue_capacity,
        }
    }
}

/// Handle used by request handlers to trigger a sync without blocking.
#[derive(Clone)]
pub struct SyncDispatcher {
    tx: mpsc::Sender<DbId>,
}

impl SyncDispatcher {
    /// Spawn the worker and return the dispatch handle plus the worker's
    /// join handle for shutdown.
    pub fn start(
        pool: PgPool,
        config: SyncConfig,
        cancel: CancellationToken,
    ) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(config.queue_capacity.max(1));
        let worker = SyncWorker::new(pool, config.webhook_url);
        let handle = tokio::spawn(worker.run(rx, cancel));
        (Self { tx }, handle)
    }

    /// Enqueue a complaint for replication. Never blocks and never fails
    /// the caller; a full queue is logged and the dispatch dropped.
    pub fn dispatch(&self, complaint_id: DbId) {
        if let Err(err) = self.tx.try_send(complaint_id) {
            tracing::error!(%complaint_id, error = %err, "Sync queue full, dispatch dropped");
        }
    }
}

/// The worker side: drains the queue, delivers, audits.
pub struct SyncWorker {
    pool: PgPool,
    client: reqwest::Client,
    webhook_url: String,
}

impl SyncWorker {
    pub fn new(pool: PgPool, webhook_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            pool,
            client,
            webhook_url,
        }
    }

    /// Drain the queue until cancelled or the channel closes.
    pub async fn run(self, mut rx: mpsc::Receiver<DbId>, cancel: CancellationToken) {
        tracing::info!(webhook_url = %self.webhook_url, "Compliance sync worker started");
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Compliance sync worker stopping");
                    break;
                }
                next = rx.recv() => {
                    match next {
                        Some(id) => self.process_one(id).await,
                        None => {
                            tracing::info!("Sync queue closed, worker stopping");
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Deliver one complaint and append exactly one audit row.
    pub async fn process_one(&self, complaint_id: DbId) {
        let complaint = match ComplaintRepo::find_by_id(&self.pool, complaint_id).await {
            Ok(Some(c)) => c,
            Ok(None) => {
                // Deleted between dispatch and processing; nothing to audit
                // against (the fk target is gone).
                tracing::debug!(%complaint_id, "Complaint vanished before sync, skipping");
                return;
            }
            Err(err) => {
                tracing::error!(%complaint_id, error = %err, "Failed to load complaint for sync");
                return;
            }
        };

        let (status, message) = match self.deliver(&SheetsRow::from_complaint(&complaint)).await {
            Ok(()) => (SYNC_SUCCESS, None),
            Err(detail) => (SYNC_FAILED, Some(detail)),
        };

        match ComplianceSyncRepo::record(&self.pool, complaint_id, status, message.as_deref()).await
        {
            Ok(attempt) => {
                tracing::info!(
                    %complaint_id,
                    attempt_id = %attempt.id,
                    outcome = status,
                    "Compliance sync attempt recorded",
                );
            }
            Err(err) => {
                tracing::error!(%complaint_id, error = %err, "Failed to record sync attempt");
            }
        }
    }

    /// POST the payload. Any non-2xx response or transport error is a
    /// failure; the response body (or error string) becomes the audit
    /// message.
    async fn deliver(&self, row: &SheetsRow) -> Result<(), String> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(row)
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(format!("webhook returned HTTP {}: {body}", status.as_u16()))
    }
}
