use std::sync::Arc;

use coachlog_storage::EvidenceStore;
use coachlog_sync::SyncDispatcher;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: coachlog_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Evidence photo storage (S3 in production, in-memory in tests).
    pub evidence_store: Arc<dyn EvidenceStore>,
    /// Fire-and-forget handoff to the compliance sync worker.
    pub sync: SyncDispatcher,
}
