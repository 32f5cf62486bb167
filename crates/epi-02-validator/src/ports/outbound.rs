//! Driven ports (Outbound dependencies)

use crate::error::StoreError;
use shared_types::{BlockRecord, WorkItem};

/// Network component, as seen by the validator.
///
/// Sends must not block; delivery is fire-and-forget.
pub trait NetworkGateway: Send + Sync {
    /// Announce a locally accepted block.
    fn broadcast_block(&self, record: BlockRecord) -> Result<(), String>;

    /// Ask peers for a full ledger snapshot.
    fn request_full_ledger(&self) -> Result<(), String>;

    /// Serve our ledger to a peer that asked for it.
    fn send_full_ledger(&self, payload: String) -> Result<(), String>;
}

/// Solver component, as seen by the validator.
pub trait SolverGateway: Send + Sync {
    /// Someone else already solved this instance.
    fn cancel(&self, work: WorkItem) -> Result<(), String>;
}

/// Durable storage for the decompiled ledger.
///
/// Whatever `load` returns is trusted and compiled without re-validation.
pub trait LedgerStore: Send + Sync {
    /// `Ok(None)` when nothing has been persisted yet.
    fn load(&self) -> Result<Option<Vec<BlockRecord>>, StoreError>;

    fn save(&self, records: &[BlockRecord]) -> Result<(), StoreError>;
}
