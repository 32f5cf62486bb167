//! Ledger stores

use crate::error::StoreError;
use crate::ports::LedgerStore;
use epi_01_block_tree::{decode_snapshot, encode_snapshot};
use parking_lot::Mutex;
use shared_types::BlockRecord;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default file name inside the data directory.
pub const LEDGER_FILE_NAME: &str = "ledger.json";

/// JSON file store.
///
/// Writes go to a sibling temp file that is then renamed over the target,
/// so a crash mid-write never leaves a truncated ledger behind.
#[derive(Debug, Clone)]
pub struct FileLedgerStore {
    path: PathBuf,
}

impl FileLedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<data_dir>/ledger.json`.
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self::new(data_dir.as_ref().join(LEDGER_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl LedgerStore for FileLedgerStore {
    fn load(&self) -> Result<Option<Vec<BlockRecord>>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let payload = fs::read_to_string(&self.path)?;
        let records = decode_snapshot(&payload)?;
        debug!(path = %self.path.display(), records = records.len(), "[epi-02] Ledger loaded");
        Ok(Some(records))
    }

    fn save(&self, records: &[BlockRecord]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let temp = self.temp_path();
        fs::write(&temp, encode_snapshot(records))?;
        fs::rename(&temp, &self.path)?;
        debug!(path = %self.path.display(), records = records.len(), "[epi-02] Ledger saved");
        Ok(())
    }
}

/// Volatile store for tests and ephemeral nodes.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    records: Mutex<Option<Vec<BlockRecord>>>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<BlockRecord>) -> Self {
        Self {
            records: Mutex::new(Some(records)),
        }
    }

    /// Last saved records, if any.
    pub fn records(&self) -> Option<Vec<BlockRecord>> {
        self.records.lock().clone()
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn load(&self) -> Result<Option<Vec<BlockRecord>>, StoreError> {
        Ok(self.records.lock().clone())
    }

    fn save(&self, records: &[BlockRecord]) -> Result<(), StoreError> {
        *self.records.lock() = Some(records.to_vec());
        Ok(())
    }
}
