//! Durable instrument → state mapping.

pub mod state_file;

pub use state_file::JsonFileStateStore;

use crate::error::StoreError;
use crate::models::state::StateRecord;
use tracing::warn;

/// Load/save contract for the state record. `load(save(x)) == x`.
pub trait StateStore: Send + Sync {
    /// Read the persisted record; a missing record is an empty one.
    fn load(&self) -> Result<StateRecord, StoreError>;

    /// Replace the persisted record in full.
    fn save(&self, record: &StateRecord) -> Result<(), StoreError>;

    /// Like [`StateStore::load`], but an unreadable record degrades to an
    /// empty one (every instrument unknown).
    fn load_or_default(&self) -> StateRecord {
        match self.load() {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "StateStore: failed to read state, starting from an empty record");
                StateRecord::new()
            }
        }
    }
}
