//! JSON file persistence for the per-instrument state record

use crate::db::StateStore;
use crate::error::StoreError;
use crate::models::state::StateRecord;
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Stores the record as a JSON object `{symbol: state}`.
///
/// Saves go to a temporary file in the same directory that is flushed,
/// synced and renamed over the target, so an interrupted save leaves the
/// previous file intact. Two processes saving concurrently race and the last
/// rename wins.
#[derive(Debug, Clone)]
pub struct JsonFileStateStore {
    path: PathBuf,
}

impl JsonFileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl StateStore for JsonFileStateStore {
    fn load(&self) -> Result<StateRecord, StoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "JsonFileStateStore: no state file yet, starting empty");
                return Ok(StateRecord::new());
            }
            Err(e) => return Err(e.into()),
        };
        let record: StateRecord = serde_json::from_reader(BufReader::new(file))?;
        debug!(
            path = %self.path.display(),
            entries = record.len(),
            "JsonFileStateStore: loaded {} entries",
            record.len()
        );
        Ok(record)
    }

    fn save(&self, record: &StateRecord) -> Result<(), StoreError> {
        let tmp = NamedTempFile::new_in(self.parent_dir())?;
        {
            let mut writer = BufWriter::new(tmp.as_file());
            serde_json::to_writer_pretty(&mut writer, record)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)?;

        debug!(
            path = %self.path.display(),
            entries = record.len(),
            "JsonFileStateStore: saved {} entries",
            record.len()
        );
        Ok(())
    }
}
