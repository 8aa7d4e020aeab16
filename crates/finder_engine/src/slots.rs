use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use finder_logging::finder_warn;
use serde::{Deserialize, Serialize};

use crate::persist::{AtomicFileWriter, PersistError};

const STATE_FILENAME: &str = ".offer_finder_state.ron";

/// String-keyed blob storage; each slot is read and written whole.
pub trait SlotStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError>;
    fn set(&self, key: &str, value: &str) -> Result<(), PersistError>;
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PersistedSlots {
    slots: BTreeMap<String, String>,
}

/// Slots kept in a single RON file inside a state directory.
#[derive(Debug)]
pub struct FileSlotStore {
    dir: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileSlotStore {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(STATE_FILENAME)
    }

    fn read_slots(path: &Path) -> Result<PersistedSlots, PersistError> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(PersistedSlots::default());
            }
            Err(err) => return Err(PersistError::Io(err)),
        };
        ron::from_str(&content).map_err(|err| PersistError::Format(err.to_string()))
    }
}

impl SlotStore for FileSlotStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        let slots = Self::read_slots(&self.path())?;
        Ok(slots.slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let path = self.path();
        let mut slots = match Self::read_slots(&path) {
            Ok(slots) => slots,
            Err(PersistError::Format(message)) => {
                finder_warn!(
                    "CorruptPersistedState: replacing unreadable {:?}: {}",
                    path,
                    message
                );
                PersistedSlots::default()
            }
            Err(err) => return Err(err),
        };
        slots.slots.insert(key.to_string(), value.to_string());

        let pretty = ron::ser::PrettyConfig::new();
        let content = ron::ser::to_string_pretty(&slots, pretty)
            .map_err(|err| PersistError::Format(err.to_string()))?;
        AtomicFileWriter::new(self.dir.clone()).write(STATE_FILENAME, &content)?;
        Ok(())
    }
}

/// Slots held in memory; for tests and runs without a writable state directory.
#[derive(Debug, Default)]
pub struct MemorySlotStore {
    slots: Mutex<BTreeMap<String, String>>,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slot(key: &str, value: &str) -> Self {
        let store = Self::new();
        if let Ok(mut slots) = store.slots.lock() {
            slots.insert(key.to_string(), value.to_string());
        }
        store
    }
}

impl SlotStore for MemorySlotStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        let slots = self
            .slots
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistError> {
        let mut slots = self
            .slots
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
