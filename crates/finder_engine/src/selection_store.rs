use std::collections::BTreeSet;
use std::sync::Arc;

use finder_core::{parse_persisted_selection, serialize_selection, SourceId};
use finder_logging::{finder_info, finder_warn};

use crate::config::SELECTION_SLOT;
use crate::{PersistError, SlotStore};

/// Persisted set of selected source ids, stored as a JSON list in one slot.
#[derive(Clone)]
pub struct SelectionStore {
    slots: Arc<dyn SlotStore>,
    key: String,
}

impl SelectionStore {
    pub fn new(slots: Arc<dyn SlotStore>) -> Self {
        Self {
            slots,
            key: SELECTION_SLOT.to_string(),
        }
    }

    /// Saved selection, or an empty set when none is saved or it cannot be read.
    pub fn load(&self) -> BTreeSet<SourceId> {
        let raw = match self.slots.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                finder_info!("No saved selection in slot {:?}", self.key);
                return BTreeSet::new();
            }
            Err(PersistError::Format(message)) => {
                finder_warn!("CorruptPersistedState: unreadable slot file: {}", message);
                return BTreeSet::new();
            }
            Err(err) => {
                finder_warn!("Failed to read saved selection: {}", err);
                return BTreeSet::new();
            }
        };

        match parse_persisted_selection(&raw) {
            Ok(ids) => ids,
            Err(err) => {
                finder_warn!("{}; ignoring saved selection {:?}", err, raw);
                BTreeSet::new()
            }
        }
    }

    /// Overwrites the saved selection.
    pub fn save(&self, ids: &BTreeSet<SourceId>) -> Result<(), PersistError> {
        self.slots.set(&self.key, &serialize_selection(ids))?;
        finder_info!("Saved selection of {} sources", ids.len());
        Ok(())
    }
}
