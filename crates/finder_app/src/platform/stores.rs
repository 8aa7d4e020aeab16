use std::sync::Arc;

use anyhow::Context;
use finder_engine::{
    ensure_state_dir, state_dir_from_env, ConfigError, EngineHandle, FileSlotStore,
    MemoryOfferStore, MemorySlotStore, OfferStore, RestOfferStore, SelectionStore, SlotStore,
    StoreConfig,
};
use finder_logging::{finder_info, finder_warn};

/// Wires the offer store and selection store from the environment and starts the engine.
pub fn start_engine() -> anyhow::Result<EngineHandle> {
    let store = offer_store()?;
    let selection = SelectionStore::new(slot_store());
    EngineHandle::new(store, selection).context("starting engine runtime")
}

fn offer_store() -> anyhow::Result<Arc<dyn OfferStore>> {
    match StoreConfig::from_env() {
        Ok(config) => {
            finder_info!("Using REST offer store at {}", config.base_url);
            let store = RestOfferStore::new(config).context("building REST client")?;
            Ok(Arc::new(store))
        }
        Err(ConfigError::Missing(key)) => {
            finder_warn!("{} is not set; using an empty in-memory offer store", key);
            Ok(Arc::new(MemoryOfferStore::default()))
        }
        Err(err) => Err(err).context("reading offer store configuration"),
    }
}

fn slot_store() -> Arc<dyn SlotStore> {
    let dir = state_dir_from_env();
    match ensure_state_dir(&dir) {
        Ok(()) => {
            finder_info!("Persisting selection under {:?}", dir);
            Arc::new(FileSlotStore::new(dir))
        }
        Err(err) => {
            finder_warn!(
                "State directory {:?} unusable ({}); selection will not survive restart",
                dir,
                err
            );
            Arc::new(MemorySlotStore::new())
        }
    }
}
