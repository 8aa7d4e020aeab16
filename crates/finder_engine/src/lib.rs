//! Offer finder engine: store adapters, selection persistence and effect execution.
mod config;
mod engine;
mod persist;
mod rest;
mod selection_store;
mod slots;
mod store;
mod types;

pub use config::{
    state_dir_from_env, state_dir_from_lookup, ConfigError, StoreConfig, StoreSettings,
    OFFERS_TABLE, SELECTION_SLOT, SOURCES_TABLE,
};
pub use engine::EngineHandle;
pub use persist::{ensure_state_dir, AtomicFileWriter, PersistError};
pub use rest::{offer_search_params, RestOfferStore};
pub use selection_store::SelectionStore;
pub use slots::{FileSlotStore, MemorySlotStore, SlotStore};
pub use store::{MemoryOfferStore, OfferStore, StoredOffer};
pub use types::{EngineEvent, FailureKind, StoreError};
