//! Offer finder core: pure query composition, device labels, selection policy
//! and the UI state machine.
mod devices;
mod effect;
mod filter;
mod model;
mod msg;
mod selection;
mod state;
mod update;
mod view_model;

pub use devices::{
    decode_devices, device_name, ALL_DEVICES_LABEL, DEVICE_SEPARATOR, MOBILE_LABEL,
};
pub use effect::Effect;
pub use filter::{compose, Composed, OfferOrder, SearchQuery, SourceFilter};
pub use model::{Offer, OfferId, Source, SourceId};
pub use msg::Msg;
pub use selection::{
    parse_persisted_selection, serialize_selection, CorruptPersistedState, Selection,
};
pub use state::{AppState, RequestId, View};
pub use update::update;
pub use view_model::{AppViewModel, OfferRowView, SaveStatus, SearchStatus, SourceRowView};
