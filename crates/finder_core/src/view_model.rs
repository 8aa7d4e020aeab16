use crate::{OfferId, SourceId, View};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStatus {
    /// No search issued, or the keyword was cleared.
    #[default]
    Idle,
    Searching,
    Done {
        count: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    Saving,
    Saved,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub view: View,
    pub keyword: String,
    pub initialized: bool,
    pub sources: Vec<SourceRowView>,
    pub selected_count: usize,
    pub results: Vec<OfferRowView>,
    pub search_status: SearchStatus,
    pub save_status: Option<SaveStatus>,
    pub has_unsaved_changes: bool,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRowView {
    pub source_id: SourceId,
    pub name: String,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OfferRowView {
    pub offer_id: OfferId,
    pub title: String,
    pub reward_value: f64,
    pub device_label: String,
    pub source_name: String,
}
