use std::collections::BTreeSet;

use crate::filter::{compose, Composed};
use crate::view_model::{AppViewModel, OfferRowView, SaveStatus, SearchStatus, SourceRowView};
use crate::{decode_devices, Offer, SearchQuery, Selection, Source, SourceId};

pub type RequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// Keyword input and result list.
    #[default]
    Search,
    /// Checkbox list of sources with a save action.
    Customize,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    view: View,
    keyword: String,
    sources: Option<Vec<Source>>,
    persisted: Option<BTreeSet<SourceId>>,
    /// Selection searches run against: materialized at start, replaced on save.
    active: Option<Selection>,
    /// Working copy edited on the customize view.
    draft: Option<Selection>,
    results: Vec<Offer>,
    search_status: SearchStatus,
    last_request_id: RequestId,
    pending_request: Option<RequestId>,
    save_status: Option<SaveStatus>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let draft = self.draft.as_ref().or(self.active.as_ref());
        let sources = self
            .sources
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|source| SourceRowView {
                source_id: source.id,
                name: source.name.clone(),
                checked: draft.is_some_and(|selection| selection.contains(source.id)),
            })
            .collect();
        let results = self
            .results
            .iter()
            .map(|offer| OfferRowView {
                offer_id: offer.id,
                title: offer.title.clone(),
                reward_value: offer.reward_value,
                device_label: decode_devices(&offer.devices),
                source_name: offer.source_name.clone(),
            })
            .collect();

        AppViewModel {
            view: self.view,
            keyword: self.keyword.clone(),
            initialized: self.is_initialized(),
            sources,
            selected_count: self.active.as_ref().map_or(0, Selection::len),
            results,
            search_status: self.search_status,
            save_status: self.save_status,
            has_unsaved_changes: self.has_unsaved_changes(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, clearing the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// True once both the source list and the persisted selection arrived.
    pub fn is_initialized(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_selection(&self) -> Option<&Selection> {
        self.active.as_ref()
    }

    pub fn pending_request(&self) -> Option<RequestId> {
        self.pending_request
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_keyword(&mut self, keyword: String) {
        if self.keyword != keyword {
            self.keyword = keyword;
            self.mark_dirty();
        }
    }

    /// Navigation carries no data: unsaved edits are dropped and the
    /// customize view always starts from the selection in effect.
    pub(crate) fn set_view(&mut self, view: View) {
        self.draft = self.active.clone();
        if view == View::Customize {
            self.save_status = None;
        }
        self.view = view;
        self.mark_dirty();
    }

    pub(crate) fn apply_sources(&mut self, sources: Vec<Source>) {
        self.sources = Some(sources);
        self.try_materialize_selection();
        self.mark_dirty();
    }

    pub(crate) fn apply_persisted_selection(&mut self, persisted: BTreeSet<SourceId>) {
        self.persisted = Some(persisted);
        self.try_materialize_selection();
        self.mark_dirty();
    }

    /// Join point of the two initial loads. Runs once.
    fn try_materialize_selection(&mut self) {
        if self.active.is_some() {
            return;
        }
        if let (Some(sources), Some(persisted)) = (&self.sources, &self.persisted) {
            let selection = Selection::materialize(persisted, sources);
            self.draft = Some(selection.clone());
            self.active = Some(selection);
        }
    }

    /// Composes a search from the keyword and active selection.
    ///
    /// Returns the query to run, or `None` when the keyword is blank, in which
    /// case results are cleared and any in-flight search is abandoned.
    pub(crate) fn begin_search(&mut self) -> Option<(RequestId, SearchQuery)> {
        self.mark_dirty();
        let empty = BTreeSet::new();
        let selection = self.active.as_ref().map_or(&empty, Selection::ids);
        match compose(&self.keyword, selection) {
            Composed::Empty => {
                self.results.clear();
                self.pending_request = None;
                self.search_status = SearchStatus::Idle;
                None
            }
            Composed::Query(query) => {
                self.last_request_id += 1;
                let request_id = self.last_request_id;
                self.pending_request = Some(request_id);
                self.search_status = SearchStatus::Searching;
                Some((request_id, query))
            }
        }
    }

    /// Applies search results unless a newer search superseded this one.
    pub(crate) fn complete_search(&mut self, request_id: RequestId, offers: Vec<Offer>) -> bool {
        if self.pending_request != Some(request_id) {
            return false;
        }
        self.pending_request = None;
        self.search_status = SearchStatus::Done {
            count: offers.len(),
        };
        self.results = offers;
        self.mark_dirty();
        true
    }

    pub(crate) fn toggle_source(&mut self, source_id: SourceId, checked: bool) -> bool {
        let known = self
            .sources
            .as_deref()
            .is_some_and(|sources| sources.iter().any(|source| source.id == source_id));
        let Some(draft) = self.draft.as_mut() else {
            return false;
        };
        if !known || draft.contains(source_id) == checked {
            return false;
        }
        draft.set(source_id, checked);
        self.save_status = None;
        self.mark_dirty();
        true
    }

    /// Commits the draft as the active selection and returns the ids to persist.
    pub(crate) fn commit_draft(&mut self) -> Option<BTreeSet<SourceId>> {
        let draft = self.draft.clone()?;
        let ids = draft.ids().clone();
        self.active = Some(draft);
        self.save_status = Some(SaveStatus::Saving);
        self.mark_dirty();
        Some(ids)
    }

    pub(crate) fn finish_save(&mut self, ok: bool) {
        self.save_status = Some(if ok {
            SaveStatus::Saved
        } else {
            SaveStatus::Failed
        });
        self.mark_dirty();
    }

    fn has_unsaved_changes(&self) -> bool {
        match (&self.draft, &self.active) {
            (Some(draft), Some(active)) => draft != active,
            _ => false,
        }
    }
}
