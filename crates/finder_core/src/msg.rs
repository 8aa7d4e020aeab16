use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Application started; kicks off the initial loads.
    AppStarted,
    /// User edited the keyword input.
    KeywordChanged(String),
    /// User submitted the current keyword.
    SearchSubmitted,
    /// Source list arrived from the offer store (empty on failure).
    SourcesLoaded(Vec<crate::Source>),
    /// Persisted selection arrived from the selection store (empty when absent or unreadable).
    SelectionLoaded(BTreeSet<crate::SourceId>),
    /// Offer store answered a search.
    SearchCompleted {
        request_id: crate::RequestId,
        offers: Vec<crate::Offer>,
    },
    /// User checked or unchecked a source on the customize view.
    SourceToggled {
        source_id: crate::SourceId,
        checked: bool,
    },
    /// User clicked Save on the customize view.
    SaveClicked,
    /// Selection store finished writing.
    SelectionSaved { ok: bool },
    /// User navigated to another view.
    ViewSwitched(crate::View),
}
