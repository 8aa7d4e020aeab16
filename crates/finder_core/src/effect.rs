use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadSources,
    LoadSelection,
    RunSearch {
        request_id: crate::RequestId,
        query: crate::SearchQuery,
    },
    SaveSelection {
        source_ids: BTreeSet<crate::SourceId>,
    },
}
