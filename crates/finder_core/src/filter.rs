use std::collections::BTreeSet;

use crate::SourceId;

/// Which sources a search is restricted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceFilter {
    /// No restriction.
    All,
    /// Only offers whose source id is a member of the set.
    Only(BTreeSet<SourceId>),
}

impl SourceFilter {
    pub fn admits(&self, source_id: SourceId) -> bool {
        match self {
            SourceFilter::All => true,
            SourceFilter::Only(ids) => ids.contains(&source_id),
        }
    }
}

/// Result ordering requested from the offer store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OfferOrder {
    /// Highest reward first; ties keep the store's natural order.
    #[default]
    RewardDescending,
}

/// Immutable description of one offer search.
///
/// Every keyword term must match the title (case-insensitive substring) and
/// the offer's source must pass the source filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    keyword_terms: Vec<String>,
    source_filter: SourceFilter,
    order: OfferOrder,
}

impl SearchQuery {
    pub fn keyword_terms(&self) -> &[String] {
        &self.keyword_terms
    }

    pub fn source_filter(&self) -> &SourceFilter {
        &self.source_filter
    }

    pub fn order(&self) -> OfferOrder {
        self.order
    }

    /// Reference matching rule for stores that filter locally.
    pub fn matches(&self, title: &str, source_id: SourceId) -> bool {
        if !self.source_filter.admits(source_id) {
            return false;
        }
        let title = title.to_lowercase();
        self.keyword_terms
            .iter()
            .all(|term| title.contains(&term.to_lowercase()))
    }
}

/// Outcome of composing a search from user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Composed {
    /// Run this query.
    Query(SearchQuery),
    /// The keyword was blank: clear results and issue nothing.
    Empty,
}

/// Builds the search for `keyword` restricted to `selection`.
///
/// An empty selection searches every source.
pub fn compose(keyword: &str, selection: &BTreeSet<SourceId>) -> Composed {
    let keyword_terms: Vec<String> = keyword
        .split_whitespace()
        .map(ToOwned::to_owned)
        .collect();
    if keyword_terms.is_empty() {
        return Composed::Empty;
    }

    let source_filter = if selection.is_empty() {
        SourceFilter::All
    } else {
        SourceFilter::Only(selection.clone())
    };

    Composed::Query(SearchQuery {
        keyword_terms,
        source_filter,
        order: OfferOrder::RewardDescending,
    })
}
