use std::collections::BTreeSet;

use serde_json::Value;
use thiserror::Error;

use crate::{Source, SourceId};

/// A persisted selection blob that could not be understood.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorruptPersistedState {
    #[error("CorruptPersistedState: not valid JSON: {0}")]
    NotJson(String),
    #[error("CorruptPersistedState: expected a list of source ids")]
    NotAList,
    #[error("CorruptPersistedState: non-numeric source id {0}")]
    NonNumericEntry(String),
}

/// Parses a persisted selection such as `[1,2,3]`.
pub fn parse_persisted_selection(raw: &str) -> Result<BTreeSet<SourceId>, CorruptPersistedState> {
    let value: Value =
        serde_json::from_str(raw).map_err(|err| CorruptPersistedState::NotJson(err.to_string()))?;
    let Value::Array(entries) = value else {
        return Err(CorruptPersistedState::NotAList);
    };
    entries
        .iter()
        .map(|entry| {
            entry
                .as_i64()
                .ok_or_else(|| CorruptPersistedState::NonNumericEntry(entry.to_string()))
        })
        .collect()
}

/// Serializes source ids in ascending order, e.g. `[1,2,3]`.
pub fn serialize_selection(ids: &BTreeSet<SourceId>) -> String {
    let list: Vec<Value> = ids.iter().map(|id| Value::from(*id)).collect();
    Value::Array(list).to_string()
}

/// The set of sources a user wants included in searches.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    ids: BTreeSet<SourceId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ids(ids: impl IntoIterator<Item = SourceId>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    /// Starting selection for a session.
    ///
    /// A non-empty persisted set is used as-is, stale ids included. Otherwise
    /// every currently known source is selected explicitly, so sources added
    /// later are not picked up until the user checks them.
    pub fn materialize(persisted: &BTreeSet<SourceId>, known: &[Source]) -> Self {
        if persisted.is_empty() {
            Self::from_ids(known.iter().map(|source| source.id))
        } else {
            Self {
                ids: persisted.clone(),
            }
        }
    }

    pub fn set(&mut self, source_id: SourceId, checked: bool) {
        if checked {
            self.ids.insert(source_id);
        } else {
            self.ids.remove(&source_id);
        }
    }

    pub fn contains(&self, source_id: SourceId) -> bool {
        self.ids.contains(&source_id)
    }

    pub fn ids(&self) -> &BTreeSet<SourceId> {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources(ids: &[SourceId]) -> Vec<Source> {
        ids.iter()
            .map(|id| Source::new(*id, format!("site-{id}")))
            .collect()
    }

    #[test]
    fn parses_list_of_integers() {
        let parsed = parse_persisted_selection("[3, 1, 2, 1]").unwrap();
        assert_eq!(parsed, BTreeSet::from([1, 2, 3]));
        assert!(parse_persisted_selection("[]").unwrap().is_empty());
    }

    #[test]
    fn rejects_malformed_blobs() {
        assert!(matches!(
            parse_persisted_selection("not json"),
            Err(CorruptPersistedState::NotJson(_))
        ));
        assert_eq!(
            parse_persisted_selection("{\"a\":1}"),
            Err(CorruptPersistedState::NotAList)
        );
        assert_eq!(
            parse_persisted_selection("[1,\"2\"]"),
            Err(CorruptPersistedState::NonNumericEntry("\"2\"".to_string()))
        );
        assert!(parse_persisted_selection("[1.5]").is_err());
    }

    #[test]
    fn serialize_round_trips() {
        let ids = BTreeSet::from([6, 5]);
        let raw = serialize_selection(&ids);
        assert_eq!(raw, "[5,6]");
        assert_eq!(parse_persisted_selection(&raw).unwrap(), ids);
    }

    #[test]
    fn empty_persisted_selection_materializes_all_known_sources() {
        let known = sources(&[1, 2, 3]);
        let selection = Selection::materialize(&BTreeSet::new(), &known);
        assert_eq!(selection.ids(), &BTreeSet::from([1, 2, 3]));
    }

    #[test]
    fn persisted_selection_is_kept_including_stale_ids() {
        let known = sources(&[1, 2]);
        let selection = Selection::materialize(&BTreeSet::from([2, 9]), &known);
        assert_eq!(selection.ids(), &BTreeSet::from([2, 9]));
    }

    #[test]
    fn set_is_idempotent() {
        let mut selection = Selection::from_ids([1]);
        selection.set(1, false);
        selection.set(2, true);
        selection.set(2, true);
        assert_eq!(selection.ids(), &BTreeSet::from([2]));
        assert_eq!(selection.len(), 1);
    }
}
