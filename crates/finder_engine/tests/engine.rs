use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use finder_core::{compose, Composed, SearchQuery, Source};
use finder_engine::{
    EngineEvent, EngineHandle, FailureKind, MemoryOfferStore, MemorySlotStore, OfferStore,
    PersistError, SelectionStore, SlotStore, StoreError, StoredOffer, SELECTION_SLOT,
};

const WAIT: Duration = Duration::from_secs(5);

fn query(keyword: &str) -> SearchQuery {
    match compose(keyword, &BTreeSet::new()) {
        Composed::Query(query) => query,
        Composed::Empty => panic!("blank keyword"),
    }
}

fn engine_with(slots: Arc<MemorySlotStore>) -> EngineHandle {
    let store = MemoryOfferStore::new(
        vec![Source::new(1, "SiteA"), Source::new(2, "SiteB")],
        vec![
            StoredOffer::new(1, "Cinema Ticket", 500.0, "p,i,a", 1),
            StoredOffer::new(2, "Cinema Pass", 300.0, "i", 2),
        ],
    );
    EngineHandle::new(Arc::new(store), SelectionStore::new(slots)).expect("engine")
}

fn collect(engine: &EngineHandle, count: usize) -> Vec<EngineEvent> {
    (0..count)
        .map(|_| engine.recv_timeout(WAIT).expect("engine event"))
        .collect()
}

#[test]
fn initial_loads_report_sources_and_selection() {
    let slots = Arc::new(MemorySlotStore::with_slot(SELECTION_SLOT, "[2]"));
    let engine = engine_with(slots);

    engine.load_sources();
    engine.load_selection();
    let events = collect(&engine, 2);

    assert!(events.iter().any(|event| matches!(
        event,
        EngineEvent::SourcesLoaded(Ok(sources)) if sources.len() == 2
    )));
    assert!(events
        .iter()
        .any(|event| *event == EngineEvent::SelectionLoaded(BTreeSet::from([2]))));
}

#[test]
fn search_results_carry_their_request_id() {
    let engine = engine_with(Arc::new(MemorySlotStore::new()));

    engine.search(7, query("pass"));

    match engine.recv_timeout(WAIT) {
        Some(EngineEvent::SearchCompleted { request_id, result }) => {
            assert_eq!(request_id, 7);
            let offers = result.expect("offers");
            assert_eq!(offers.len(), 1);
            assert_eq!(offers[0].source_name, "SiteB");
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn saving_writes_the_selection_slot() {
    let slots = Arc::new(MemorySlotStore::new());
    let engine = engine_with(slots.clone());

    engine.save_selection(BTreeSet::from([1, 2]));

    assert_eq!(
        engine.recv_timeout(WAIT),
        Some(EngineEvent::SelectionSaved { error: None })
    );
    engine.load_selection();
    assert_eq!(
        engine.recv_timeout(WAIT),
        Some(EngineEvent::SelectionLoaded(BTreeSet::from([1, 2])))
    );
}

struct DownStore;

#[async_trait::async_trait]
impl OfferStore for DownStore {
    async fn list_sources(&self) -> Result<Vec<Source>, StoreError> {
        Err(StoreError {
            kind: FailureKind::Network,
            message: "connection refused".to_string(),
        })
    }

    async fn search(&self, _query: &SearchQuery) -> Result<Vec<finder_core::Offer>, StoreError> {
        Err(StoreError {
            kind: FailureKind::HttpStatus(503),
            message: "unavailable".to_string(),
        })
    }
}

#[test]
fn store_failures_are_reported_as_events() {
    let engine = EngineHandle::new(
        Arc::new(DownStore),
        SelectionStore::new(Arc::new(MemorySlotStore::new())),
    )
    .expect("engine");

    engine.load_sources();
    assert!(matches!(
        engine.recv_timeout(WAIT),
        Some(EngineEvent::SourcesLoaded(Err(StoreError {
            kind: FailureKind::Network,
            ..
        })))
    ));

    engine.search(1, query("anything"));
    assert!(matches!(
        engine.recv_timeout(WAIT),
        Some(EngineEvent::SearchCompleted {
            request_id: 1,
            result: Err(_)
        })
    ));
}

struct BrokenSlots;

impl SlotStore for BrokenSlots {
    fn get(&self, _key: &str) -> Result<Option<String>, PersistError> {
        panic!("slot backend crashed");
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), PersistError> {
        panic!("slot backend crashed");
    }
}

#[test]
fn crashed_selection_task_still_answers() {
    let engine = EngineHandle::new(
        Arc::new(MemoryOfferStore::default()),
        SelectionStore::new(Arc::new(BrokenSlots)),
    )
    .expect("engine");

    engine.load_selection();
    assert_eq!(
        engine.recv_timeout(WAIT),
        Some(EngineEvent::SelectionLoaded(BTreeSet::new()))
    );

    engine.save_selection(BTreeSet::from([1]));
    assert!(matches!(
        engine.recv_timeout(WAIT),
        Some(EngineEvent::SelectionSaved { error: Some(_) })
    ));
}
