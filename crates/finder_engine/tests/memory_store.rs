use std::collections::BTreeSet;

use finder_core::{compose, decode_devices, Composed, SearchQuery, Source, ALL_DEVICES_LABEL};
use finder_engine::{MemoryOfferStore, OfferStore, StoredOffer};
use pretty_assertions::assert_eq;

fn query(keyword: &str, selection: &[i64]) -> SearchQuery {
    match compose(keyword, &selection.iter().copied().collect::<BTreeSet<_>>()) {
        Composed::Query(query) => query,
        Composed::Empty => panic!("blank keyword"),
    }
}

fn cinema_store() -> MemoryOfferStore {
    MemoryOfferStore::new(
        vec![Source::new(2, "SiteB"), Source::new(1, "SiteA")],
        vec![
            StoredOffer::new(1, "Cinema Ticket", 500.0, "p,i,a", 1),
            StoredOffer::new(2, "Cinema Pass", 300.0, "i", 2),
        ],
    )
}

#[tokio::test]
async fn sources_are_listed_by_id() {
    let store = cinema_store();

    let ids: Vec<_> = store
        .list_sources()
        .await
        .unwrap()
        .into_iter()
        .map(|source| source.id)
        .collect();

    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn keyword_and_source_filters_must_both_match() {
    let store = MemoryOfferStore::new(
        vec![Source::new(1, "SiteA"), Source::new(3, "SiteC")],
        vec![
            StoredOffer::new(10, "foo bar baz", 1.0, "p", 1),
            StoredOffer::new(11, "foo", 2.0, "p", 3),
        ],
    );

    let offers = store.search(&query("foo bar", &[1, 2])).await.unwrap();

    assert_eq!(offers.len(), 1);
    assert_eq!(offers[0].id, 10);
    assert_eq!(offers[0].source_name, "SiteA");
}

#[tokio::test]
async fn all_sources_filter_matches_everywhere() {
    let store = MemoryOfferStore::new(
        vec![Source::new(1, "SiteA"), Source::new(3, "SiteC")],
        vec![
            StoredOffer::new(10, "foo bar baz", 1.0, "p", 1),
            StoredOffer::new(11, "FOO", 2.0, "p", 3),
        ],
    );

    let ids: Vec<_> = store
        .search(&query("foo", &[]))
        .await
        .unwrap()
        .into_iter()
        .map(|offer| offer.id)
        .collect();

    assert_eq!(ids, vec![11, 10]);
}

#[tokio::test]
async fn cinema_scenario_returns_only_the_selected_site() {
    let store = cinema_store();

    let offers = store.search(&query("cinema", &[1])).await.unwrap();

    assert_eq!(offers.len(), 1);
    assert_eq!(offers[0].id, 1);
    assert_eq!(offers[0].title, "Cinema Ticket");
    assert_eq!(decode_devices(&offers[0].devices), ALL_DEVICES_LABEL);
}

#[tokio::test]
async fn results_are_ordered_by_reward_with_stable_ties() {
    let store = MemoryOfferStore::new(
        vec![Source::new(1, "SiteA")],
        vec![
            StoredOffer::new(1, "deal a", 5.0, "", 1),
            StoredOffer::new(2, "deal b", 9.5, "", 1),
            StoredOffer::new(3, "deal c", 5.0, "", 1),
        ],
    );

    let ids: Vec<_> = store
        .search(&query("deal", &[]))
        .await
        .unwrap()
        .into_iter()
        .map(|offer| offer.id)
        .collect();

    assert_eq!(ids, vec![2, 1, 3]);
}

#[tokio::test]
async fn stale_source_ids_contribute_no_matches() {
    let store = cinema_store();

    let offers = store.search(&query("cinema", &[42])).await.unwrap();

    assert!(offers.is_empty());
}

#[tokio::test]
async fn sources_added_later_are_listed() {
    let store = cinema_store();
    store.add_source(Source::new(3, "SiteC"));
    store.add_offer(StoredOffer::new(3, "Cinema Snack", 50.0, "a", 3));

    assert_eq!(store.list_sources().await.unwrap().len(), 3);
    let offers = store.search(&query("snack", &[3])).await.unwrap();
    assert_eq!(offers[0].source_name, "SiteC");
}
