use std::cmp::Ordering;
use std::sync::RwLock;

use finder_core::{Offer, OfferId, OfferOrder, SearchQuery, Source, SourceId};

use crate::StoreError;

/// Read-only access to point sites and their offers.
#[async_trait::async_trait]
pub trait OfferStore: Send + Sync {
    /// All sources, ordered by id ascending.
    async fn list_sources(&self) -> Result<Vec<Source>, StoreError>;

    /// Offers matching every keyword term and the source filter, best reward first.
    /// No match is an empty list, not an error.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Offer>, StoreError>;
}

/// An offer row as stored, referencing its source by id.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredOffer {
    pub id: OfferId,
    pub title: String,
    pub reward_value: f64,
    pub devices: String,
    pub source_id: SourceId,
}

impl StoredOffer {
    pub fn new(
        id: OfferId,
        title: impl Into<String>,
        reward_value: f64,
        devices: impl Into<String>,
        source_id: SourceId,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            reward_value,
            devices: devices.into(),
            source_id,
        }
    }
}

#[derive(Debug, Default)]
struct MemoryTables {
    sources: Vec<Source>,
    offers: Vec<StoredOffer>,
}

/// Offer store over in-process tables, applying the same matching rules as the backend.
#[derive(Debug, Default)]
pub struct MemoryOfferStore {
    tables: RwLock<MemoryTables>,
}

impl MemoryOfferStore {
    pub fn new(sources: Vec<Source>, offers: Vec<StoredOffer>) -> Self {
        Self {
            tables: RwLock::new(MemoryTables { sources, offers }),
        }
    }

    pub fn add_source(&self, source: Source) {
        if let Ok(mut tables) = self.tables.write() {
            tables.sources.push(source);
        }
    }

    pub fn add_offer(&self, offer: StoredOffer) {
        if let Ok(mut tables) = self.tables.write() {
            tables.offers.push(offer);
        }
    }
}

#[async_trait::async_trait]
impl OfferStore for MemoryOfferStore {
    async fn list_sources(&self) -> Result<Vec<Source>, StoreError> {
        let tables = self.tables.read().map_err(poisoned)?;
        let mut sources = tables.sources.clone();
        sources.sort_by_key(|source| source.id);
        Ok(sources)
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Offer>, StoreError> {
        let tables = self.tables.read().map_err(poisoned)?;
        let mut offers: Vec<Offer> = tables
            .offers
            .iter()
            .filter(|offer| query.matches(&offer.title, offer.source_id))
            .map(|offer| Offer {
                id: offer.id,
                title: offer.title.clone(),
                reward_value: offer.reward_value,
                devices: offer.devices.clone(),
                source_name: tables
                    .sources
                    .iter()
                    .find(|source| source.id == offer.source_id)
                    .map(|source| source.name.clone())
                    .unwrap_or_default(),
            })
            .collect();

        match query.order() {
            // Stable sort: ties keep insertion order.
            OfferOrder::RewardDescending => offers.sort_by(|a, b| {
                b.reward_value
                    .partial_cmp(&a.reward_value)
                    .unwrap_or(Ordering::Equal)
            }),
        }
        Ok(offers)
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> StoreError {
    StoreError::new(crate::FailureKind::Network, "memory store lock poisoned")
}
