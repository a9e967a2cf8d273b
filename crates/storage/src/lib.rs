mod memory;
mod mongo;

use anyhow::Result;
use serde_json::{Map, Value};
use tracing::warn;
use venture_core::{normalize_place, PlaceRecord};

pub use memory::MemoryPlaceStore;
pub use mongo::{MongoPlaceStore, MongoSettings, DEFAULT_DATABASE, DEFAULT_PLACES_COLLECTION};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceQuery {
    /// Empty means every region.
    pub regions: Vec<String>,
}

impl PlaceQuery {
    pub fn for_regions(regions: Vec<String>) -> Self {
        Self { regions }
    }

    pub fn matches_region(&self, region: Option<&str>) -> bool {
        if self.regions.is_empty() {
            return true;
        }
        region
            .map(|region| self.regions.iter().any(|wanted| wanted == region))
            .unwrap_or(false)
    }
}

/// Read-only access to the place collection.
pub trait PlaceRepository: Send + Sync {
    async fn find_places(&self, query: &PlaceQuery) -> Result<Vec<PlaceRecord>>;
}

#[derive(Clone)]
pub enum Store {
    Memory(MemoryPlaceStore),
    Mongo(MongoPlaceStore),
}

impl Store {
    pub fn memory() -> Self {
        Self::Memory(MemoryPlaceStore::new())
    }

    pub async fn mongo(settings: &MongoSettings) -> Result<Self> {
        let mongo = MongoPlaceStore::connect(settings).await?;
        Ok(Self::Mongo(mongo))
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Store::Memory(_) => "memory",
            Store::Mongo(_) => "mongodb",
        }
    }
}

impl PlaceRepository for Store {
    async fn find_places(&self, query: &PlaceQuery) -> Result<Vec<PlaceRecord>> {
        match self {
            Store::Memory(store) => store.find_places(query).await,
            Store::Mongo(store) => store.find_places(query).await,
        }
    }
}

/// Normalizes projected documents, skipping the ones without an identity.
pub(crate) fn normalize_documents(
    documents: impl IntoIterator<Item = Map<String, Value>>,
) -> Vec<PlaceRecord> {
    documents
        .into_iter()
        .filter_map(|document| match normalize_place(&document) {
            Ok(place) => Some(place),
            Err(error) => {
                warn!(
                    error = %error,
                    id = ?document.get("_id"),
                    "skipping malformed place document"
                );
                None
            }
        })
        .collect()
}
