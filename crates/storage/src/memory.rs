use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use parking_lot::RwLock;
use serde_json::{Map, Value};
use venture_core::{project_place_document, PlaceRecord};

use crate::{normalize_documents, PlaceQuery, PlaceRepository};

/// Place documents held in process, in the same shape the document store
/// returns them. Clones share the same documents.
#[derive(Clone, Default)]
pub struct MemoryPlaceStore {
    documents: Arc<RwLock<Vec<Map<String, Value>>>>,
}

impl MemoryPlaceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(documents: Vec<Value>) -> Result<Self> {
        let store = Self::new();
        for document in documents {
            store.insert_document(document)?;
        }
        Ok(store)
    }

    /// Loads a JSON array of place documents, e.g. a `mongoexport --jsonArray` dump.
    pub fn from_seed_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed reading place seed {}", path.display()))?;
        let documents: Vec<Value> = serde_json::from_str(&raw)
            .with_context(|| format!("place seed {} is not a JSON array", path.display()))?;
        Self::with_documents(documents)
    }

    pub fn insert_document(&self, document: Value) -> Result<()> {
        let Value::Object(document) = document else {
            bail!("place documents must be JSON objects");
        };
        self.documents.write().push(document);
        Ok(())
    }

    pub fn documents(&self) -> Vec<Value> {
        self.documents
            .read()
            .iter()
            .cloned()
            .map(Value::Object)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }
}

impl PlaceRepository for MemoryPlaceStore {
    async fn find_places(&self, query: &PlaceQuery) -> Result<Vec<PlaceRecord>> {
        let projected = self
            .documents
            .read()
            .iter()
            .filter(|document| {
                query.matches_region(document.get("region").and_then(Value::as_str))
            })
            .map(project_place_document)
            .collect::<Vec<_>>();

        Ok(normalize_documents(projected))
    }
}
