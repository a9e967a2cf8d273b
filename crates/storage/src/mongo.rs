use anyhow::{Context, Result};
use futures::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::{Client, Collection};
use serde_json::{Map, Value};
use tracing::debug;
use venture_core::{PlaceRecord, PLACE_PROJECTION_FIELDS};

use crate::{normalize_documents, PlaceQuery, PlaceRepository};

pub const DEFAULT_DATABASE: &str = "test";
pub const DEFAULT_PLACES_COLLECTION: &str = "places";

#[derive(Debug, Clone)]
pub struct MongoSettings {
    pub url: String,
    pub database: String,
    pub collection: String,
}

impl MongoSettings {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            database: DEFAULT_DATABASE.to_string(),
            collection: DEFAULT_PLACES_COLLECTION.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct MongoPlaceStore {
    collection: Collection<Document>,
}

impl MongoPlaceStore {
    /// Builds the process-wide client; the driver pools connections lazily.
    pub async fn connect(settings: &MongoSettings) -> Result<Self> {
        let client = Client::with_uri_str(&settings.url)
            .await
            .context("failed configuring document store client")?;

        let collection = client
            .database(&settings.database)
            .collection::<Document>(&settings.collection);

        Ok(Self { collection })
    }
}

impl PlaceRepository for MongoPlaceStore {
    async fn find_places(&self, query: &PlaceQuery) -> Result<Vec<PlaceRecord>> {
        let filter = region_filter(query);
        debug!(filter = %filter, "querying place collection");

        let cursor = self
            .collection
            .find(filter)
            .projection(place_projection())
            .await
            .context("place query failed")?;

        let documents: Vec<Document> = cursor
            .try_collect()
            .await
            .context("failed reading place cursor")?;

        Ok(normalize_documents(documents.into_iter().map(document_to_json)))
    }
}

fn region_filter(query: &PlaceQuery) -> Document {
    if query.regions.is_empty() {
        doc! {}
    } else {
        doc! { "region": { "$in": query.regions.clone() } }
    }
}

fn place_projection() -> Document {
    let mut projection = Document::new();
    for field in PLACE_PROJECTION_FIELDS {
        if field == "imagePlace" {
            projection.insert(field, doc! { "$slice": 1 });
        } else {
            projection.insert(field, 1);
        }
    }
    projection
}

/// Relaxed extended JSON keeps numbers plain and renders object ids as
/// `{"$oid": ...}`, which normalization collapses to strings.
fn document_to_json(document: Document) -> Map<String, Value> {
    match Bson::Document(document).into_relaxed_extjson() {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
