use serde_json::{Map, Number, Value};
use thiserror::Error;

use crate::models::{
    GeoPoint, OrNa, PlaceCategory, PlaceRecord, VisitDuration, DEFAULT_PLACE_DESCRIPTION,
    NOT_AVAILABLE,
};

/// Fields fetched from the place collection. `imagePlace` is sliced to its
/// first element by the store.
pub const PLACE_PROJECTION_FIELDS: [&str; 10] = [
    "_id",
    "name",
    "category",
    "description",
    "imagePlace",
    "rate",
    "duration",
    "priceRange",
    "region",
    "googleLocation",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("place document is missing `{0}`")]
    MissingField(&'static str),
}

/// Renders identifiers and image references as plain strings.
///
/// Extended-JSON object ids (`{"$oid": "..."}`) collapse to their hex value;
/// strings pass through unchanged, so the conversion is idempotent.
pub fn stringify_reference(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        Value::Object(map) => match map.get("$oid") {
            Some(Value::String(hex)) => hex.clone(),
            _ => value.to_string(),
        },
        other => other.to_string(),
    }
}

pub fn normalize_place(document: &Map<String, Value>) -> Result<PlaceRecord, NormalizeError> {
    let id = document
        .get("_id")
        .map(stringify_reference)
        .filter(|id| !id.is_empty())
        .ok_or(NormalizeError::MissingField("_id"))?;

    let name = document
        .get("name")
        .and_then(Value::as_str)
        .map(ToString::to_string)
        .ok_or(NormalizeError::MissingField("name"))?;

    let category = match document.get("category") {
        Some(Value::Null) | None => PlaceCategory::Unspecified,
        Some(Value::String(raw)) => PlaceCategory::parse(raw),
        Some(other) => PlaceCategory::Other(other.to_string()),
    };

    let description = document
        .get("description")
        .and_then(Value::as_str)
        .map(ToString::to_string)
        .unwrap_or_else(|| DEFAULT_PLACE_DESCRIPTION.to_string());

    let image_place = match document.get("imagePlace") {
        Some(Value::Array(images)) => images.first().map(stringify_reference).unwrap_or_default(),
        Some(Value::Null) | None => String::new(),
        Some(single) => stringify_reference(single),
    };

    let rate = match document.get("rate") {
        Some(Value::Number(rate)) => rate.clone(),
        _ => Number::from(0),
    };

    let duration = match document.get("duration") {
        Some(Value::Number(amount)) => Some(VisitDuration::Amount(amount.clone())),
        Some(Value::String(text)) if text != NOT_AVAILABLE => Some(VisitDuration::Text(text.clone())),
        _ => None,
    };

    let price_range = document
        .get("priceRange")
        .and_then(Value::as_str)
        .filter(|text| *text != NOT_AVAILABLE)
        .map(ToString::to_string);

    let region = document
        .get("region")
        .and_then(Value::as_str)
        .unwrap_or(NOT_AVAILABLE)
        .to_string();

    let location = document.get("googleLocation").and_then(Value::as_object);
    let coordinate = |key: &str| location.and_then(|loc| loc.get(key)).and_then(Value::as_f64);

    Ok(PlaceRecord {
        id,
        category,
        name,
        description,
        image_place,
        rate,
        duration: OrNa::from(duration),
        price_range: OrNa::from(price_range),
        region,
        google_location: GeoPoint {
            lat: OrNa::from(coordinate("lat")),
            lng: OrNa::from(coordinate("lng")),
        },
    })
}

/// Applies the store projection to a raw document: only the projected fields
/// survive and `imagePlace` keeps its first element.
pub fn project_place_document(document: &Map<String, Value>) -> Map<String, Value> {
    let mut projected = Map::new();
    for field in PLACE_PROJECTION_FIELDS {
        let Some(value) = document.get(field) else {
            continue;
        };
        let value = match (field, value) {
            ("imagePlace", Value::Array(images)) => {
                Value::Array(images.iter().take(1).cloned().collect())
            }
            _ => value.clone(),
        };
        projected.insert(field.to_string(), value);
    }
    projected
}
