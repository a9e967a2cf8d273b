use std::fmt;

use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Number;

pub const MAX_TRIP_DAYS: u32 = 30;
pub const NOT_AVAILABLE: &str = "N/A";
pub const DEFAULT_PLACE_DESCRIPTION: &str = "No description provided";

/// `selectedRegion` arrives either as one name or as a list, depending on the
/// client version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RegionSelection {
    One(String),
    Many(Vec<String>),
}

impl RegionSelection {
    /// Trimmed, de-duplicated region names in request order.
    pub fn regions(&self) -> Vec<String> {
        let raw: Vec<&str> = match self {
            Self::One(region) => vec![region.as_str()],
            Self::Many(regions) => regions.iter().map(String::as_str).collect(),
        };

        let mut regions: Vec<String> = Vec::with_capacity(raw.len());
        for region in raw.into_iter().map(str::trim).filter(|r| !r.is_empty()) {
            if !regions.iter().any(|existing| existing == region) {
                regions.push(region.to_string());
            }
        }
        regions
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Budget {
    Amount(Number),
    Text(String),
}

impl Budget {
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        match serde_json::from_str::<Number>(trimmed) {
            Ok(number) => Self::Amount(number),
            Err(_) => Self::Text(trimmed.to_string()),
        }
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Amount(amount) => write!(f, "{}", amount),
            Self::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FavouriteActivities {
    Text(String),
    List(Vec<String>),
}

impl FavouriteActivities {
    pub fn items(&self) -> Vec<String> {
        match self {
            Self::Text(text) => text
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(ToString::to_string)
                .collect(),
            Self::List(items) => items
                .iter()
                .map(|item| item.trim())
                .filter(|item| !item.is_empty())
                .map(ToString::to_string)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRequest {
    pub selected_region: RegionSelection,
    pub budget: Budget,
    pub days: u32,
    pub group_size: u32,
    #[serde(default)]
    pub favourite_activities: Option<FavouriteActivities>,
}

impl TripRequest {
    pub fn activities(&self) -> Vec<String> {
        self.favourite_activities
            .as_ref()
            .map(FavouriteActivities::items)
            .unwrap_or_default()
    }
}

/// The categories the client groups places under. Any other stored value is
/// kept verbatim so the model sees what the collection holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PlaceCategory {
    ThingsToDo,
    ThingsToEat,
    PlacesToStay,
    Other(String),
    Unspecified,
}

impl PlaceCategory {
    pub fn parse(value: &str) -> Self {
        match value {
            "thingsToDo" => Self::ThingsToDo,
            "thingsToEat" => Self::ThingsToEat,
            "placesToStay" => Self::PlacesToStay,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::ThingsToDo => "thingsToDo",
            Self::ThingsToEat => "thingsToEat",
            Self::PlacesToStay => "placesToStay",
            Self::Other(raw) => raw,
            Self::Unspecified => NOT_AVAILABLE,
        }
    }
}

impl Serialize for PlaceCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A field that serializes as `"N/A"` when the source document lacks it.
#[derive(Debug, Clone, PartialEq)]
pub struct OrNa<T>(pub Option<T>);

impl<T> OrNa<T> {
    pub fn value(&self) -> Option<&T> {
        self.0.as_ref()
    }

    pub fn is_missing(&self) -> bool {
        self.0.is_none()
    }
}

impl<T> From<Option<T>> for OrNa<T> {
    fn from(value: Option<T>) -> Self {
        Self(value)
    }
}

impl<T: Serialize> Serialize for OrNa<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.0 {
            Some(value) => value.serialize(serializer),
            None => serializer.serialize_str(NOT_AVAILABLE),
        }
    }
}

/// Stored either as minutes or as free text such as "2-3 hours".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum VisitDuration {
    Amount(Number),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: OrNa<f64>,
    pub lng: OrNa<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub category: PlaceCategory,
    pub name: String,
    pub description: String,
    pub image_place: String,
    /// Kept as stored, so `4` stays `4` rather than `4.0`.
    pub rate: Number,
    pub duration: OrNa<VisitDuration>,
    pub price_range: OrNa<String>,
    pub region: String,
    pub google_location: GeoPoint,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySkeleton {
    pub title: String,
    pub description: String,
    pub places: Vec<PlaceRecord>,
}
