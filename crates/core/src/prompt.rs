use serde_json::json;

use crate::models::{DaySkeleton, PlaceRecord, TripRequest};

pub const SYSTEM_PROMPT: &str = "Please output valid JSON and utilize only data that exists within the place documents provided in the prompt.";
pub const DEFAULT_DESTINATION_COUNTRY: &str = "Bahrain";

#[derive(Debug, Clone)]
pub struct PromptSettings {
    pub destination_country: String,
}

impl Default for PromptSettings {
    fn default() -> Self {
        Self {
            destination_country: DEFAULT_DESTINATION_COUNTRY.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ItineraryPrompt {
    pub system: String,
    pub user: String,
    pub skeleton: Vec<DaySkeleton>,
    pub candidate_count: usize,
}

pub fn build_day_skeleton(days: u32) -> Vec<DaySkeleton> {
    (1..=days)
        .map(|day| DaySkeleton {
            title: format!("Day {}", day),
            description: format!("This is a description for Day {}", day),
            places: Vec::new(),
        })
        .collect()
}

pub fn render_itinerary_prompt(
    request: &TripRequest,
    candidates: &[PlaceRecord],
    settings: &PromptSettings,
) -> Result<ItineraryPrompt, serde_json::Error> {
    let days = request.days;
    let regions = request.selected_region.regions().join(", ");
    let country = settings.destination_country.as_str();
    let activities = request.activities();
    let activities = if activities.is_empty() {
        "no particular preference".to_string()
    } else {
        activities.join(", ")
    };

    let skeleton = build_day_skeleton(days);
    let example = json!({
        "trip": {
            "title": format!("Exploring {} of {}", regions, country),
            "description": format!("A {}-day adventure across {} of {}.", days, regions, country),
            "days": skeleton,
        }
    });
    let example = serde_json::to_string_pretty(&example)?;
    let places = serde_json::to_string_pretty(candidates)?;

    let user = format!(
        "Generate a detailed itinerary for a {days}-day trip to {regions} in {country}, \
with a budget of {budget} and a group size of {group_size}. \
The traveller's favourite activities are: {activities}.

Rules:
1. Respond with valid JSON only. No prose, no markdown fences.
2. Return exactly {days} day objects titled \"Day 1\" through \"Day {days}\", in order, each with its own description.
3. Each day must feature three or more distinct places. Prefer places that match the favourite activities; when none match, choose any available place from the candidate list.
4. Only use places from the candidate list below. Never invent a place that is not in it.
5. Copy each chosen place object exactly as supplied: same field names, same value formats.

Follow this structure:
{example}

Candidate places:
{places}
",
        budget = request.budget,
        group_size = request.group_size,
    );

    Ok(ItineraryPrompt {
        system: SYSTEM_PROMPT.to_string(),
        user,
        skeleton,
        candidate_count: candidates.len(),
    })
}
