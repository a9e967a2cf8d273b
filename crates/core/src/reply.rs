use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;

use crate::models::PlaceRecord;
use crate::normalize::stringify_reference;

pub fn parse_model_reply(content: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(content.trim())
}

/// What the model returned compared with what it was offered. Informational
/// only; the reply is passed through regardless.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReplyAudit {
    pub day_count: Option<usize>,
    pub referenced_places: usize,
    pub unknown_places: Vec<String>,
}

pub fn audit_reply(reply: &Value, candidates: &[PlaceRecord]) -> ReplyAudit {
    let Some(days) = reply.pointer("/trip/days").and_then(Value::as_array) else {
        return ReplyAudit::default();
    };

    let known_ids = candidates.iter().map(|p| p.id.as_str()).collect::<HashSet<_>>();
    let known_names = candidates.iter().map(|p| p.name.as_str()).collect::<HashSet<_>>();

    let mut audit = ReplyAudit {
        day_count: Some(days.len()),
        ..ReplyAudit::default()
    };

    let places = days
        .iter()
        .filter_map(|day| day.get("places").and_then(Value::as_array))
        .flatten();

    for place in places {
        audit.referenced_places += 1;

        let id = place.get("_id").map(stringify_reference);
        let name = place.get("name").and_then(Value::as_str);

        let known = match (&id, name) {
            (Some(id), _) if known_ids.contains(id.as_str()) => true,
            (_, Some(name)) => known_names.contains(name),
            _ => false,
        };

        if !known {
            let label = name
                .map(ToString::to_string)
                .or(id)
                .unwrap_or_else(|| place.to_string());
            audit.unknown_places.push(label);
        }
    }

    audit
}
