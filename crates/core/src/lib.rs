pub mod models;
pub mod normalize;
pub mod prompt;
pub mod reply;
pub mod validation;

pub use models::*;
pub use normalize::{
    normalize_place, project_place_document, stringify_reference, NormalizeError,
    PLACE_PROJECTION_FIELDS,
};
pub use prompt::{
    build_day_skeleton, render_itinerary_prompt, ItineraryPrompt, PromptSettings,
    DEFAULT_DESTINATION_COUNTRY, SYSTEM_PROMPT,
};
pub use reply::{audit_reply, parse_model_reply, ReplyAudit};
pub use validation::ValidationError;
