mod completion;
mod error;
mod openai;
mod planner;

pub use completion::{CompletionRequest, CompletionService};
pub use error::{CompletionError, PlannerError};
pub use openai::{OpenAiCompletionClient, OpenAiConfig, DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL};
pub use planner::{ItineraryPlanner, ITINERARY_TEMPERATURE};
