use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;
use venture_core::{
    audit_reply, parse_model_reply, render_itinerary_prompt, ItineraryPrompt, PlaceRecord,
    PromptSettings, TripRequest,
};
use venture_observability::AppMetrics;
use venture_storage::{PlaceQuery, PlaceRepository};

use crate::completion::{CompletionRequest, CompletionService};
use crate::error::PlannerError;

pub const ITINERARY_TEMPERATURE: f32 = 0.5;

/// Turns a trip request into a model-written itinerary: candidate lookup,
/// prompt rendering, one completion call, JSON parsing.
pub struct ItineraryPlanner<S, C>
where
    S: PlaceRepository,
    C: CompletionService,
{
    store: Arc<S>,
    completion: Arc<C>,
    settings: PromptSettings,
    metrics: Arc<AppMetrics>,
}

impl<S, C> ItineraryPlanner<S, C>
where
    S: PlaceRepository,
    C: CompletionService,
{
    pub fn new(
        store: Arc<S>,
        completion: Arc<C>,
        settings: PromptSettings,
        metrics: Arc<AppMetrics>,
    ) -> Self {
        Self {
            store,
            completion,
            settings,
            metrics,
        }
    }

    pub fn model(&self) -> &str {
        self.completion.model()
    }

    #[instrument(
        skip(self, request),
        fields(generation_id = %Uuid::new_v4(), days = request.days, group_size = request.group_size)
    )]
    pub async fn generate(&self, request: TripRequest) -> Result<Value, PlannerError> {
        let started = Instant::now();
        self.metrics.inc_request();

        let outcome = self.run(request).await;
        self.metrics.observe_latency(started.elapsed());

        if let Err(error) = &outcome {
            match error {
                PlannerError::Validation(_) => self.metrics.inc_validation_rejection(),
                PlannerError::Store(_) => self.metrics.inc_store_failure(),
                PlannerError::Completion(_) => self.metrics.inc_completion_failure(),
                PlannerError::MalformedReply(_) => self.metrics.inc_malformed_reply(),
                PlannerError::Prompt(_) => {}
            }
            warn!(error = %error, "itinerary generation failed");
        }

        outcome
    }

    /// Validated request to the candidate places it would be offered.
    pub async fn candidates(&self, request: &TripRequest) -> Result<Vec<PlaceRecord>, PlannerError> {
        request.validate()?;

        let query = PlaceQuery::for_regions(request.selected_region.regions());
        let candidates = self
            .store
            .find_places(&query)
            .await
            .map_err(PlannerError::Store)?;

        if candidates.is_empty() {
            warn!(regions = ?query.regions, "no candidate places for selected regions");
        }

        Ok(candidates)
    }

    /// The prompt `generate` would send, without calling the model.
    pub async fn preview_prompt(&self, request: &TripRequest) -> Result<ItineraryPrompt, PlannerError> {
        let candidates = self.candidates(request).await?;
        Ok(render_itinerary_prompt(request, &candidates, &self.settings)?)
    }

    async fn run(&self, request: TripRequest) -> Result<Value, PlannerError> {
        let candidates = self.candidates(&request).await?;
        self.metrics.add_candidates(candidates.len());

        let prompt = render_itinerary_prompt(&request, &candidates, &self.settings)?;
        debug!(prompt = %prompt.user, "rendered itinerary prompt");

        let content = self
            .completion
            .complete(CompletionRequest {
                system_prompt: prompt.system,
                user_prompt: prompt.user,
                temperature: ITINERARY_TEMPERATURE,
                json_response: true,
            })
            .await?;
        debug!(reply = %content, "raw model reply");

        let itinerary = parse_model_reply(&content).map_err(PlannerError::MalformedReply)?;

        let audit = audit_reply(&itinerary, &candidates);
        if audit.day_count != Some(request.days as usize) {
            warn!(expected = request.days, returned = ?audit.day_count, "model returned a different day count");
        }
        if !audit.unknown_places.is_empty() {
            warn!(unknown = ?audit.unknown_places, "model referenced places outside the candidate set");
        }

        info!(
            model = %self.completion.model(),
            candidates = candidates.len(),
            referenced_places = audit.referenced_places,
            "itinerary generated"
        );

        Ok(itinerary)
    }
}
