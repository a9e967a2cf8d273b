use thiserror::Error;

use crate::models::{TripRequest, MAX_TRIP_DAYS};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("selectedRegion must name at least one region")]
    NoRegion,
    #[error("days must be between 1 and {max}, got {got}")]
    DaysOutOfRange { got: u32, max: u32 },
    #[error("groupSize must be at least 1")]
    EmptyGroup,
}

impl TripRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.selected_region.regions().is_empty() {
            return Err(ValidationError::NoRegion);
        }

        if self.days == 0 || self.days > MAX_TRIP_DAYS {
            return Err(ValidationError::DaysOutOfRange {
                got: self.days,
                max: MAX_TRIP_DAYS,
            });
        }

        if self.group_size == 0 {
            return Err(ValidationError::EmptyGroup);
        }

        Ok(())
    }
}
