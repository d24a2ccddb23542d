// ABOUTME: Episode and part services
// ABOUTME: Run validation, per-episode locking, and transactional position maintenance

mod episodes;
mod parts;

pub use episodes::EpisodeService;
pub use parts::{PartService, PositionStatus, PositionUpdate, ReorderOutcome};

use partwise_core::ValidationError;

use crate::error::{ServiceError, ServiceResult};

/// Turn collected field errors into a `Validation` failure
pub(crate) fn reject(errors: Vec<ValidationError>) -> ServiceResult<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ServiceError::Validation(errors))
    }
}
