pub mod notebooks;
pub mod notes;

use quicknotes_core::error::CoreError;
use quicknotes_core::types::DbId;

use crate::error::AppError;

/// Parse a path id. Anything that is not a UUID cannot name an existing
/// entity, so it is reported as not found.
pub(crate) fn parse_id(entity: &'static str, raw: &str) -> Result<DbId, AppError> {
    raw.parse::<DbId>()
        .map_err(|_| AppError::Core(CoreError::not_found(entity, raw)))
}
