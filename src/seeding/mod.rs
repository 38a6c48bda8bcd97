pub mod ranker;
pub mod standings;
pub mod types;

use thiserror::Error;

pub use ranker::rank;
pub use standings::tally;
pub use types::{GameOutcome, ParticipantId, PhaseInput, PhaseParticipantResult, SeedingCriterion};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SeedingError {
    #[error("invalid seeding criteria: {0}")]
    InvalidCriteria(String),
}

/// Parses a comma-separated chain such as `wins,point_differential,points_for`.
pub fn parse_criteria_list(list: &str) -> Result<Vec<SeedingCriterion>, SeedingError> {
    let criteria = list
        .split(',')
        .filter(|name| !name.trim().is_empty())
        .map(str::parse)
        .collect::<Result<Vec<_>, _>>()?;

    if criteria.is_empty() {
        return Err(SeedingError::InvalidCriteria(
            "at least one criterion is required".to_string(),
        ));
    }
    Ok(criteria)
}
