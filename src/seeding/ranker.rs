use std::cmp::Ordering;

use log::debug;

use super::types::{ParticipantId, PhaseParticipantResult, SeedingCriterion};
use super::SeedingError;

/// Orders participants highest seed first.
///
/// Criteria are applied in order, each compared descending; the first one
/// that differs decides. Participants tied on every criterion keep their
/// input order, so the same input always yields the same seeding.
pub fn rank(
    results: &[PhaseParticipantResult],
    criteria: &[SeedingCriterion],
) -> Result<Vec<ParticipantId>, SeedingError> {
    if criteria.is_empty() {
        return Err(SeedingError::InvalidCriteria(
            "at least one criterion is required".to_string(),
        ));
    }

    let mut ordered: Vec<&PhaseParticipantResult> = results.iter().collect();
    // slice::sort_by is stable
    ordered.sort_by(|a, b| compare(a, b, criteria));

    debug!("Ranked {} participants by {:?}", ordered.len(), criteria);

    Ok(ordered
        .into_iter()
        .map(|result| result.participant_id.clone())
        .collect())
}

fn compare(
    a: &PhaseParticipantResult,
    b: &PhaseParticipantResult,
    criteria: &[SeedingCriterion],
) -> Ordering {
    criteria
        .iter()
        .map(|&criterion| b.stat(criterion).cmp(&a.stat(criterion)))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}
