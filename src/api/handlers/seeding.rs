use std::sync::Arc;

use axum::extract::State;
use axum::response::Json;

use super::AppState;
use crate::api::error::ApiError;
use crate::api::extract::JsonBody;
use crate::api::models::{RankRequest, RankResponse, SeedEntry};
use crate::seeding::{self, SeedingCriterion};

pub async fn rank_phase(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody<RankRequest>,
) -> Result<Json<RankResponse>, ApiError> {
    let criteria: Vec<SeedingCriterion> = match body.criteria {
        Some(names) => names
            .iter()
            .map(|name| name.parse())
            .collect::<Result<_, _>>()?,
        None => state.config.seeding.default_criteria.clone(),
    };

    let results = match (body.results, body.games) {
        (Some(results), None) => results,
        (None, Some(games)) => seeding::tally(&games),
        _ => {
            return Err(ApiError::BadRequest(
                "Provide exactly one of results or games".to_string(),
            ))
        }
    };

    let order = seeding::rank(&results, &criteria)?;

    Ok(Json(RankResponse {
        criteria: criteria.iter().map(|c| c.as_str().to_string()).collect(),
        seeds: order
            .into_iter()
            .enumerate()
            .map(|(idx, participant_id)| SeedEntry {
                seed: idx + 1,
                participant_id,
            })
            .collect(),
    }))
}
