use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::SeedingError;

pub type ParticipantId = String;

/// Finalized statistics for one participant at the end of a phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseParticipantResult {
    pub participant_id: ParticipantId,
    pub wins: u32,
    pub losses: u32,
    pub points_for: i64,
    pub points_against: i64,
}

impl PhaseParticipantResult {
    pub fn new(participant_id: impl Into<ParticipantId>) -> Self {
        Self {
            participant_id: participant_id.into(),
            wins: 0,
            losses: 0,
            points_for: 0,
            points_against: 0,
        }
    }

    pub fn point_differential(&self) -> i64 {
        self.points_for.saturating_sub(self.points_against)
    }

    /// Value of the given statistic; larger is always better.
    pub fn stat(&self, criterion: SeedingCriterion) -> i64 {
        match criterion {
            SeedingCriterion::Wins => i64::from(self.wins),
            SeedingCriterion::PointDifferential => self.point_differential(),
            SeedingCriterion::PointsFor => self.points_for,
        }
    }
}

/// A statistic the ranker may order by, compared descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SeedingCriterion {
    Wins,
    PointDifferential,
    PointsFor,
}

impl SeedingCriterion {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeedingCriterion::Wins => "wins",
            SeedingCriterion::PointDifferential => "pointDifferential",
            SeedingCriterion::PointsFor => "pointsFor",
        }
    }
}

impl FromStr for SeedingCriterion {
    type Err = SeedingError;

    // Format configs spell these in snake_case, API clients in camelCase.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "wins" => Ok(SeedingCriterion::Wins),
            "pointDifferential" | "point_differential" => Ok(SeedingCriterion::PointDifferential),
            "pointsFor" | "points_for" => Ok(SeedingCriterion::PointsFor),
            other => Err(SeedingError::InvalidCriteria(format!(
                "unknown statistic '{}'",
                other
            ))),
        }
    }
}

impl TryFrom<String> for SeedingCriterion {
    type Error = SeedingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SeedingCriterion> for String {
    fn from(value: SeedingCriterion) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for SeedingCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One finished game from a participant's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameOutcome {
    pub participant_id: ParticipantId,
    pub opponent_id: ParticipantId,
    pub score_for: i64,
    pub score_against: i64,
}

/// Input accepted by the seeding endpoints: either finished statistics or
/// the raw games they are tallied from.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PhaseInput {
    Results(Vec<PhaseParticipantResult>),
    Games { games: Vec<GameOutcome> },
}

impl PhaseInput {
    pub fn into_results(self) -> Vec<PhaseParticipantResult> {
        match self {
            PhaseInput::Results(results) => results,
            PhaseInput::Games { games } => super::standings::tally(&games),
        }
    }
}
