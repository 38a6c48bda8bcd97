use std::collections::HashMap;

use super::types::{GameOutcome, ParticipantId, PhaseParticipantResult};

/// Folds finished games into per-participant phase statistics.
///
/// Each game is recorded for both sides. Participants appear in the order
/// they are first seen, which is the order the ranker falls back to on a
/// full tie. A drawn game adds points but neither a win nor a loss.
pub fn tally(games: &[GameOutcome]) -> Vec<PhaseParticipantResult> {
    let mut order: Vec<ParticipantId> = Vec::new();
    let mut table: HashMap<ParticipantId, PhaseParticipantResult> = HashMap::new();

    for game in games {
        record(&mut order, &mut table, &game.participant_id, game.score_for, game.score_against);
        record(&mut order, &mut table, &game.opponent_id, game.score_against, game.score_for);
    }

    order
        .into_iter()
        .filter_map(|id| table.remove(&id))
        .collect()
}

fn record(
    order: &mut Vec<ParticipantId>,
    table: &mut HashMap<ParticipantId, PhaseParticipantResult>,
    participant_id: &str,
    scored: i64,
    conceded: i64,
) {
    let entry = table.entry(participant_id.to_string()).or_insert_with(|| {
        order.push(participant_id.to_string());
        PhaseParticipantResult::new(participant_id)
    });

    entry.points_for = entry.points_for.saturating_add(scored);
    entry.points_against = entry.points_against.saturating_add(conceded);
    if scored > conceded {
        entry.wins = entry.wins.saturating_add(1);
    } else if scored < conceded {
        entry.losses = entry.losses.saturating_add(1);
    }
}
