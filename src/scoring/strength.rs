// Team strength math: individual scores, starter/bench totals, and the
// per-position breakdown. All functions here are pure; callers pass the rule
// tables and preset in, which keeps concurrent evaluation trivially safe.

use std::collections::BTreeMap;

use crate::roster::{PlayerEntry, Position};
use crate::scoring::rules::{ScoringPreset, ScoringRules};

/// Round to two decimal places, the precision used for every user-facing
/// strength figure.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Starter and bench point totals for a roster.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StrengthTotals {
    pub starters: f64,
    pub bench: f64,
}

/// Starter and bench totals for a single position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PositionScore {
    pub starter: f64,
    pub bench: f64,
}

/// Score a single player:
/// `projection * position_weight + avg_receptions * reception_bonus`.
///
/// The reception term is a positional estimate, so two players at the same
/// position with equal projections score identically under any preset.
pub fn player_score(player: &PlayerEntry, rules: &ScoringRules, preset: ScoringPreset) -> f64 {
    let base = player.projection * rules.weight(player.position);
    let bonus = rules.avg_receptions(player.position) * preset.reception_bonus();
    base + bonus
}

/// Sum player scores into separate starter and bench totals.
/// An empty roster yields zero for both.
pub fn team_strength(
    players: &[PlayerEntry],
    rules: &ScoringRules,
    preset: ScoringPreset,
) -> StrengthTotals {
    let mut totals = StrengthTotals::default();
    for player in players {
        let score = player_score(player, rules, preset);
        if player.is_starter {
            totals.starters += score;
        } else {
            totals.bench += score;
        }
    }
    totals
}

/// Per-position starter/bench totals, keyed in canonical position order.
pub fn position_breakdown(
    players: &[PlayerEntry],
    rules: &ScoringRules,
    preset: ScoringPreset,
) -> BTreeMap<Position, PositionScore> {
    let mut breakdown: BTreeMap<Position, PositionScore> = BTreeMap::new();
    for player in players {
        let score = player_score(player, rules, preset);
        let entry = breakdown.entry(player.position).or_default();
        if player.is_starter {
            entry.starter += score;
        } else {
            entry.bench += score;
        }
    }
    breakdown
}
