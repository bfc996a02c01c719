// Lineup validation against per-position starter limits.

use std::collections::BTreeMap;

use crate::roster::{PlayerEntry, Position};
use crate::scoring::rules::ScoringRules;

/// One position over its starter limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitViolation {
    pub position: Position,
    pub current: usize,
    pub limit: usize,
    pub excess: usize,
}

/// Result of validating a lineup. Bench players never contribute to
/// violations; only starter counts are checked.
#[derive(Debug, Clone)]
pub struct LineupReport {
    pub valid: bool,
    pub starter_counts: BTreeMap<Position, usize>,
    pub violations: Vec<LimitViolation>,
}

/// Count starters per position and flag every position over its limit.
/// Violations come back in canonical position order.
pub fn validate_lineup(players: &[PlayerEntry], rules: &ScoringRules) -> LineupReport {
    let mut starter_counts: BTreeMap<Position, usize> = BTreeMap::new();
    for player in players {
        if player.is_starter {
            *starter_counts.entry(player.position).or_insert(0) += 1;
        }
    }

    let mut violations = Vec::new();
    for (&position, &current) in &starter_counts {
        let limit = rules.starter_limit(position);
        if current > limit {
            violations.push(LimitViolation {
                position,
                current,
                limit,
                excess: current - limit,
            });
        }
    }

    LineupReport {
        valid: violations.is_empty(),
        starter_counts,
        violations,
    }
}

/// Whether another starter can be added at `position` without breaking its
/// limit. Checks the current roster only; it does not reserve the slot.
pub fn can_add_starter(players: &[PlayerEntry], position: Position, rules: &ScoringRules) -> bool {
    let report = validate_lineup(players, rules);
    let current = report.starter_counts.get(&position).copied().unwrap_or(0);
    current < rules.starter_limit(position)
}
