// Scoring engine: rule tables, player/team scores, and lineup validation.

pub mod lineup;
pub mod rules;
pub mod strength;

pub use lineup::{can_add_starter, validate_lineup, LimitViolation, LineupReport};
pub use rules::{ScoringPreset, ScoringRules};
pub use strength::{
    player_score, position_breakdown, round2, team_strength, PositionScore, StrengthTotals,
};
