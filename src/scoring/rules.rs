// Scoring rule tables and presets.
//
// Rules are plain values passed into the scoring functions, so callers can
// run different league configurations side by side without shared state.

use std::collections::BTreeMap;

use crate::roster::Position;

// ---------------------------------------------------------------------------
// ScoringPreset
// ---------------------------------------------------------------------------

/// Reception scoring preset. Determines the per-reception bonus folded into
/// every player score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoringPreset {
    Standard,
    HalfPpr,
    Ppr,
}

impl ScoringPreset {
    /// Resolve a preset from its settings key. Unknown keys fall back to
    /// full PPR, the most common league default.
    pub fn from_key(key: &str) -> Self {
        match key {
            "Standard" => ScoringPreset::Standard,
            "Half-PPR" => ScoringPreset::HalfPpr,
            "PPR" => ScoringPreset::Ppr,
            _ => ScoringPreset::Ppr,
        }
    }

    /// The settings key for this preset.
    pub fn key(&self) -> &'static str {
        match self {
            ScoringPreset::Standard => "Standard",
            ScoringPreset::HalfPpr => "Half-PPR",
            ScoringPreset::Ppr => "PPR",
        }
    }

    /// Points credited per estimated reception.
    pub fn reception_bonus(&self) -> f64 {
        match self {
            ScoringPreset::Standard => 0.0,
            ScoringPreset::HalfPpr => 0.5,
            ScoringPreset::Ppr => 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// ScoringRules
// ---------------------------------------------------------------------------

/// Per-position rule tables: projection weight, starter limit, and the
/// estimated receptions used for PPR-style bonuses.
///
/// Positions absent from a table use neutral defaults (weight 1.0, one
/// starter slot, zero receptions), so `Unknown` players score at face value.
#[derive(Debug, Clone)]
pub struct ScoringRules {
    weights: BTreeMap<Position, f64>,
    starter_limits: BTreeMap<Position, usize>,
    avg_receptions: BTreeMap<Position, f64>,
}

impl Default for ScoringRules {
    fn default() -> Self {
        let weights = [
            (Position::Qb, 1.00),
            (Position::Rb, 1.08),
            (Position::Wr, 1.08),
            (Position::Te, 1.00),
            (Position::Flex, 1.00),
            (Position::K, 0.45),
            (Position::Def, 0.65),
            (Position::Dst, 0.65),
        ]
        .into_iter()
        .collect();

        let starter_limits = [
            (Position::Qb, 1),
            (Position::Rb, 2),
            (Position::Wr, 2),
            (Position::Te, 1),
            (Position::Flex, 1),
            (Position::K, 1),
            (Position::Def, 1),
            (Position::Dst, 1),
        ]
        .into_iter()
        .collect();

        let avg_receptions = [
            (Position::Qb, 0.0),
            (Position::Rb, 3.5),
            (Position::Wr, 6.0),
            (Position::Te, 4.5),
            (Position::Flex, 5.0),
            (Position::K, 0.0),
            (Position::Def, 0.0),
            (Position::Dst, 0.0),
        ]
        .into_iter()
        .collect();

        Self {
            weights,
            starter_limits,
            avg_receptions,
        }
    }
}

impl ScoringRules {
    /// Build rules from explicit tables. Positions missing from a table fall
    /// back to the neutral defaults at lookup time.
    pub fn new(
        weights: BTreeMap<Position, f64>,
        starter_limits: BTreeMap<Position, usize>,
        avg_receptions: BTreeMap<Position, f64>,
    ) -> Self {
        Self {
            weights,
            starter_limits,
            avg_receptions,
        }
    }

    /// Projection weight for a position (default 1.0).
    pub fn weight(&self, pos: Position) -> f64 {
        self.weights.get(&pos).copied().unwrap_or(1.0)
    }

    /// Starter slot limit for a position (default 1).
    pub fn starter_limit(&self, pos: Position) -> usize {
        self.starter_limits.get(&pos).copied().unwrap_or(1)
    }

    /// Estimated average receptions for a position (default 0.0).
    pub fn avg_receptions(&self, pos: Position) -> f64 {
        self.avg_receptions.get(&pos).copied().unwrap_or(0.0)
    }

    /// Replace the starter limit for one position.
    pub fn set_starter_limit(&mut self, pos: Position, limit: usize) {
        self.starter_limits.insert(pos, limit);
    }

    /// Replace the projection weight for one position.
    pub fn set_weight(&mut self, pos: Position, weight: f64) {
        self.weights.insert(pos, weight);
    }

    /// Replace the estimated receptions for one position.
    pub fn set_avg_receptions(&mut self, pos: Position, receptions: f64) {
        self.avg_receptions.insert(pos, receptions);
    }

    /// The configured starter-limit table in position order. Used by the
    /// lineup validator's zero-starter warnings.
    pub fn starter_limits(&self) -> impl Iterator<Item = (Position, usize)> + '_ {
        self.starter_limits.iter().map(|(&p, &l)| (p, l))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_keys_round_trip() {
        for preset in [
            ScoringPreset::Standard,
            ScoringPreset::HalfPpr,
            ScoringPreset::Ppr,
        ] {
            assert_eq!(ScoringPreset::from_key(preset.key()), preset);
        }
    }

    #[test]
    fn unknown_preset_key_falls_back_to_ppr() {
        assert_eq!(ScoringPreset::from_key("Superflex"), ScoringPreset::Ppr);
        assert_eq!(ScoringPreset::from_key(""), ScoringPreset::Ppr);
        // Keys are exact: lowercase "ppr" is not a recognized preset.
        assert_eq!(ScoringPreset::from_key("ppr"), ScoringPreset::Ppr);
    }

    #[test]
    fn reception_bonuses() {
        assert_eq!(ScoringPreset::Standard.reception_bonus(), 0.0);
        assert_eq!(ScoringPreset::HalfPpr.reception_bonus(), 0.5);
        assert_eq!(ScoringPreset::Ppr.reception_bonus(), 1.0);
    }

    #[test]
    fn default_tables_match_league_conventions() {
        let rules = ScoringRules::default();
        assert!((rules.weight(Position::Rb) - 1.08).abs() < 1e-9);
        assert!((rules.weight(Position::K) - 0.45).abs() < 1e-9);
        assert!((rules.weight(Position::Def) - 0.65).abs() < 1e-9);
        assert!((rules.weight(Position::Dst) - 0.65).abs() < 1e-9);
        assert_eq!(rules.starter_limit(Position::Rb), 2);
        assert_eq!(rules.starter_limit(Position::Wr), 2);
        assert_eq!(rules.starter_limit(Position::Qb), 1);
        assert!((rules.avg_receptions(Position::Wr) - 6.0).abs() < 1e-9);
        assert!((rules.avg_receptions(Position::Flex) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_position_gets_neutral_defaults() {
        let rules = ScoringRules::default();
        assert!((rules.weight(Position::Unknown) - 1.0).abs() < 1e-9);
        assert_eq!(rules.starter_limit(Position::Unknown), 1);
        assert_eq!(rules.avg_receptions(Position::Unknown), 0.0);
    }

    #[test]
    fn overrides_replace_table_entries() {
        let mut rules = ScoringRules::default();
        rules.set_starter_limit(Position::Qb, 2);
        rules.set_weight(Position::Te, 1.5);
        assert_eq!(rules.starter_limit(Position::Qb), 2);
        assert!((rules.weight(Position::Te) - 1.5).abs() < 1e-9);
        // Untouched entries keep their defaults.
        assert_eq!(rules.starter_limit(Position::Rb), 2);
    }
}
