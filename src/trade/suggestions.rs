// Post-trade advice generation.
//
// Each advice category is its own rule implementing `SuggestionRule`, so
// callers can run the default set, a subset, or mix in custom rules. Every
// rule reads from a shared pre-computed `SuggestionContext` and emits
// ready-to-display lines.

use std::collections::BTreeMap;

use crate::roster::{PlayerEntry, Position};
use crate::scoring::{
    player_score, position_breakdown, round2, team_strength, validate_lineup, LineupReport,
    PositionScore, ScoringPreset, ScoringRules, StrengthTotals,
};
use crate::trade::simulator::Verdict;

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// A player reduced to what the advice rules need.
#[derive(Debug, Clone)]
pub struct ScoredPlayer {
    pub name: String,
    pub is_starter: bool,
    pub score: f64,
}

/// Everything the rules need, computed once per before/after roster pair.
#[derive(Debug, Clone)]
pub struct SuggestionContext {
    pub before_totals: StrengthTotals,
    pub after_totals: StrengthTotals,
    /// Rounded starter delta; drives the accept/neutral/reject gating.
    pub delta: f64,
    pub before_breakdown: BTreeMap<Position, PositionScore>,
    pub after_breakdown: BTreeMap<Position, PositionScore>,
    /// Post-trade players grouped by position, each group sorted by score
    /// descending.
    pub after_by_position: BTreeMap<Position, Vec<ScoredPlayer>>,
    pub after_lineup: LineupReport,
    pub rules: ScoringRules,
}

impl SuggestionContext {
    pub fn new(
        before_players: &[PlayerEntry],
        after_players: &[PlayerEntry],
        rules: &ScoringRules,
        preset: ScoringPreset,
    ) -> Self {
        let before_totals = team_strength(before_players, rules, preset);
        let after_totals = team_strength(after_players, rules, preset);
        let delta = round2(after_totals.starters - before_totals.starters);

        let mut after_by_position: BTreeMap<Position, Vec<ScoredPlayer>> = BTreeMap::new();
        for player in after_players {
            after_by_position
                .entry(player.position)
                .or_default()
                .push(ScoredPlayer {
                    name: player.name.clone(),
                    is_starter: player.is_starter,
                    score: player_score(player, rules, preset),
                });
        }
        for group in after_by_position.values_mut() {
            group.sort_by(|a, b| {
                b.score
                    .partial_cmp(&a.score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }

        Self {
            before_totals,
            after_totals,
            delta,
            before_breakdown: position_breakdown(before_players, rules, preset),
            after_breakdown: position_breakdown(after_players, rules, preset),
            after_by_position,
            after_lineup: validate_lineup(after_players, rules),
            rules: rules.clone(),
        }
    }

    /// Starter total for `pos` in the pre-trade breakdown (0 if absent).
    fn before_starter(&self, pos: Position) -> f64 {
        self.before_breakdown
            .get(&pos)
            .map(|s| s.starter)
            .unwrap_or(0.0)
    }

    /// Bench total for `pos` in the pre-trade breakdown (0 if absent).
    fn before_bench(&self, pos: Position) -> f64 {
        self.before_breakdown
            .get(&pos)
            .map(|s| s.bench)
            .unwrap_or(0.0)
    }
}

// ---------------------------------------------------------------------------
// Rule trait
// ---------------------------------------------------------------------------

/// One advice category. Rules are stateless; all inputs come from the
/// context.
pub trait SuggestionRule {
    fn name(&self) -> &'static str;
    fn evaluate(&self, ctx: &SuggestionContext) -> Vec<String>;
}

/// The built-in rule set, in report order.
pub fn default_rules() -> Vec<Box<dyn SuggestionRule>> {
    vec![
        Box::new(StarterOptimization),
        Box::new(PositionalImprovement),
        Box::new(DepthAndBench),
        Box::new(PositionalNeedWarnings),
        Box::new(UnfavorableTradeRecos),
        Box::new(NeutralTradeSuggestions),
        Box::new(FinalSummary),
    ]
}

// ---------------------------------------------------------------------------
// Rules 1-7
// ---------------------------------------------------------------------------

/// 1) Bench players who outscore the weakest starter at their position.
pub struct StarterOptimization;

impl SuggestionRule for StarterOptimization {
    fn name(&self) -> &'static str {
        "starter_optimization"
    }

    fn evaluate(&self, ctx: &SuggestionContext) -> Vec<String> {
        let mut lines = Vec::new();
        for (&pos, players) in &ctx.after_by_position {
            let limit = ctx.rules.starter_limit(pos);
            let starters: Vec<&ScoredPlayer> =
                players.iter().filter(|p| p.is_starter).take(limit).collect();
            let bench: Vec<&ScoredPlayer> = players.iter().filter(|p| !p.is_starter).collect();
            let (Some(weakest), Some(best_bench)) = (starters.last(), bench.first()) else {
                continue;
            };
            if best_bench.score > weakest.score {
                let diff = best_bench.score - weakest.score;
                lines.push(format!(
                    "Promote {} to {} starter (+{:.2} vs current weakest {}).",
                    best_bench.name, pos, diff, pos
                ));
            }
        }
        lines
    }
}

/// 2) Per-position starter and bench deltas between the two rosters.
pub struct PositionalImprovement;

impl SuggestionRule for PositionalImprovement {
    fn name(&self) -> &'static str {
        "positional_improvement"
    }

    fn evaluate(&self, ctx: &SuggestionContext) -> Vec<String> {
        let mut positions: Vec<Position> = ctx
            .before_breakdown
            .keys()
            .chain(ctx.after_breakdown.keys())
            .copied()
            .collect();
        positions.sort();
        positions.dedup();

        let mut lines = Vec::new();
        for pos in positions {
            let before = ctx
                .before_breakdown
                .get(&pos)
                .copied()
                .unwrap_or_default();
            let after = ctx.after_breakdown.get(&pos).copied().unwrap_or_default();
            let d_starter = round2(after.starter - before.starter);
            let d_bench = round2(after.bench - before.bench);

            if d_starter > 0.0 {
                lines.push(format!(
                    "{pos}: starter strength improved by +{d_starter:.2}."
                ));
            } else if d_starter < 0.0 {
                lines.push(format!(
                    "{pos}: starter strength decreased by {d_starter:.2}."
                ));
            }
            if d_bench != 0.0 {
                let sign = if d_bench > 0.0 { "+" } else { "" };
                lines.push(format!("{pos}: bench depth change {sign}{d_bench:.2}."));
            }
        }
        lines
    }
}

/// 3) Thin-depth and bench-surplus flags per position.
pub struct DepthAndBench;

impl SuggestionRule for DepthAndBench {
    fn name(&self) -> &'static str {
        "depth_and_bench"
    }

    fn evaluate(&self, ctx: &SuggestionContext) -> Vec<String> {
        let mut lines = Vec::new();
        for (&pos, scores) in &ctx.after_breakdown {
            if scores.starter > 0.0 && scores.bench < 0.30 * scores.starter {
                lines.push(format!(
                    "Depth is thin at {pos}. Consider waiver or 2-for-1 trade to add {pos} bench."
                ));
            }
            if scores.bench > scores.starter {
                lines.push(format!(
                    "Bench surplus at {pos}. Package bench assets to upgrade another need."
                ));
            }
        }
        lines
    }
}

/// 4) Starter-limit violations and positions left without any starter.
pub struct PositionalNeedWarnings;

impl SuggestionRule for PositionalNeedWarnings {
    fn name(&self) -> &'static str {
        "positional_need_warnings"
    }

    fn evaluate(&self, ctx: &SuggestionContext) -> Vec<String> {
        let mut lines = Vec::new();
        for v in &ctx.after_lineup.violations {
            lines.push(format!(
                "Too many {} starters ({}/{}). Move excess to bench.",
                v.position, v.current, v.limit
            ));
        }
        for (pos, limit) in ctx.rules.starter_limits() {
            let count = ctx
                .after_lineup
                .starter_counts
                .get(&pos)
                .copied()
                .unwrap_or(0);
            if limit > 0 && count == 0 {
                lines.push(format!(
                    "No {pos} starter set. Ensure at least {limit} {pos} in lineup."
                ));
            }
        }
        lines
    }
}

/// 5) Recovery targets when the trade loses starter strength.
pub struct UnfavorableTradeRecos;

impl SuggestionRule for UnfavorableTradeRecos {
    fn name(&self) -> &'static str {
        "unfavorable_trade_recos"
    }

    fn evaluate(&self, ctx: &SuggestionContext) -> Vec<String> {
        if ctx.delta >= 0.0 {
            return Vec::new();
        }
        let mut drops: Vec<(Position, f64)> = ctx
            .after_breakdown
            .iter()
            .filter_map(|(&pos, scores)| {
                let d = round2(scores.starter - ctx.before_starter(pos));
                (d < 0.0).then_some((pos, d))
            })
            .collect();
        drops.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        let mut lines: Vec<String> = drops
            .iter()
            .take(3)
            .map(|(pos, d)| {
                format!("Recover {pos}: target a mid-tier upgrade (aim +{:.2}).", -d)
            })
            .collect();
        lines.push(
            "Consider counter-offering: swap a bench piece for a starter upgrade, or include a pick."
                .to_string(),
        );
        lines
    }
}

/// 6) Nudges for dead-even trades.
pub struct NeutralTradeSuggestions;

impl SuggestionRule for NeutralTradeSuggestions {
    fn name(&self) -> &'static str {
        "neutral_trade_suggestions"
    }

    fn evaluate(&self, ctx: &SuggestionContext) -> Vec<String> {
        if ctx.delta != 0.0 {
            return Vec::new();
        }
        let mut lines = vec![
            "Seek marginal gains: prioritize positions with small positive bench deltas to convert into starters."
                .to_string(),
        ];
        let mut gains: Vec<(Position, f64)> = ctx
            .after_breakdown
            .iter()
            .filter_map(|(&pos, scores)| {
                let d = round2(scores.bench - ctx.before_bench(pos));
                (d > 0.0).then_some((pos, d))
            })
            .collect();
        gains.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        if let Some((pos, d)) = gains.first() {
            lines.push(format!(
                "Best bench gain is at {pos} (+{d:.2}). Explore promoting bench to starters."
            ));
        }
        lines
    }
}

/// 7) The headline decision line, always emitted.
pub struct FinalSummary;

impl SuggestionRule for FinalSummary {
    fn name(&self) -> &'static str {
        "final_summary"
    }

    fn evaluate(&self, ctx: &SuggestionContext) -> Vec<String> {
        let verdict = Verdict::from_delta(ctx.delta);
        vec![format!(
            "Decision: {} — starter Δ {:+.2} (before {:.2} → after {:.2}).",
            verdict.label(),
            ctx.delta,
            ctx.before_totals.starters,
            ctx.after_totals.starters
        )]
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Advice lines grouped by category, in report order.
#[derive(Debug, Clone, Default)]
pub struct SuggestionReport {
    pub starter_optimization: Vec<String>,
    pub positional_improvement: Vec<String>,
    pub depth_and_bench: Vec<String>,
    pub positional_need_warnings: Vec<String>,
    pub unfavorable_trade_recos: Vec<String>,
    pub neutral_trade_suggestions: Vec<String>,
    pub final_summary: Vec<String>,
}

impl SuggestionReport {
    /// All lines flattened in category order.
    pub fn lines(&self) -> Vec<&str> {
        [
            &self.starter_optimization,
            &self.positional_improvement,
            &self.depth_and_bench,
            &self.positional_need_warnings,
            &self.unfavorable_trade_recos,
            &self.neutral_trade_suggestions,
            &self.final_summary,
        ]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .collect()
    }
}

/// Run the default rule set over a before/after roster pair.
pub fn generate_suggestions(
    before_players: &[PlayerEntry],
    after_players: &[PlayerEntry],
    rules: &ScoringRules,
    preset: ScoringPreset,
) -> SuggestionReport {
    let ctx = SuggestionContext::new(before_players, after_players, rules, preset);
    SuggestionReport {
        starter_optimization: StarterOptimization.evaluate(&ctx),
        positional_improvement: PositionalImprovement.evaluate(&ctx),
        depth_and_bench: DepthAndBench.evaluate(&ctx),
        positional_need_warnings: PositionalNeedWarnings.evaluate(&ctx),
        unfavorable_trade_recos: UnfavorableTradeRecos.evaluate(&ctx),
        neutral_trade_suggestions: NeutralTradeSuggestions.evaluate(&ctx),
        final_summary: FinalSummary.evaluate(&ctx),
    }
}
