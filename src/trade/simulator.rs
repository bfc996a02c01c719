// Trade simulation: validate a give/receive proposal against two rosters,
// compose the post-trade roster, and score the change in starter strength.

use thiserror::Error;

use crate::roster::PlayerEntry;
use crate::scoring::{round2, team_strength, ScoringPreset, ScoringRules};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Input-validation failures for a trade proposal. All of these abort the
/// simulation before any scoring happens.
#[derive(Debug, Error)]
pub enum TradeError {
    #[error("your roster is empty; add players before analyzing trades")]
    EmptyRoster,

    #[error("enter player names to give and/or receive to simulate a trade")]
    EmptyTrade,

    #[error("these 'Give' players were not found in your roster: {}", names.join(", "))]
    GiveNotFound { names: Vec<String> },

    #[error("these 'Receive' players were not found in the selected roster: {}", names.join(", "))]
    ReceiveNotFound { names: Vec<String> },

    #[error("the name '{name}' matches more than one roster entry; attach player IDs to disambiguate")]
    AmbiguousPlayer { name: String },
}

// ---------------------------------------------------------------------------
// Verdict
// ---------------------------------------------------------------------------

/// Headline call on a trade, driven entirely by the rounded starter delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Neutral,
    Reject,
}

impl Verdict {
    /// Classify a rounded starter delta.
    pub fn from_delta(delta: f64) -> Self {
        if delta > 0.0 {
            Verdict::Accept
        } else if delta < 0.0 {
            Verdict::Reject
        } else {
            Verdict::Neutral
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Accept => "Accept",
            Verdict::Neutral => "Neutral",
            Verdict::Reject => "Reject",
        }
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// The result of a successful trade simulation. Strength figures are starter
/// totals only; bench changes show up in the suggestion report instead.
#[derive(Debug, Clone)]
pub struct TradeOutcome {
    pub before_strength: f64,
    pub after_strength: f64,
    /// `round(after - before, 2)`.
    pub delta: f64,
    pub verdict: Verdict,
    /// One-line summary, e.g. `Before: 120.00, After: 118.50, Δ: -1.50 — Reject`.
    pub rationale: String,
    /// The roster as it would look after the trade.
    pub post_roster: Vec<PlayerEntry>,
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// Simulate trading `give_names` away from `my_roster` in exchange for
/// `receive_names` out of `other_roster`.
///
/// Validation is fail-fast, in order: empty roster, empty proposal, missing
/// give names (all reported at once), missing receive names (likewise).
/// Name matching is case-insensitive; a name matching several distinct
/// entries is an error unless the matches share a stable player ID.
pub fn simulate_trade(
    my_roster: &[PlayerEntry],
    other_roster: &[PlayerEntry],
    give_names: &[String],
    receive_names: &[String],
    rules: &ScoringRules,
    preset: ScoringPreset,
) -> Result<TradeOutcome, TradeError> {
    if my_roster.is_empty() {
        return Err(TradeError::EmptyRoster);
    }

    let give: Vec<&str> = give_names
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .collect();
    let receive: Vec<&str> = receive_names
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .collect();

    if give.is_empty() && receive.is_empty() {
        return Err(TradeError::EmptyTrade);
    }

    let missing_give: Vec<String> = give
        .iter()
        .filter(|n| !my_roster.iter().any(|p| p.matches_name(n)))
        .map(|n| n.to_string())
        .collect();
    if !missing_give.is_empty() {
        return Err(TradeError::GiveNotFound {
            names: missing_give,
        });
    }

    let missing_receive: Vec<String> = receive
        .iter()
        .filter(|n| !other_roster.iter().any(|p| p.matches_name(n)))
        .map(|n| n.to_string())
        .collect();
    if !missing_receive.is_empty() {
        return Err(TradeError::ReceiveNotFound {
            names: missing_receive,
        });
    }

    for name in give.iter() {
        check_unambiguous(my_roster, name)?;
    }
    for name in receive.iter() {
        check_unambiguous(other_roster, name)?;
    }

    // Compose the post-trade roster: drop every give match, then append the
    // first pool match per receive name.
    let mut post: Vec<PlayerEntry> = my_roster
        .iter()
        .filter(|p| !give.iter().any(|n| p.matches_name(n)))
        .cloned()
        .collect();
    for name in &receive {
        if let Some(incoming) = other_roster.iter().find(|p| p.matches_name(name)) {
            post.push(incoming.clone());
        }
    }

    let before_strength = team_strength(my_roster, rules, preset).starters;
    let after_strength = team_strength(&post, rules, preset).starters;
    let delta = round2(after_strength - before_strength);
    let verdict = Verdict::from_delta(delta);
    let rationale = format!(
        "Before: {:.2}, After: {:.2}, Δ: {:.2} — {}",
        before_strength,
        after_strength,
        delta,
        verdict.label()
    );

    Ok(TradeOutcome {
        before_strength,
        after_strength,
        delta,
        verdict,
        rationale,
        post_roster: post,
    })
}

/// Error if `name` matches several roster entries that do not share a
/// stable player ID.
fn check_unambiguous(roster: &[PlayerEntry], name: &str) -> Result<(), TradeError> {
    let matches: Vec<&PlayerEntry> = roster.iter().filter(|p| p.matches_name(name)).collect();
    if matches.len() > 1 {
        let first = matches[0];
        let all_same = matches.iter().all(|p| match (&p.player_id, &first.player_id) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        });
        if !all_same {
            return Err(TradeError::AmbiguousPlayer {
                name: name.to_string(),
            });
        }
    }
    Ok(())
}
