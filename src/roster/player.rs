// Player and position types shared by the scoring and trade engines.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// Football lineup positions used for scoring and limit checks.
///
/// `Def` and `Dst` are distinct variants (league imports use both spellings)
/// that share the same default rule values. Anything unparseable maps to
/// `Unknown` rather than failing, so malformed imports degrade to neutral
/// scoring instead of aborting.
///
/// The variant declaration order is the canonical display order; the derived
/// `Ord` makes every position-keyed map iterate deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Position {
    Qb,
    Rb,
    Wr,
    Te,
    Flex,
    K,
    Def,
    Dst,
    Unknown,
}

impl Position {
    /// Parse a position string, case-insensitively.
    ///
    /// Accepts the common defense spellings ("DEF", "D/ST", "D-ST", "DST").
    /// Unrecognized or empty strings map to `Unknown`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "QB" => Position::Qb,
            "RB" => Position::Rb,
            "WR" => Position::Wr,
            "TE" => Position::Te,
            "FLEX" => Position::Flex,
            "K" => Position::K,
            "DEF" => Position::Def,
            "D/ST" | "D-ST" | "DST" => Position::Dst,
            _ => Position::Unknown,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Qb => "QB",
            Position::Rb => "RB",
            Position::Wr => "WR",
            Position::Te => "TE",
            Position::Flex => "FLEX",
            Position::K => "K",
            Position::Def => "DEF",
            Position::Dst => "D/ST",
            Position::Unknown => "UNK",
        }
    }

    /// All positions that carry configured rule values (excludes `Unknown`).
    pub fn configured() -> [Position; 8] {
        [
            Position::Qb,
            Position::Rb,
            Position::Wr,
            Position::Te,
            Position::Flex,
            Position::K,
            Position::Def,
            Position::Dst,
        ]
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

impl From<Position> for String {
    fn from(pos: Position) -> String {
        pos.display_str().to_string()
    }
}

impl From<String> for Position {
    fn from(s: String) -> Position {
        Position::parse(&s)
    }
}

// ---------------------------------------------------------------------------
// PlayerEntry
// ---------------------------------------------------------------------------

/// A single roster entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerEntry {
    /// Display name, also the fallback trade-matching key.
    pub name: String,
    pub position: Position,
    /// NFL team abbreviation, uppercased. Empty if unknown.
    #[serde(default)]
    pub team: String,
    /// Projected fantasy points for the scoring window.
    #[serde(default)]
    pub projection: f64,
    /// Whether this player is in the starting lineup (vs the bench).
    #[serde(default = "default_starter")]
    pub is_starter: bool,
    /// Stable external player ID, when the data source provides one.
    /// Identity checks prefer this over the name.
    #[serde(default)]
    pub player_id: Option<String>,
}

fn default_starter() -> bool {
    true
}

impl PlayerEntry {
    /// Build a normalized entry: the position string is parsed (unknown
    /// values degrade to `UNK`), the team is uppercased, and a non-finite
    /// projection is replaced with 0.0.
    pub fn new(name: &str, position: &str, team: &str, projection: f64, is_starter: bool) -> Self {
        Self {
            name: name.trim().to_string(),
            position: Position::parse(position),
            team: team.trim().to_uppercase(),
            projection: if projection.is_finite() { projection } else { 0.0 },
            is_starter,
            player_id: None,
        }
    }

    /// Attach a stable player ID.
    pub fn with_id(mut self, player_id: &str) -> Self {
        self.player_id = Some(player_id.to_string());
        self
    }

    /// Whether `other` refers to the same player. The stable ID is
    /// authoritative when both sides carry one; otherwise fall back to a
    /// case-insensitive name comparison.
    pub fn same_player(&self, other: &PlayerEntry) -> bool {
        match (&self.player_id, &other.player_id) {
            (Some(a), Some(b)) => a == b,
            _ => self.name.eq_ignore_ascii_case(&other.name),
        }
    }

    /// Case-insensitive name match.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }
}
