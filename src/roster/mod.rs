// Roster domain types.

pub mod player;

pub use player::{PlayerEntry, Position};
