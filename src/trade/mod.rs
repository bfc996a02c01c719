// Trade evaluation: simulation plus post-trade advice.

pub mod simulator;
pub mod suggestions;

pub use simulator::{simulate_trade, TradeError, TradeOutcome, Verdict};
pub use suggestions::{
    default_rules, generate_suggestions, SuggestionContext, SuggestionReport, SuggestionRule,
};
