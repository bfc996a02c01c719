// Prompt templates for trade explanations.
//
// The engine has already done the arithmetic; prompts carry the pre-computed
// numbers so the model only has to turn them into plain language.

use crate::db::TradeReportRow;

/// Static system prompt for all trade explanation calls.
pub fn system_prompt() -> String {
    "You explain fantasy football trades clearly and simply.".to_string()
}

/// Build the user prompt for explaining one persisted trade report.
pub fn build_trade_explanation_prompt(report: &TradeReportRow) -> String {
    let give_names = join_or_none(&report.give);
    let receive_names = join_or_none(&report.receive);

    format!(
        "You are a fantasy football trade advisor.\n\
         \n\
         Here is a trade:\n\
         \n\
         - Other roster: {}\n\
         - Give: {}\n\
         - Receive: {}\n\
         \n\
         Strength before trade: {:.2}\n\
         Strength after trade: {:.2}\n\
         Delta: {:.2}\n\
         App decision: {}\n\
         \n\
         Write:\n\
         1) A simple explanation of whether this trade is good or bad.\n\
         2) Which positions improve or weaken.\n\
         3) 1-2 suggestions to fix weak areas.\n\
         \n\
         Keep it under 150 words. Use simple language.",
        report.other_roster,
        give_names,
        receive_names,
        report.before_strength,
        report.after_strength,
        report.delta,
        report.rationale,
    )
}

fn join_or_none(names: &[String]) -> String {
    if names.is_empty() {
        "None".to_string()
    } else {
        names.join(", ")
    }
}
