// Integration tests for the fantasy analyzer.
//
// These tests exercise the full system end-to-end using the library crate's
// public API. They verify that the major subsystems (scoring engine, trade
// simulation, suggestion generation, persistence, projections, CSV export,
// and LLM prompt construction) work together correctly.

use fantasy_analyzer::db::Database;
use fantasy_analyzer::export;
use fantasy_analyzer::llm::prompt;
use fantasy_analyzer::projections;
use fantasy_analyzer::roster::{PlayerEntry, Position};
use fantasy_analyzer::scoring::{
    can_add_starter, player_score, position_breakdown, team_strength, validate_lineup,
    ScoringPreset, ScoringRules,
};
use fantasy_analyzer::trade::{generate_suggestions, simulate_trade, TradeError, Verdict};

// ===========================================================================
// Test helpers
// ===========================================================================

fn make_player(name: &str, pos: &str, team: &str, projection: f64, is_starter: bool) -> PlayerEntry {
    PlayerEntry::new(name, pos, team, projection, is_starter)
}

/// A full legal PPR lineup with a little bench depth.
fn my_roster() -> Vec<PlayerEntry> {
    vec![
        make_player("Field General", "QB", "KC", 21.0, true),
        make_player("Workhorse", "RB", "SF", 17.0, true),
        make_player("Committee Back", "RB", "DET", 12.0, true),
        make_player("Alpha Receiver", "WR", "MIN", 16.0, true),
        make_player("Deep Threat", "WR", "MIA", 13.0, true),
        make_player("Security Blanket", "TE", "KC", 9.0, true),
        make_player("Swiss Army", "FLEX", "PHI", 11.0, true),
        make_player("Leg Man", "K", "BAL", 8.0, true),
        make_player("Steel Wall", "D/ST", "PIT", 7.0, true),
        make_player("Handcuff Back", "RB", "SF", 6.0, false),
        make_player("Stash Receiver", "WR", "GB", 8.0, false),
    ]
}

fn other_roster() -> Vec<PlayerEntry> {
    vec![
        make_player("Rival Stud", "RB", "PHI", 19.0, true),
        make_player("Rival Receiver", "WR", "DAL", 14.0, true),
        make_player("Rival Bench", "TE", "LV", 5.0, false),
    ]
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ===========================================================================
// Scoring engine
// ===========================================================================

#[test]
fn preset_changes_only_reception_positions() {
    let rules = ScoringRules::default();
    let qb = make_player("QB", "QB", "", 20.0, true);
    let wr = make_player("WR", "WR", "", 10.0, true);

    let qb_std = player_score(&qb, &rules, ScoringPreset::Standard);
    let qb_ppr = player_score(&qb, &rules, ScoringPreset::Ppr);
    assert!(approx_eq(qb_std, qb_ppr));

    let wr_std = player_score(&wr, &rules, ScoringPreset::Standard);
    let wr_half = player_score(&wr, &rules, ScoringPreset::HalfPpr);
    let wr_ppr = player_score(&wr, &rules, ScoringPreset::Ppr);
    assert!(approx_eq(wr_half - wr_std, 3.0));
    assert!(approx_eq(wr_ppr - wr_std, 6.0));
}

#[test]
fn team_strength_is_additive_over_breakdown() {
    let rules = ScoringRules::default();
    let roster = my_roster();
    let totals = team_strength(&roster, &rules, ScoringPreset::HalfPpr);
    let bd = position_breakdown(&roster, &rules, ScoringPreset::HalfPpr);

    let starter_sum: f64 = bd.values().map(|s| s.starter).sum();
    let bench_sum: f64 = bd.values().map(|s| s.bench).sum();
    assert!(approx_eq(starter_sum, totals.starters));
    assert!(approx_eq(bench_sum, totals.bench));
}

#[test]
fn validation_and_capacity_agree() {
    let rules = ScoringRules::default();
    let roster = my_roster();
    let report = validate_lineup(&roster, &rules);
    assert!(report.valid);

    // Both RB slots are taken; WR has one slot left only on the bench side.
    assert!(!can_add_starter(&roster, Position::Rb, &rules));
    assert!(!can_add_starter(&roster, Position::Wr, &rules));
    // No D/ST conflict with the DEF table entry.
    assert!(can_add_starter(&roster, Position::Def, &rules));
}

// ===========================================================================
// Trade pipeline: simulate, persist, advise, explain, export
// ===========================================================================

#[test]
fn winning_trade_flows_end_to_end() {
    let rules = ScoringRules::default();
    let db = Database::open(":memory:").expect("in-memory db");

    // The counterparty lists a roster on the marketplace.
    let other_id = db.save_roster("Rival Squad", &other_roster()).unwrap();
    assert!(db.set_roster_listed(other_id, true).unwrap());
    let listed = db.list_public_rosters().unwrap();
    assert_eq!(listed.len(), 1);
    let pool = db.load_saved_roster(listed[0].id).unwrap().unwrap();

    // Swap the committee back for the rival stud.
    let mine = my_roster();
    let give = names(&["Committee Back"]);
    let receive = names(&["Rival Stud"]);
    let outcome =
        simulate_trade(&mine, &pool, &give, &receive, &rules, ScoringPreset::Ppr).unwrap();

    // +7.0 projection at RB weight 1.08.
    assert!(approx_eq(outcome.delta, 7.56));
    assert_eq!(outcome.verdict, Verdict::Accept);

    // Persist the report and read it back.
    db.insert_trade_report(
        &listed[0].name,
        &give,
        &receive,
        outcome.before_strength,
        outcome.after_strength,
        outcome.delta,
        &outcome.rationale,
    )
    .unwrap();
    let reports = db.recent_trade_reports(10).unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].other_roster, "Rival Squad");
    assert!(approx_eq(reports[0].delta, 7.56));

    // Suggestions: a winning trade gets neither recovery nor neutral lines,
    // and always a decision summary.
    let suggestions = generate_suggestions(&mine, &outcome.post_roster, &rules, ScoringPreset::Ppr);
    assert!(suggestions.unfavorable_trade_recos.is_empty());
    assert!(suggestions.neutral_trade_suggestions.is_empty());
    assert!(suggestions.final_summary[0].starts_with("Decision: Accept — starter Δ +7.56"));
    assert!(suggestions
        .positional_improvement
        .iter()
        .any(|l| l == "RB: starter strength improved by +7.56."));

    // The explanation prompt carries the persisted numbers.
    let explanation_prompt = prompt::build_trade_explanation_prompt(&reports[0]);
    assert!(explanation_prompt.contains("- Other roster: Rival Squad"));
    assert!(explanation_prompt.contains("- Give: Committee Back"));
    assert!(explanation_prompt.contains("Delta: 7.56"));

    // Export the post-trade roster.
    let mut buf = Vec::new();
    export::write_team_report_csv(&mut buf, &outcome.post_roster, &rules, ScoringPreset::Ppr)
        .unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert!(text.contains("Rival Stud,RB,PHI,19.00,Yes"));
}

#[test]
fn losing_trade_generates_recovery_advice() {
    let rules = ScoringRules::default();
    let mine = my_roster();
    let outcome = simulate_trade(
        &mine,
        &other_roster(),
        &names(&["Workhorse"]),
        &names(&["Rival Bench"]),
        &rules,
        ScoringPreset::Ppr,
    )
    .unwrap();
    assert_eq!(outcome.verdict, Verdict::Reject);

    let suggestions = generate_suggestions(&mine, &outcome.post_roster, &rules, ScoringPreset::Ppr);
    assert!(suggestions.unfavorable_trade_recos[0].starts_with("Recover RB:"));
    assert_eq!(
        suggestions.unfavorable_trade_recos.last().unwrap(),
        "Consider counter-offering: swap a bench piece for a starter upgrade, or include a pick."
    );
    assert!(suggestions
        .positional_need_warnings
        .iter()
        .any(|l| l == "No DEF starter set. Ensure at least 1 DEF in lineup."));
}

#[test]
fn trade_validation_failures_surface_in_order() {
    let rules = ScoringRules::default();

    let err = simulate_trade(&[], &other_roster(), &[], &[], &rules, ScoringPreset::Ppr)
        .unwrap_err();
    assert!(matches!(err, TradeError::EmptyRoster));

    let err = simulate_trade(&my_roster(), &other_roster(), &[], &[], &rules, ScoringPreset::Ppr)
        .unwrap_err();
    assert!(matches!(err, TradeError::EmptyTrade));

    let err = simulate_trade(
        &my_roster(),
        &other_roster(),
        &names(&["Ghost", "Also Missing"]),
        &names(&["Nobody"]),
        &rules,
        ScoringPreset::Ppr,
    )
    .unwrap_err();
    match err {
        TradeError::GiveNotFound { names } => {
            assert_eq!(names, vec!["Ghost".to_string(), "Also Missing".to_string()]);
        }
        other => panic!("expected GiveNotFound, got: {other}"),
    }

    let err = simulate_trade(
        &my_roster(),
        &other_roster(),
        &names(&["workhorse"]),
        &names(&["Nobody"]),
        &rules,
        ScoringPreset::Ppr,
    )
    .unwrap_err();
    assert!(matches!(err, TradeError::ReceiveNotFound { .. }));
}

// ===========================================================================
// Projection catalog overlay
// ===========================================================================

#[test]
fn seeded_catalog_overrides_stored_projections() {
    let rules = ScoringRules::default();
    let db = Database::open(":memory:").unwrap();
    projections::seed_catalog(&db, 2025, 1, &rules, ScoringPreset::Ppr).unwrap();

    // The stored roster carries a stale projection for a cataloged player.
    let player = make_player("Patrick Mahomes", "QB", "KC", 3.0, true);
    let hit = db
        .catalog_projection(None, &player.name, &player.team, "QB", 2025, 1)
        .unwrap();
    assert!(hit.is_some());

    let now = chrono::Utc::now();
    let live = projections::effective_projection(&player, hit, true, 30, now);
    assert!(live > 3.0);
    // With the overlay disabled the stored projection stands.
    let stored = projections::effective_projection(&player, hit, false, 30, now);
    assert!(approx_eq(stored, 3.0));

    // A different week has no catalog rows.
    let miss = db
        .catalog_projection(None, &player.name, &player.team, "QB", 2025, 2)
        .unwrap();
    assert!(miss.is_none());
}

// ===========================================================================
// Concurrency: the engine is pure and shareable across threads
// ===========================================================================

#[test]
fn engine_is_safe_under_concurrent_evaluation() {
    use std::sync::Arc;

    let rules = Arc::new(ScoringRules::default());
    let mine = Arc::new(my_roster());
    let pool = Arc::new(other_roster());

    let expected = simulate_trade(
        &mine,
        &pool,
        &names(&["Committee Back"]),
        &names(&["Rival Stud"]),
        &rules,
        ScoringPreset::Ppr,
    )
    .unwrap()
    .delta;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let rules = Arc::clone(&rules);
            let mine = Arc::clone(&mine);
            let pool = Arc::clone(&pool);
            std::thread::spawn(move || {
                let outcome = simulate_trade(
                    &mine,
                    &pool,
                    &names(&["Committee Back"]),
                    &names(&["Rival Stud"]),
                    &rules,
                    ScoringPreset::Ppr,
                )
                .unwrap();
                outcome.delta
            })
        })
        .collect();

    for handle in handles {
        assert!(approx_eq(handle.join().unwrap(), expected));
    }
}
