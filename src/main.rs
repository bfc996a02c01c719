// Fantasy analyzer entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file)
// 2. Load config
// 3. Open database
// 4. Seed the projection catalog for the configured season/week
// 5. Load the roster and apply the live projection overlay
// 6. Print team strength, lineup validation, and recent trade reports

use fantasy_analyzer::config;
use fantasy_analyzer::db::Database;
use fantasy_analyzer::llm::LlmClient;
use fantasy_analyzer::projections;
use fantasy_analyzer::roster::PlayerEntry;
use fantasy_analyzer::scoring::{position_breakdown, round2, team_strength, validate_lineup};

use anyhow::Context;
use chrono::Utc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing (log to file)
    init_tracing()?;
    info!("Fantasy analyzer starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: league={}, preset={}, season={} week={}",
        config.league.name,
        config.preset.key(),
        config.live.season,
        config.live.week
    );

    // 3. Open database
    let db = Database::open(&config.db_path).context("failed to open database")?;
    info!("Database opened at {}", config.db_path);

    // Report whether trade explanations are available
    match LlmClient::from_config(&config) {
        LlmClient::Active(_) => info!("LLM client initialized (API key configured)"),
        LlmClient::Disabled => info!("LLM client disabled (no API key)"),
    }

    // 4. Seed the projection catalog for the configured season/week
    let seeded = projections::seed_catalog(
        &db,
        config.live.season,
        config.live.week,
        &config.rules,
        config.preset,
    )
    .context("failed to seed projection catalog")?;
    info!("Projection catalog seeded with {seeded} players");

    // 5. Load the roster and apply the live projection overlay
    let stored = db.load_roster().context("failed to load roster")?;
    if stored.is_empty() {
        println!("Roster is empty. Add players to the database to analyze your team.");
        return Ok(());
    }
    let now = Utc::now();
    let mut roster = Vec::with_capacity(stored.len());
    for player in stored {
        let hit = db
            .catalog_projection(
                player.player_id.as_deref(),
                &player.name,
                &player.team,
                player.position.display_str(),
                config.live.season,
                config.live.week,
            )
            .context("failed to query projection catalog")?;
        let projection = projections::effective_projection(
            &player,
            hit,
            config.live.use_live,
            config.live.ttl_minutes,
            now,
        );
        roster.push(PlayerEntry {
            projection,
            ..player
        });
    }
    info!("Loaded {} roster players", roster.len());

    // 6. Print team strength, lineup validation, and recent trade reports
    let totals = team_strength(&roster, &config.rules, config.preset);
    println!(
        "{} — {} scoring",
        config.league.name,
        config.preset.key()
    );
    println!(
        "Starter strength: {:.2} | Bench strength: {:.2}",
        round2(totals.starters),
        round2(totals.bench)
    );

    println!("\nPosition breakdown:");
    for (pos, scores) in position_breakdown(&roster, &config.rules, config.preset) {
        println!(
            "  {:<5} starters {:>7.2} | bench {:>7.2}",
            pos.display_str(),
            round2(scores.starter),
            round2(scores.bench)
        );
    }

    let report = validate_lineup(&roster, &config.rules);
    if report.valid {
        println!("\nLineup is valid.");
    } else {
        println!("\nLineup violations:");
        for v in &report.violations {
            println!(
                "  {}: {} starters (limit {}, excess {})",
                v.position, v.current, v.limit, v.excess
            );
        }
    }

    let reports = db
        .recent_trade_reports(5)
        .context("failed to load trade reports")?;
    if !reports.is_empty() {
        println!("\nRecent trade analyses:");
        for r in &reports {
            println!("  vs {}: {}", r.other_roster, r.rationale);
        }
    }

    info!("Fantasy analyzer finished");
    Ok(())
}

/// Initialize tracing to log to a file, keeping stdout clean for the report.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("fantasy-analyzer.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("fantasy_analyzer=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
