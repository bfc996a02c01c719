// CSV export of rosters and team reports.

use std::io::Write;

use anyhow::{Context, Result};

use crate::roster::PlayerEntry;
use crate::scoring::{position_breakdown, round2, team_strength, ScoringPreset, ScoringRules};

/// Write the roster as CSV: one row per player.
pub fn write_roster_csv<W: Write>(writer: W, players: &[PlayerEntry]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["Name", "Position", "Team", "Projection", "Starter"])
        .context("failed to write roster CSV header")?;
    for player in players {
        csv.write_record([
            player.name.as_str(),
            player.position.display_str(),
            player.team.as_str(),
            &format!("{:.2}", player.projection),
            if player.is_starter { "Yes" } else { "No" },
        ])
        .context("failed to write roster CSV row")?;
    }
    csv.flush().context("failed to flush roster CSV")?;
    Ok(())
}

/// Write a team report as CSV: strength summary, per-position breakdown,
/// then the roster itself.
pub fn write_team_report_csv<W: Write>(
    writer: W,
    players: &[PlayerEntry],
    rules: &ScoringRules,
    preset: ScoringPreset,
) -> Result<()> {
    let totals = team_strength(players, rules, preset);
    let breakdown = position_breakdown(players, rules, preset);

    // Flexible: the report mixes 2-column summary rows with 3- and 5-column
    // sections.
    let mut csv = csv::WriterBuilder::new().flexible(true).from_writer(writer);

    csv.write_record(["Metric", "Value"])
        .context("failed to write report header")?;
    csv.write_record(["Scoring Preset", preset.key()])
        .context("failed to write report row")?;
    csv.write_record(["Starter Strength", &format!("{:.2}", round2(totals.starters))])
        .context("failed to write report row")?;
    csv.write_record(["Bench Strength", &format!("{:.2}", round2(totals.bench))])
        .context("failed to write report row")?;
    csv.write_record([""; 2]).context("failed to write separator")?;

    csv.write_record(["Position", "Starter Points", "Bench Points"])
        .context("failed to write breakdown header")?;
    for (pos, scores) in &breakdown {
        csv.write_record([
            pos.display_str(),
            &format!("{:.2}", round2(scores.starter)),
            &format!("{:.2}", round2(scores.bench)),
        ])
        .context("failed to write breakdown row")?;
    }
    csv.write_record([""; 3]).context("failed to write separator")?;

    csv.write_record(["Name", "Position", "Team", "Projection", "Starter"])
        .context("failed to write roster header")?;
    for player in players {
        csv.write_record([
            player.name.as_str(),
            player.position.display_str(),
            player.team.as_str(),
            &format!("{:.2}", player.projection),
            if player.is_starter { "Yes" } else { "No" },
        ])
        .context("failed to write roster row")?;
    }

    csv.flush().context("failed to flush report CSV")?;
    Ok(())
}
