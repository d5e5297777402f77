//! teamdraw CLI library
//!
//! Roster file → balanced teams → bracket, written out as one CSV per
//! sheet plus a JSON snapshot for tooling.

pub mod roster_io;

use anyhow::{Context, Result};
use draw_core::{Advancement, BracketSize, DrawConfig, DrawSession, RosterSummary, Workbook};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub use roster_io::{fill_drafts, parse_winner, read_roster};

/// Files written by one command
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub summary: RosterSummary,
    pub files: Vec<PathBuf>,
    /// Set when a quarterfinal draw was blocked by the Round of 16 results
    pub blocked: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BracketOptions {
    pub size: BracketSize,
    pub sub_teams: Option<PathBuf>,
    /// `(match id, sub-team name)` in declaration order
    pub winners: Vec<(String, String)>,
}

/// Write each sheet to `<dir>/<file_stem>.csv`
pub fn write_workbook(dir: &Path, book: &Workbook) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    let mut written = Vec::with_capacity(book.sheets.len());
    for sheet in &book.sheets {
        let path = dir.join(format!("{}.csv", sheet.file_stem()));
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(&path)
            .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
        for row in &sheet.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        written.push(path);
    }
    Ok(written)
}

fn write_json<T: Serialize>(path: PathBuf, value: &T) -> Result<PathBuf> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

fn load_session(config: DrawConfig, roster: &Path) -> Result<(DrawSession, RosterSummary)> {
    let rows = read_roster(roster)?;
    let mut session = DrawSession::new(config).context("Invalid draw config")?;
    let summary = session
        .load_roster(&rows)
        .with_context(|| format!("Failed to extract roster from {}", roster.display()))?
        .summary;
    session.allocate()?;
    Ok((session, summary))
}

/// Allocate teams and write the team sheets plus `teams.json`
pub fn run_teams(config: DrawConfig, roster: &Path, out_dir: &Path) -> Result<RunReport> {
    let (session, summary) = load_session(config, roster)?;

    let mut files = write_workbook(out_dir, &session.teams_workbook()?)?;
    files.push(write_json(out_dir.join("teams.json"), &session.teams())?);

    info!(teams = session.teams().len(), people = summary.total, "teams written");
    Ok(RunReport { summary, files, blocked: None })
}

/// Allocate teams, build a bracket, apply winners, write the bracket sheets
/// plus `bracket.json`
pub fn run_bracket(
    config: DrawConfig,
    roster: &Path,
    out_dir: &Path,
    options: &BracketOptions,
) -> Result<RunReport> {
    let (mut session, summary) = load_session(config, roster)?;

    let drafts = match &options.sub_teams {
        Some(path) => fill_drafts(path, session.blank_drafts(options.size)?)?,
        None => session.auto_fill(options.size)?,
    };
    session.build_bracket(options.size, drafts).context("Failed to build bracket")?;

    let mut blocked = None;
    for (match_id, team) in &options.winners {
        let advancement = session
            .declare_winner(match_id, team)
            .with_context(|| format!("Failed to declare {team} winner of {match_id}"))?;
        match advancement {
            Advancement::Blocked(err) => {
                warn!(%err, "quarterfinals could not be drawn");
                blocked = Some(err.to_string());
            }
            Advancement::RoundMaterialized(_) => blocked = None,
            Advancement::Recorded => {}
        }
    }

    let book = session.bracket_workbook().context("No bracket was built")?;
    let mut files = write_workbook(out_dir, &book)?;
    files.push(write_json(out_dir.join("bracket.json"), &session.bracket())?);

    info!(size = options.size.team_count(), "bracket written");
    Ok(RunReport { summary, files, blocked })
}
