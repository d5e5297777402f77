//! Roster and sub-team file readers
//!
//! CSV rosters use the header row as column labels; JSON rosters are an
//! array of objects whose values are scalars or null.

use anyhow::{bail, Context, Result};
use draw_core::{CellValue, RosterRow, SubTeamDraft};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Read a CSV roster; blank cells become `CellValue::Empty`
pub fn read_roster_csv(path: &Path) -> Result<Vec<RosterRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read CSV header: {}", path.display()))?
        .clone();

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record =
            record.with_context(|| format!("Invalid CSV record at data line {}", line + 1))?;
        let row: RosterRow = headers
            .iter()
            .zip(record.iter())
            .map(|(label, cell)| {
                let value = if cell.trim().is_empty() {
                    CellValue::Empty
                } else {
                    CellValue::from(cell)
                };
                (label.to_string(), value)
            })
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

pub fn read_roster_json(path: &Path) -> Result<Vec<RosterRow>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read JSON file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Roster JSON must be an array of objects: {}", path.display()))
}

/// Pick the reader by file extension (`.json`, anything else is CSV)
pub fn read_roster(path: &Path) -> Result<Vec<RosterRow>> {
    let is_json = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        read_roster_json(path)
    } else {
        read_roster_csv(path)
    }
}

/// Fill blank slot drafts from a JSON object of slot name → roster text
///
/// Slots missing from the file stay blank, so the bracket build reports them.
pub fn fill_drafts(path: &Path, mut drafts: Vec<SubTeamDraft>) -> Result<Vec<SubTeamDraft>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read sub-team file: {}", path.display()))?;
    let mut texts: BTreeMap<String, String> = serde_json::from_str(&content)
        .with_context(|| format!("Sub-team file must map slot names to text: {}", path.display()))?;

    for draft in &mut drafts {
        if let Some(text) = texts.remove(&draft.slot) {
            draft.roster_text = text;
        }
    }
    if let Some(unknown) = texts.keys().next() {
        let known: Vec<&str> = drafts.iter().map(|d| d.slot.as_str()).collect();
        bail!("Unknown sub-team slot '{}' (expected one of: {})", unknown, known.join(", "));
    }
    Ok(drafts)
}

/// Parse `MATCH=TEAM`, e.g. `R16-3=Alpha-1`
pub fn parse_winner(arg: &str) -> Result<(String, String)> {
    let Some((match_id, team)) = arg.split_once('=') else {
        bail!("Winner must look like MATCH=TEAM, got '{arg}'");
    };
    let (match_id, team) = (match_id.trim(), team.trim());
    if match_id.is_empty() || team.is_empty() {
        bail!("Winner must look like MATCH=TEAM, got '{arg}'");
    }
    Ok((match_id.to_string(), team.to_string()))
}
