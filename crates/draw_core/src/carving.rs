//! Sub-team carving
//!
//! Lays out the sub-team slots of a bracket (`Alpha-1`, `Alpha-2`, ...) and
//! pre-fills them from the main teams. The drafts are plain text so the
//! user can still move names around before the bracket is built.

use crate::bracket::BracketSize;
use crate::error::{DrawError, Result};
use crate::models::{SubTeamDraft, Team};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubTeamSlot {
    pub name: String,
    pub parent_team_id: usize,
}

/// Slots of a bracket, grouped by parent team in team order
pub fn slot_layout(size: BracketSize, teams: &[Team]) -> Result<Vec<SubTeamSlot>> {
    if teams.is_empty() {
        return Err(DrawError::NoTeams);
    }
    let n = size.team_count();
    if n % teams.len() != 0 {
        return Err(DrawError::InvalidConfig(format!(
            "a {n}-team bracket cannot be split evenly across {} teams",
            teams.len()
        )));
    }

    let per_team = n / teams.len();
    Ok(teams
        .iter()
        .flat_map(|team| {
            (1..=per_team).map(move |k| SubTeamSlot {
                name: format!("{}-{}", team.short_name(), k),
                parent_team_id: team.id,
            })
        })
        .collect())
}

/// Empty drafts for every slot
pub fn blank_drafts(size: BracketSize, teams: &[Team]) -> Result<Vec<SubTeamDraft>> {
    Ok(slot_layout(size, teams)?
        .into_iter()
        .map(|slot| SubTeamDraft::new(slot.name, slot.parent_team_id, ""))
        .collect())
}

/// Shuffle each team and cut it into its slots
///
/// Chunks hold `ceil(len / slots)` names, so with small teams the last slots
/// may come out short or empty; the bracket build rejects empty ones.
pub fn auto_fill(size: BracketSize, teams: &[Team], rng: &mut impl Rng) -> Result<Vec<SubTeamDraft>> {
    let slots = slot_layout(size, teams)?;
    let per_team = size.team_count() / teams.len();

    let mut drafts = Vec::with_capacity(slots.len());
    for (team, team_slots) in teams.iter().zip(slots.chunks(per_team)) {
        let mut names: Vec<&str> = team.members().iter().map(|m| m.name.as_str()).collect();
        names.shuffle(rng);

        let chunk = names.len().div_ceil(per_team).max(1);
        let mut groups = names.chunks(chunk);
        for slot in team_slots {
            let roster = groups.next().map(|g| g.join("\n")).unwrap_or_default();
            drafts.push(SubTeamDraft::new(slot.name.clone(), slot.parent_team_id, roster));
        }
        debug!(team = %team.name, slots = per_team, chunk, "team carved into sub-teams");
    }
    Ok(drafts)
}
