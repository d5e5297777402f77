use crate::error::{DrawError, Result};
use serde::{Deserialize, Serialize};

/// Competitive unit carved out of a team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubTeam {
    pub name: String,
    pub players: Vec<String>,
    /// Id of the team this sub-team was carved from; two sub-teams with the
    /// same parent never meet in a first round.
    pub parent_team_id: usize,
}

/// Free-text roster for one sub-team slot, as edited by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubTeamDraft {
    pub slot: String,
    pub parent_team_id: usize,
    pub roster_text: String,
}

impl SubTeamDraft {
    pub fn new(slot: impl Into<String>, parent_team_id: usize, roster_text: impl Into<String>) -> Self {
        Self { slot: slot.into(), parent_team_id, roster_text: roster_text.into() }
    }

    pub fn into_sub_team(self) -> Result<SubTeam> {
        let players = parse_roster_text(&self.roster_text);
        if players.is_empty() {
            return Err(DrawError::EmptySubTeam { slot: self.slot });
        }
        Ok(SubTeam { name: self.slot, players, parent_team_id: self.parent_team_id })
    }
}

/// Newline-delimited names, trimmed, blanks dropped
pub fn parse_roster_text(text: &str) -> Vec<String> {
    text.lines().map(str::trim).filter(|line| !line.is_empty()).map(str::to_string).collect()
}
