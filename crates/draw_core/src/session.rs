//! Draw session
//!
//! Holds everything one draw works on: the extracted roster, the allocated
//! teams, the current bracket and the random source. Each step replaces
//! what depends on it, so a new roster drops old teams and brackets instead
//! of leaving them stale.

use crate::allocator::{allocate_teams, AllocatorSettings};
use crate::bracket::{Advancement, Bracket, BracketSize};
use crate::carving;
use crate::config::DrawConfig;
use crate::error::{DrawError, Result};
use crate::export::{self, Workbook};
use crate::models::{SubTeamDraft, Team};
use crate::roster::{extract_roster, Roster, RosterRow};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

pub struct DrawSession {
    config: DrawConfig,
    rng: ChaCha8Rng,
    roster: Option<Roster>,
    teams: Vec<Team>,
    bracket: Option<Bracket>,
}

impl DrawSession {
    /// Seeded from `config.seed`, or from entropy when unset
    pub fn new(config: DrawConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Ok(Self::with_rng(config, rng))
    }

    pub fn with_rng(config: DrawConfig, rng: ChaCha8Rng) -> Self {
        Self { config, rng, roster: None, teams: Vec::new(), bracket: None }
    }

    pub fn config(&self) -> &DrawConfig {
        &self.config
    }

    pub fn roster(&self) -> Option<&Roster> {
        self.roster.as_ref()
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn bracket(&self) -> Option<&Bracket> {
        self.bracket.as_ref()
    }

    /// Replace the roster; existing teams and bracket are dropped on success only
    pub fn load_roster(&mut self, rows: &[RosterRow]) -> Result<&Roster> {
        let roster = extract_roster(rows, &self.config.markers)?;
        self.teams.clear();
        self.bracket = None;
        Ok(self.roster.insert(roster))
    }

    /// Draw fresh teams from the loaded roster
    pub fn allocate(&mut self) -> Result<&[Team]> {
        let roster = self.roster.as_ref().ok_or(DrawError::EmptyInput)?;
        let settings = AllocatorSettings {
            team_names: self.config.team_names.clone(),
            smallest_team_bias: self.config.smallest_team_bias,
        };
        self.teams = allocate_teams(&roster.individuals, &settings, &mut self.rng);
        self.bracket = None;
        Ok(&self.teams)
    }

    /// Sub-team drafts pre-filled from the current teams
    pub fn auto_fill(&mut self, size: BracketSize) -> Result<Vec<SubTeamDraft>> {
        if self.teams.is_empty() {
            return Err(DrawError::NoTeams);
        }
        carving::auto_fill(size, &self.teams, &mut self.rng)
    }

    /// Empty drafts for the user to fill in by hand
    pub fn blank_drafts(&self, size: BracketSize) -> Result<Vec<SubTeamDraft>> {
        carving::blank_drafts(size, &self.teams)
    }

    /// Build a bracket from drafts; the previous bracket survives a failed build
    pub fn build_bracket(
        &mut self,
        size: BracketSize,
        drafts: Vec<SubTeamDraft>,
    ) -> Result<&Bracket> {
        let bracket = Bracket::from_drafts(size, drafts, &mut self.rng)?;
        info!(size = size.team_count(), "bracket replaced");
        Ok(self.bracket.insert(bracket))
    }

    pub fn declare_winner(&mut self, match_id: &str, team_name: &str) -> Result<Advancement> {
        let bracket = self.bracket.as_mut().ok_or(DrawError::NoBracket)?;
        bracket.declare_winner(match_id, team_name)
    }

    pub fn teams_workbook(&self) -> Result<Workbook> {
        if self.teams.is_empty() {
            return Err(DrawError::NoTeams);
        }
        Ok(export::teams_workbook(&self.teams))
    }

    pub fn bracket_workbook(&self) -> Option<Workbook> {
        self.bracket.as_ref().map(export::bracket_workbook)
    }
}
