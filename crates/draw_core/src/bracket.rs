//! Single-elimination bracket builder
//!
//! The first round is drawn at random under one constraint: two sub-teams
//! carved from the same parent team never meet. Candidate pairs are shuffled
//! and accepted greedily; when the greedy walk paints itself into a corner a
//! fallback takes over (the fixed Alpha/Gamma + Beta/Delta layout for eight
//! teams, an exact backtracking search otherwise).
//!
//! In a sixteen-team bracket the quarterfinals are recomputed from the Round
//! of 16 winners with the exact search, so the constraint still holds there.
//! Semifinals and the final stay as "winner of X vs winner of Y" notes.

use crate::error::{DrawError, PairingStage, Result};
use crate::matching::find_perfect_matching;
use crate::models::{SubTeam, SubTeamDraft};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BracketSize {
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "16")]
    Sixteen,
}

impl BracketSize {
    pub fn team_count(&self) -> usize {
        match self {
            BracketSize::Eight => 8,
            BracketSize::Sixteen => 16,
        }
    }

    pub fn from_team_count(n: usize) -> Option<Self> {
        match n {
            8 => Some(BracketSize::Eight),
            16 => Some(BracketSize::Sixteen),
            _ => None,
        }
    }

    pub fn first_round(&self) -> RoundKind {
        match self {
            BracketSize::Eight => RoundKind::Quarterfinal,
            BracketSize::Sixteen => RoundKind::RoundOf16,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundKind {
    RoundOf16,
    Quarterfinal,
    Semifinal,
    Final,
}

impl RoundKind {
    pub fn title(&self) -> &'static str {
        match self {
            RoundKind::RoundOf16 => "Round of 16",
            RoundKind::Quarterfinal => "Quarterfinals",
            RoundKind::Semifinal => "Semifinals",
            RoundKind::Final => "Final",
        }
    }

    /// Id of the `index`-th match (zero based) of this round
    pub fn match_id(&self, index: usize) -> String {
        match self {
            RoundKind::RoundOf16 => format!("R16-{}", index + 1),
            RoundKind::Quarterfinal => format!("QF{}", index + 1),
            RoundKind::Semifinal => format!("SF{}", index + 1),
            RoundKind::Final => "Final".to_string(),
        }
    }

    fn next(&self) -> Option<RoundKind> {
        match self {
            RoundKind::RoundOf16 => Some(RoundKind::Quarterfinal),
            RoundKind::Quarterfinal => Some(RoundKind::Semifinal),
            RoundKind::Semifinal => Some(RoundKind::Final),
            RoundKind::Final => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

/// One side of a matchup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Slot {
    Team {
        team: SubTeam,
        /// Match this team advanced from, when it came out of an earlier round
        from: Option<String>,
    },
    WinnerOf { match_id: String },
}

impl Slot {
    fn entrant(team: SubTeam) -> Self {
        Slot::Team { team, from: None }
    }

    pub fn team(&self) -> Option<&SubTeam> {
        match self {
            Slot::Team { team, .. } => Some(team),
            Slot::WinnerOf { .. } => None,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Slot::Team { team, from: Some(from) } => format!("{} {}", from, team.name),
            Slot::Team { team, from: None } => team.name.clone(),
            Slot::WinnerOf { match_id } => format!("Winner of {match_id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
    pub id: String,
    pub team_a: Slot,
    pub team_b: Slot,
    pub winner: Option<Side>,
}

impl Matchup {
    fn contest(id: String, a: SubTeam, b: SubTeam) -> Self {
        Self { id, team_a: Slot::entrant(a), team_b: Slot::entrant(b), winner: None }
    }

    fn placeholder(id: String, a: String, b: String) -> Self {
        Self {
            id,
            team_a: Slot::WinnerOf { match_id: a },
            team_b: Slot::WinnerOf { match_id: b },
            winner: None,
        }
    }

    /// Both sides are known teams
    pub fn is_ready(&self) -> bool {
        self.team_a.team().is_some() && self.team_b.team().is_some()
    }

    pub fn winner(&self) -> Option<&SubTeam> {
        match self.winner? {
            Side::A => self.team_a.team(),
            Side::B => self.team_b.team(),
        }
    }

    /// e.g. `Winner of QF1 vs Winner of QF2`
    pub fn describe(&self) -> String {
        format!("{} vs {}", self.team_a.label(), self.team_b.label())
    }

    fn side_of(&self, team_name: &str) -> Option<Side> {
        if self.team_a.team().is_some_and(|t| t.name == team_name) {
            Some(Side::A)
        } else if self.team_b.team().is_some_and(|t| t.name == team_name) {
            Some(Side::B)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundState {
    /// Every matchup names two concrete teams
    Materialized,
    /// Waiting on earlier results
    Placeholder,
    /// Earlier results are in but no valid pairing of the winners exists
    Infeasible,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub kind: RoundKind,
    pub state: RoundState,
    pub matchups: Vec<Matchup>,
}

impl Round {
    /// Placeholder round fed by consecutive matches of `previous`
    fn fed_by(kind: RoundKind, previous: &Round) -> Self {
        let matchups = previous
            .matchups
            .chunks(2)
            .enumerate()
            .map(|(i, pair)| {
                Matchup::placeholder(kind.match_id(i), pair[0].id.clone(), pair[1].id.clone())
            })
            .collect();
        Self { kind, state: RoundState::Placeholder, matchups }
    }
}

/// What a winner declaration changed downstream
#[derive(Debug, Clone, PartialEq)]
pub enum Advancement {
    /// Winner stored, nothing else changed
    Recorded,
    /// The next round now has concrete matchups
    RoundMaterialized(RoundKind),
    /// All results are in but the next round cannot be paired
    Blocked(DrawError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    pub size: BracketSize,
    pub rounds: Vec<Round>,
}

impl Bracket {
    /// Validate user drafts and build; any empty slot rejects the whole build
    pub fn from_drafts(
        size: BracketSize,
        drafts: Vec<SubTeamDraft>,
        rng: &mut impl Rng,
    ) -> Result<Self> {
        if drafts.len() != size.team_count() {
            return Err(DrawError::SubTeamCount {
                expected: size.team_count(),
                found: drafts.len(),
            });
        }
        let sub_teams = drafts
            .into_iter()
            .map(SubTeamDraft::into_sub_team)
            .collect::<Result<Vec<_>>>()?;
        Self::build(size, sub_teams, rng)
    }

    pub fn build(size: BracketSize, sub_teams: Vec<SubTeam>, rng: &mut impl Rng) -> Result<Self> {
        if sub_teams.len() != size.team_count() {
            return Err(DrawError::SubTeamCount {
                expected: size.team_count(),
                found: sub_teams.len(),
            });
        }
        let mut names = HashSet::new();
        for team in &sub_teams {
            if team.players.iter().all(|p| p.trim().is_empty()) {
                return Err(DrawError::EmptySubTeam { slot: team.name.clone() });
            }
            if !names.insert(team.name.as_str()) {
                return Err(DrawError::DuplicateSubTeam { name: team.name.clone() });
            }
        }

        let pairs = pair_first_round(size, &sub_teams, rng)?;

        let first_kind = size.first_round();
        let first = Round {
            kind: first_kind,
            state: RoundState::Materialized,
            matchups: pairs
                .into_iter()
                .enumerate()
                .map(|(i, (a, b))| {
                    Matchup::contest(first_kind.match_id(i), sub_teams[a].clone(), sub_teams[b].clone())
                })
                .collect(),
        };

        let mut rounds = vec![first];
        let mut kind = first_kind;
        while let Some(next) = kind.next() {
            let round = Round::fed_by(next, &rounds[rounds.len() - 1]);
            rounds.push(round);
            kind = next;
        }

        info!(size = size.team_count(), "bracket built");
        Ok(Self { size, rounds })
    }

    pub fn first_round(&self) -> &Round {
        &self.rounds[0]
    }

    pub fn round(&self, kind: RoundKind) -> Option<&Round> {
        self.rounds.iter().find(|r| r.kind == kind)
    }

    pub fn matchup(&self, match_id: &str) -> Option<&Matchup> {
        self.rounds.iter().flat_map(|r| &r.matchups).find(|m| m.id == match_id)
    }

    /// Every sub-team the bracket was built from, in first-round order
    pub fn entrants(&self) -> Vec<&SubTeam> {
        self.first_round()
            .matchups
            .iter()
            .flat_map(|m| [m.team_a.team(), m.team_b.team()])
            .flatten()
            .collect()
    }

    /// Declare the winner of a match by sub-team name
    ///
    /// Declaring again overwrites the previous winner. A Round of 16 result
    /// recomputes the quarterfinals once all eight winners are known, which
    /// also clears any quarterfinal winners declared before.
    pub fn declare_winner(&mut self, match_id: &str, team_name: &str) -> Result<Advancement> {
        let (round_idx, match_idx) = self
            .locate(match_id)
            .ok_or_else(|| DrawError::UnknownMatch { match_id: match_id.to_string() })?;

        let matchup = &mut self.rounds[round_idx].matchups[match_idx];
        if !matchup.is_ready() {
            return Err(DrawError::MatchNotReady { match_id: match_id.to_string() });
        }
        let side = matchup.side_of(team_name).ok_or_else(|| DrawError::NotAParticipant {
            match_id: match_id.to_string(),
            team: team_name.to_string(),
        })?;
        matchup.winner = Some(side);
        debug!(match_id, winner = team_name, "winner declared");

        if self.rounds[round_idx].kind == RoundKind::RoundOf16 {
            return Ok(self.refresh_quarterfinals());
        }
        Ok(Advancement::Recorded)
    }

    /// The error state of a round whose pairing could not be completed
    pub fn advancement_error(&self) -> Option<DrawError> {
        self.rounds.iter().find(|r| r.state == RoundState::Infeasible).map(|r| {
            DrawError::InfeasiblePairing {
                stage: PairingStage::Quarterfinal,
                reason: format!("no valid {} pairing of the winners", r.kind.title()),
            }
        })
    }

    fn locate(&self, match_id: &str) -> Option<(usize, usize)> {
        self.rounds.iter().enumerate().find_map(|(r, round)| {
            round.matchups.iter().position(|m| m.id == match_id).map(|m| (r, m))
        })
    }

    fn refresh_quarterfinals(&mut self) -> Advancement {
        let Some(qf_idx) = self.rounds.iter().position(|r| r.kind == RoundKind::Quarterfinal)
        else {
            return Advancement::Recorded;
        };
        let r16 = &self.rounds[0];
        if r16.kind != RoundKind::RoundOf16 {
            return Advancement::Recorded;
        }

        // (winner, originating match id, 1-based origin index)
        let winners: Vec<(SubTeam, String, usize)> = r16
            .matchups
            .iter()
            .enumerate()
            .filter_map(|(i, m)| m.winner().map(|w| (w.clone(), m.id.clone(), i + 1)))
            .collect();
        if winners.len() < r16.matchups.len() {
            return Advancement::Recorded;
        }

        let fallback = Round::fed_by(RoundKind::Quarterfinal, r16);
        let pairs =
            find_perfect_matching(&winners, |a, b| a.0.parent_team_id != b.0.parent_team_id);

        let Some(mut pairs) = pairs else {
            warn!("no quarterfinal pairing keeps parent teams apart");
            self.rounds[qf_idx] = Round { state: RoundState::Infeasible, ..fallback };
            let err = self.advancement_error().unwrap_or(DrawError::InfeasiblePairing {
                stage: PairingStage::Quarterfinal,
                reason: "no valid pairing of the winners".to_string(),
            });
            return Advancement::Blocked(err);
        };

        pairs.sort_by_key(|&(a, b)| winners[a].2.min(winners[b].2));
        let matchups = pairs
            .into_iter()
            .enumerate()
            .map(|(k, (a, b))| Matchup {
                id: RoundKind::Quarterfinal.match_id(k),
                team_a: Slot::Team { team: winners[a].0.clone(), from: Some(winners[a].1.clone()) },
                team_b: Slot::Team { team: winners[b].0.clone(), from: Some(winners[b].1.clone()) },
                winner: None,
            })
            .collect();
        self.rounds[qf_idx] =
            Round { kind: RoundKind::Quarterfinal, state: RoundState::Materialized, matchups };

        info!("quarterfinals drawn from Round of 16 winners");
        Advancement::RoundMaterialized(RoundKind::Quarterfinal)
    }
}

/// Draw the first round as index pairs into `teams`
fn pair_first_round(
    size: BracketSize,
    teams: &[SubTeam],
    rng: &mut impl Rng,
) -> Result<Vec<(usize, usize)>> {
    let needed = teams.len() / 2;

    let mut per_parent: BTreeMap<usize, usize> = BTreeMap::new();
    for team in teams {
        *per_parent.entry(team.parent_team_id).or_default() += 1;
    }
    if let Some((&parent, &count)) = per_parent.iter().max_by_key(|(_, count)| **count) {
        if count > needed {
            return Err(DrawError::InfeasiblePairing {
                stage: PairingStage::FirstRound,
                reason: format!(
                    "{count} of {} sub-teams come from team {parent}, at most {needed} can be kept apart",
                    teams.len()
                ),
            });
        }
    }

    let mut candidates = Vec::new();
    for i in 0..teams.len() {
        for j in (i + 1)..teams.len() {
            if teams[i].parent_team_id != teams[j].parent_team_id {
                candidates.push((i, j));
            }
        }
    }
    candidates.shuffle(rng);

    let mut used = vec![false; teams.len()];
    let mut pairs = Vec::with_capacity(needed);
    for (i, j) in candidates {
        if pairs.len() >= needed {
            break;
        }
        if !used[i] && !used[j] {
            used[i] = true;
            used[j] = true;
            pairs.push((i, j));
        }
    }
    if pairs.len() == needed {
        return Ok(pairs);
    }

    debug!(found = pairs.len(), needed, "greedy draw stalled, using fallback");
    if size == BracketSize::Eight {
        if let Some(pairs) = fixed_eight_layout(teams, rng) {
            return Ok(pairs);
        }
    }
    exact_random_pairing(teams, rng).ok_or_else(|| DrawError::InfeasiblePairing {
        stage: PairingStage::FirstRound,
        reason: "no pairing keeps every parent team apart".to_string(),
    })
}

/// Alpha vs Gamma and Beta vs Delta, slot by slot, in shuffled match order
///
/// Only applies when parents 0..=3 each own exactly two sub-teams.
fn fixed_eight_layout(teams: &[SubTeam], rng: &mut impl Rng) -> Option<Vec<(usize, usize)>> {
    let mut groups: [Vec<usize>; 4] = Default::default();
    for (i, team) in teams.iter().enumerate() {
        groups.get_mut(team.parent_team_id)?.push(i);
    }
    if groups.iter().any(|g| g.len() != 2) {
        return None;
    }

    let mut pairs = vec![
        (groups[0][0], groups[2][0]),
        (groups[0][1], groups[2][1]),
        (groups[1][0], groups[3][0]),
        (groups[1][1], groups[3][1]),
    ];
    pairs.shuffle(rng);
    Some(pairs)
}

/// Exact search over a shuffled order so the fallback is not always the same draw
fn exact_random_pairing(teams: &[SubTeam], rng: &mut impl Rng) -> Option<Vec<(usize, usize)>> {
    let mut order: Vec<usize> = (0..teams.len()).collect();
    order.shuffle(rng);

    let pairs = find_perfect_matching(&order, |&a, &b| {
        teams[a].parent_team_id != teams[b].parent_team_id
    })?;
    Some(pairs.into_iter().map(|(a, b)| (order[a], order[b])).collect())
}
