//! Export projection
//!
//! Flattens teams and brackets into plain text tables, one `Sheet` per
//! worksheet. Nothing here mutates or randomizes; writers decide the file
//! format.

use crate::bracket::{Bracket, Matchup, RoundKind, RoundState, Slot};
use crate::models::Team;
use serde::{Deserialize, Serialize};

pub type Row = Vec<String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Row>,
}

impl Sheet {
    fn new(name: impl Into<String>, rows: Vec<Row>) -> Self {
        Self { name: name.into(), rows }
    }

    /// File-friendly name: `Teams Side-by-Side` → `teams_side_by_side`
    pub fn file_stem(&self) -> String {
        let mut stem = String::new();
        for c in self.name.chars() {
            if c.is_ascii_alphanumeric() {
                stem.push(c.to_ascii_lowercase());
            } else if !stem.ends_with('_') {
                stem.push('_');
            }
        }
        stem.trim_matches('_').to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

fn row<I, S>(cells: I) -> Row
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    cells.into_iter().map(Into::into).collect()
}

fn blank() -> Row {
    row([""])
}

pub fn team_summary(teams: &[Team]) -> Sheet {
    let mut rows = vec![
        row(["Team Summary"]),
        row(["Team Name", "Total Members", "Male", "Female", "Interns"]),
    ];
    for team in teams {
        let c = team.counts();
        rows.push(vec![
            team.name.clone(),
            team.len().to_string(),
            c.male.to_string(),
            c.female.to_string(),
            c.intern.to_string(),
        ]);
    }
    Sheet::new("Summary", rows)
}

pub fn full_team_list(teams: &[Team]) -> Sheet {
    let mut rows = Vec::new();
    for (i, team) in teams.iter().enumerate() {
        rows.push(vec![team.name.clone()]);
        rows.extend(team.members().iter().map(|m| vec![m.display()]));
        if i + 1 < teams.len() {
            rows.push(blank());
        }
    }
    Sheet::new("Full Team List", rows)
}

pub fn teams_side_by_side(teams: &[Team]) -> Sheet {
    let mut rows = vec![teams.iter().map(|t| t.name.clone()).collect::<Row>()];
    let longest = teams.iter().map(Team::len).max().unwrap_or(0);
    for i in 0..longest {
        rows.push(
            teams
                .iter()
                .map(|t| t.members().get(i).map(|m| m.display()).unwrap_or_default())
                .collect(),
        );
    }
    Sheet::new("Teams Side-by-Side", rows)
}

/// Summary, full list and side-by-side sheets
pub fn teams_workbook(teams: &[Team]) -> Workbook {
    Workbook { sheets: vec![team_summary(teams), full_team_list(teams), teams_side_by_side(teams)] }
}

fn contest_row(m: &Matchup) -> Row {
    let side = |slot: &Slot| match slot.team() {
        Some(team) => (team.name.clone(), team.players.join(", ")),
        None => (slot.label(), String::new()),
    };
    let (a, a_players) = side(&m.team_a);
    let (b, b_players) = side(&m.team_b);
    vec![m.id.clone(), a, a_players, "VS".to_string(), b, b_players]
}

pub fn bracket_overview(bracket: &Bracket) -> Sheet {
    let n = bracket.size.team_count();
    let mut rows = vec![
        vec![format!("{n}-Team Tournament Fixtures - Single Elimination (Randomized)")],
        blank(),
    ];

    for (i, round) in bracket.rounds.iter().enumerate() {
        if i > 0 {
            rows.push(blank());
        }
        rows.push(vec![round.kind.title().to_uppercase()]);

        if i == 0 {
            rows.push(row(["Match", "Team 1", "Players 1", "VS", "Team 2", "Players 2"]));
            rows.extend(round.matchups.iter().map(contest_row));
            continue;
        }

        rows.push(row(["Match", "Description"]));
        for m in &round.matchups {
            rows.push(vec![m.id.clone(), m.describe()]);
        }
        if round.kind == RoundKind::Quarterfinal && round.state == RoundState::Infeasible {
            rows.push(row(["", "No valid pairing of the Round of 16 winners"]));
        }
    }

    Sheet::new(format!("{n}-Team Tournament"), rows)
}

pub fn bracket_rosters(bracket: &Bracket) -> Sheet {
    let mut rows = vec![row(["Team Roster Details"]), row(["Team Name", "Players"])];
    for team in bracket.entrants() {
        rows.push(vec![team.name.clone(), team.players.join(", ")]);
    }
    Sheet::new("Team Rosters", rows)
}

/// Overview and roster sheets
pub fn bracket_workbook(bracket: &Bracket) -> Workbook {
    Workbook { sheets: vec![bracket_overview(bracket), bracket_rosters(bracket)] }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bracket::BracketSize;
    use crate::models::{Category, Individual, SubTeam};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn sample_teams() -> Vec<Team> {
        let mut alpha = Team::new(0, "Team Alpha");
        alpha.push(Individual { name: "Ann".into(), category: Category::Female });
        alpha.push(Individual { name: "Bob".into(), category: Category::Male });
        let mut beta = Team::new(1, "Team Beta");
        beta.push(Individual { name: "Cy".into(), category: Category::Intern });
        vec![alpha, beta]
    }

    fn sample_bracket(size: BracketSize) -> Bracket {
        let per_parent = size.team_count() / 4;
        let teams = (0..size.team_count())
            .map(|i| SubTeam {
                name: format!("T{i}"),
                players: vec![format!("p{i}a"), format!("p{i}b")],
                parent_team_id: i / per_parent,
            })
            .collect();
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        Bracket::build(size, teams, &mut rng).unwrap()
    }

    #[test]
    fn test_team_summary_rows() {
        let sheet = team_summary(&sample_teams());
        assert_eq!(sheet.rows[0], vec!["Team Summary"]);
        assert_eq!(sheet.rows[2], vec!["Team Alpha", "2", "1", "1", "0"]);
        assert_eq!(sheet.rows[3], vec!["Team Beta", "1", "0", "0", "1"]);
    }

    #[test]
    fn test_full_team_list_separates_teams() {
        let sheet = full_team_list(&sample_teams());
        assert_eq!(
            sheet.rows,
            vec![
                vec!["Team Alpha".to_string()],
                vec!["Ann ♀".to_string()],
                vec!["Bob ♂".to_string()],
                vec!["".to_string()],
                vec!["Team Beta".to_string()],
                vec!["Cy 🧑‍💻".to_string()],
            ]
        );
    }

    #[test]
    fn test_side_by_side_pads_short_teams() {
        let sheet = teams_side_by_side(&sample_teams());
        assert_eq!(sheet.rows.len(), 3);
        assert_eq!(sheet.rows[2], vec!["Bob ♂", ""]);
        assert_eq!(sheet.file_stem(), "teams_side_by_side");
    }

    #[test]
    fn test_eight_team_overview_layout() {
        let bracket = sample_bracket(BracketSize::Eight);
        let sheet = bracket_overview(&bracket);

        assert_eq!(sheet.name, "8-Team Tournament");
        assert_eq!(sheet.rows[2], vec!["QUARTERFINALS"]);
        assert_eq!(sheet.rows[3][0], "Match");
        assert_eq!(sheet.rows[4][0], "QF1");
        assert_eq!(sheet.rows[4][3], "VS");
        assert!(sheet.rows.contains(&vec!["SF1".to_string(), "Winner of QF1 vs Winner of QF2".to_string()]));
        assert!(sheet.rows.contains(&vec!["Final".to_string(), "Winner of SF1 vs Winner of SF2".to_string()]));
    }

    #[test]
    fn test_sixteen_team_overview_shows_drawn_quarterfinals() {
        let mut bracket = sample_bracket(BracketSize::Sixteen);
        for i in 0..8 {
            let m = bracket.rounds[0].matchups[i].clone();
            bracket.declare_winner(&m.id, &m.team_a.team().unwrap().name).unwrap();
        }
        let sheet = bracket_overview(&bracket);

        let qf1 = sheet.rows.iter().find(|r| r[0] == "QF1").unwrap();
        assert!(qf1[1].starts_with("R16-1 "), "{}", qf1[1]);
        assert!(qf1[1].contains(" vs R16-"));
    }

    #[test]
    fn test_roster_sheet_lists_every_entrant() {
        let bracket = sample_bracket(BracketSize::Sixteen);
        let sheet = bracket_rosters(&bracket);
        assert_eq!(sheet.rows.len(), 2 + 16);
        assert!(sheet.rows[2][1].contains(", "));
    }
}
