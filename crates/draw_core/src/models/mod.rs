pub mod person;
pub mod sub_team;
pub mod team;

pub use person::{Category, Individual};
pub use sub_team::{parse_roster_text, SubTeam, SubTeamDraft};
pub use team::{CategoryCounts, Team};
