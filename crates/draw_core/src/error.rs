use thiserror::Error;

/// Stage of the bracket where a no-same-parent pairing was attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairingStage {
    FirstRound,
    Quarterfinal,
}

impl std::fmt::Display for PairingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            PairingStage::FirstRound => write!(f, "first round"),
            PairingStage::Quarterfinal => write!(f, "quarterfinal"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DrawError {
    #[error("Roster is empty: no rows to read")]
    EmptyInput,

    #[error("Roster must contain Male and/or Female and/or Interns columns")]
    Schema,

    #[error("No valid names found in the roster")]
    NoValidRows,

    #[error("{slot} cannot be empty. Please enter at least one player")]
    EmptySubTeam { slot: String },

    #[error("No valid {stage} pairing: {reason}")]
    InfeasiblePairing { stage: PairingStage, reason: String },

    #[error("Expected {expected} sub-teams, found {found}")]
    SubTeamCount { expected: usize, found: usize },

    #[error("Sub-team name used twice: {name}")]
    DuplicateSubTeam { name: String },

    #[error("Unknown match: {match_id}")]
    UnknownMatch { match_id: String },

    #[error("{team} is not playing in {match_id}")]
    NotAParticipant { match_id: String, team: String },

    #[error("{match_id} is still waiting on earlier results")]
    MatchNotReady { match_id: String },

    #[error("Teams have not been generated yet")]
    NoTeams,

    #[error("No bracket has been built yet")]
    NoBracket,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl DrawError {
    /// Whether the user can fix the input and try again.
    ///
    /// Only a broken configuration needs a restart with a different file.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, DrawError::InvalidConfig(_))
    }
}

impl From<serde_json::Error> for DrawError {
    fn from(err: serde_json::Error) -> Self {
        DrawError::InvalidConfig(err.to_string())
    }
}

impl From<serde_yaml::Error> for DrawError {
    fn from(err: serde_yaml::Error) -> Self {
        DrawError::InvalidConfig(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DrawError>;
