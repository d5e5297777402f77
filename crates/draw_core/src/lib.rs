//! # draw_core - Balanced Team Draw and Knockout Brackets
//!
//! Reads a roster of people tagged male/female/intern, deals them into
//! balanced teams and draws single-elimination brackets from sub-teams of
//! those teams, never pairing two sub-teams of the same team in the first
//! round.
//!
//! ## Features
//! - Reproducible draws (same seed = same teams and bracket)
//! - 8-team and 16-team brackets, with Round of 16 results driving the
//!   quarterfinal draw
//! - Tabular export for spreadsheet writers

// Doc formatting lints - purely cosmetic, fix incrementally
#![allow(clippy::doc_lazy_continuation)]

pub mod allocator;
pub mod bracket;
pub mod carving;
pub mod config;
pub mod error;
pub mod export;
pub mod matching;
pub mod models;
pub mod roster;
pub mod session;


pub use allocator::{allocate_teams, AllocatorSettings};
pub use bracket::{
    Advancement, Bracket, BracketSize, Matchup, Round, RoundKind, RoundState, Side, Slot,
};
pub use carving::{auto_fill, blank_drafts, slot_layout, SubTeamSlot};
pub use config::{CategoryMarkers, DrawConfig};
pub use error::{DrawError, PairingStage, Result};
pub use export::{Sheet, Workbook};
pub use matching::find_perfect_matching;
pub use models::{Category, CategoryCounts, Individual, SubTeam, SubTeamDraft, Team};
pub use roster::{extract_roster, CellValue, Roster, RosterRow, RosterSummary};
pub use session::DrawSession;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
