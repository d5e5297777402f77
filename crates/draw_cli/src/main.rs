//! teamdraw CLI
//!
//! Roster CSV/JSON → balanced teams → knockout bracket sheets

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand, ValueEnum};
#[cfg(feature = "cli")]
use draw_core::{BracketSize, DrawConfig};
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "teamdraw")]
#[command(about = "Draw balanced teams and knockout brackets from a roster", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, ValueEnum)]
enum SizeArg {
    #[value(name = "8")]
    Eight,
    #[value(name = "16")]
    Sixteen,
}

#[cfg(feature = "cli")]
impl From<SizeArg> for BracketSize {
    fn from(size: SizeArg) -> Self {
        match size {
            SizeArg::Eight => BracketSize::Eight,
            SizeArg::Sixteen => BracketSize::Sixteen,
        }
    }
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Allocate the roster into teams
    Teams {
        /// Roster file (.csv with a header row, or .json array of objects)
        #[arg(long)]
        roster: PathBuf,

        /// Directory for the generated sheets
        #[arg(long)]
        out_dir: PathBuf,

        /// Seed for a reproducible draw
        #[arg(long)]
        seed: Option<u64>,

        /// Draw config (YAML or JSON); falls back to TEAMDRAW_CONFIG_PATH
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Allocate teams, then draw a knockout bracket from their sub-teams
    Bracket {
        /// Roster file (.csv with a header row, or .json array of objects)
        #[arg(long)]
        roster: PathBuf,

        /// Number of sub-teams in the bracket
        #[arg(long, value_enum)]
        size: SizeArg,

        /// Directory for the generated sheets
        #[arg(long)]
        out_dir: PathBuf,

        /// JSON object of slot name → newline-separated players; auto-filled when omitted
        #[arg(long)]
        sub_teams: Option<PathBuf>,

        /// Match result as MATCH=TEAM (e.g. R16-3=Alpha-1); repeatable, applied in order
        #[arg(long = "winner")]
        winners: Vec<String>,

        /// Seed for a reproducible draw
        #[arg(long)]
        seed: Option<u64>,

        /// Draw config (YAML or JSON); falls back to TEAMDRAW_CONFIG_PATH
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Teams { roster, out_dir, seed, config } => {
            println!("🎲 Drawing teams...");
            println!("   Roster: {}", roster.display());
            println!("   Output: {}", out_dir.display());

            let config = load_config(config.as_deref(), seed)?;
            let report = draw_cli::run_teams(config, &roster, &out_dir)?;
            print_report(&report);
        }

        Commands::Bracket { roster, size, out_dir, sub_teams, winners, seed, config } => {
            let size = BracketSize::from(size);
            println!("🏆 Drawing {}-team bracket...", size.team_count());
            println!("   Roster: {}", roster.display());
            println!("   Output: {}", out_dir.display());

            let config = load_config(config.as_deref(), seed)?;
            let winners = winners
                .iter()
                .map(|w| draw_cli::parse_winner(w))
                .collect::<Result<Vec<_>>>()?;
            let options = draw_cli::BracketOptions { size, sub_teams, winners };
            let report = draw_cli::run_bracket(config, &roster, &out_dir, &options)?;
            print_report(&report);
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

#[cfg(feature = "cli")]
fn load_config(path: Option<&Path>, seed: Option<u64>) -> Result<DrawConfig> {
    let mut config = match path {
        Some(path) => DrawConfig::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => DrawConfig::from_env().context("Failed to load config from environment")?,
    };
    if seed.is_some() {
        config.seed = seed;
    }
    Ok(config)
}

#[cfg(feature = "cli")]
fn print_report(report: &draw_cli::RunReport) {
    let s = &report.summary;
    println!("\n✅ Draw complete!");
    println!(
        "   People: {} ({} male, {} female, {} interns)",
        s.total, s.male, s.female, s.intern
    );
    for file in &report.files {
        println!("   Wrote:  {}", file.display());
    }
    if let Some(reason) = &report.blocked {
        println!("\n⚠️  Quarterfinals not drawn: {reason}");
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("teamdraw CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
