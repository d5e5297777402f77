//! # Draw Configuration
//!
//! Every tunable of the draw lives here: which column labels map to which
//! roster category, how many teams there are and what they are called, and
//! how much noise the greedy fill is allowed.
//!
//! ## Usage
//! ```rust
//! use draw_core::config::DrawConfig;
//!
//! let config = DrawConfig::default();
//! assert_eq!(config.team_count(), 4);
//!
//! let yaml = "team_names: [Red, Blue]\nseed: 7\n";
//! let config = DrawConfig::from_yaml(yaml).unwrap();
//! assert_eq!(config.team_count(), 2);
//! ```

use crate::error::{DrawError, Result};
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path};
use tracing::info;

pub const CONFIG_PATH_ENV: &str = "TEAMDRAW_CONFIG_PATH";

/// Lowercase substrings that classify a roster column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryMarkers {
    pub male: String,
    pub female: String,
    pub intern: String,
}

impl Default for CategoryMarkers {
    fn default() -> Self {
        Self { male: "male".to_string(), female: "female".to_string(), intern: "intern".to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    pub markers: CategoryMarkers,
    /// One entry per team, in team id order
    pub team_names: Vec<String>,
    /// Chance that a male goes to the smallest team rather than the runner-up
    pub smallest_team_bias: f64,
    /// Fixed seed for reproducible draws; entropy when unset
    pub seed: Option<u64>,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            markers: CategoryMarkers::default(),
            team_names: ["Team Alpha", "Team Beta", "Team Gamma", "Team Delta"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            smallest_team_bias: 0.7,
            seed: None,
        }
    }
}

impl DrawConfig {
    pub fn team_count(&self) -> usize {
        self.team_names.len()
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.json` file, anything else is read as YAML
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            DrawError::InvalidConfig(format!("Failed to read {}: {e}", path.display()))
        })?;
        let is_json = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        }
    }

    /// Config named by `TEAMDRAW_CONFIG_PATH`, or the defaults when unset
    pub fn from_env() -> Result<Self> {
        let Ok(path) = env::var(CONFIG_PATH_ENV) else {
            return Ok(Self::default());
        };

        let path = path.trim();
        if path.is_empty() {
            return Ok(Self::default());
        }

        info!(path, "loading draw config from {CONFIG_PATH_ENV}");
        Self::from_file(Path::new(path))
    }

    pub fn validate(&self) -> Result<()> {
        if self.team_names.is_empty() {
            return Err(DrawError::InvalidConfig("at least one team name is required".into()));
        }
        if self.team_names.iter().any(|name| name.trim().is_empty()) {
            return Err(DrawError::InvalidConfig("team names cannot be blank".into()));
        }
        if !(0.0..=1.0).contains(&self.smallest_team_bias) {
            return Err(DrawError::InvalidConfig(format!(
                "smallest_team_bias must be within 0.0..=1.0, got {}",
                self.smallest_team_bias
            )));
        }
        let markers = [&self.markers.male, &self.markers.female, &self.markers.intern];
        if markers.iter().any(|m| m.trim().is_empty()) {
            return Err(DrawError::InvalidConfig("category markers cannot be blank".into()));
        }
        Ok(())
    }
}
