//! Platforms and the games a worker can run on them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Console or PC release the worker automates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Switch,
    Steam,
}

impl Platform {
    /// Game numbers supported on this platform.
    pub fn supported_games(self) -> &'static [u8] {
        match self {
            Platform::Switch => &[3, 6],
            Platform::Steam => &[6],
        }
    }

    pub fn supports(self, game: u8) -> bool {
        self.supported_games().contains(&game)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Switch => f.write_str("switch"),
            Platform::Steam => f.write_str("steam"),
        }
    }
}

impl FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "switch" => Ok(Platform::Switch),
            "steam" => Ok(Platform::Steam),
            _ => Err(UnknownPlatform(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown platform: {0}")]
pub struct UnknownPlatform(pub String);
