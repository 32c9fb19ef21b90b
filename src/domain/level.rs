use crate::error::{ReleaseError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Magnitude of change between two versions.
///
/// Variants are declared from smallest to largest so the derived `Ord`
/// gives the total order `NoRelease < PrereleaseRevision < Patch < Minor < Major`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum LevelBump {
    #[default]
    NoRelease,
    PrereleaseRevision,
    Patch,
    Minor,
    Major,
}

impl LevelBump {
    /// Name used in configuration files and CLI output
    pub fn name(&self) -> &'static str {
        match self {
            LevelBump::NoRelease => "no_release",
            LevelBump::PrereleaseRevision => "prerelease_revision",
            LevelBump::Patch => "patch",
            LevelBump::Minor => "minor",
            LevelBump::Major => "major",
        }
    }
}

impl FromStr for LevelBump {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "no_release" => Ok(LevelBump::NoRelease),
            "prerelease_revision" => Ok(LevelBump::PrereleaseRevision),
            "patch" => Ok(LevelBump::Patch),
            "minor" => Ok(LevelBump::Minor),
            "major" => Ok(LevelBump::Major),
            _ => Err(ReleaseError::config(format!("Unknown bump level: '{}'", s))),
        }
    }
}

impl fmt::Display for LevelBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
