use crate::domain::version::DEFAULT_PRERELEASE_TOKEN;
use crate::error::{ReleaseError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*$").expect("Invalid regex"));

/// Release policy for a group of branches, as written in the configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchSettings {
    pub name: String,

    #[serde(rename = "match")]
    pub pattern: String,

    #[serde(default)]
    pub prerelease: bool,

    #[serde(default = "default_prerelease_token")]
    pub prerelease_token: String,
}

fn default_prerelease_token() -> String {
    DEFAULT_PRERELEASE_TOKEN.to_string()
}

/// Compiled release policy for the active branch
#[derive(Debug, Clone)]
pub struct BranchConfig {
    pub name: String,
    pub pattern: Regex,
    pub prerelease: bool,
    pub prerelease_token: String,
}

impl BranchConfig {
    /// Compile the branch pattern and validate the prerelease token
    pub fn compile(settings: &BranchSettings) -> Result<Self> {
        let pattern = Regex::new(&settings.pattern).map_err(|e| {
            ReleaseError::config(format!(
                "Invalid match pattern for branch group '{}': {}",
                settings.name, e
            ))
        })?;

        if !TOKEN_REGEX.is_match(&settings.prerelease_token) {
            return Err(ReleaseError::config(format!(
                "Invalid prerelease token '{}' for branch group '{}'",
                settings.prerelease_token, settings.name
            )));
        }

        Ok(BranchConfig {
            name: settings.name.clone(),
            pattern,
            prerelease: settings.prerelease,
            prerelease_token: settings.prerelease_token.clone(),
        })
    }

    /// A non-prerelease policy matching every branch name
    pub fn release(name: impl Into<String>) -> Self {
        BranchConfig {
            name: name.into(),
            pattern: Regex::new(".*").expect("Invalid regex"),
            prerelease: false,
            prerelease_token: DEFAULT_PRERELEASE_TOKEN.to_string(),
        }
    }

    /// A prerelease policy matching every branch name
    pub fn prerelease(name: impl Into<String>, token: impl Into<String>) -> Self {
        BranchConfig {
            prerelease: true,
            prerelease_token: token.into(),
            ..BranchConfig::release(name)
        }
    }

    pub fn matches(&self, branch_name: &str) -> bool {
        self.pattern.is_match(branch_name)
    }
}

/// Select the policy for `branch_name`; the first matching group wins
pub fn select_branch(groups: &[BranchSettings], branch_name: &str) -> Result<BranchConfig> {
    for settings in groups {
        let config = BranchConfig::compile(settings)?;
        if config.matches(branch_name) {
            return Ok(config);
        }
    }
    Err(ReleaseError::NotAReleaseBranch(branch_name.to_string()))
}
