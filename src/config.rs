use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::analyzer::{ReleasePolicy, VersionAnalyzer};
use crate::domain::{
    select_branch, BranchConfig, BranchSettings, VersionTranslator, DEFAULT_PRERELEASE_TOKEN,
    DEFAULT_TAG_FORMAT,
};
use crate::error::Result;
use crate::parser::{build_parser, CommitParser, MonorepoOptions, ParserKind, ParserOptions};

/// Name of the configuration file looked up in the working and config directories
pub const CONFIG_FILE_NAME: &str = "semrel.toml";

/// Represents the complete configuration for semrel.
///
/// Contains the tag format, the ordered branch policies, the commit grammar and
/// the release policy switches. Every field has a default so an empty file is
/// a valid configuration.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_tag_format")]
    pub tag_format: String,

    /// Branch policies in priority order; the first match wins
    #[serde(default = "default_branches")]
    pub branches: Vec<BranchSettings>,

    #[serde(default)]
    pub commit_parser: ParserKind,

    #[serde(default)]
    pub commit_parser_options: ParserOptions,

    #[serde(default)]
    pub major_on_zero: bool,

    #[serde(default = "default_true")]
    pub allow_zero_version: bool,

    #[serde(default)]
    pub patch_without_tag: bool,

    #[serde(default)]
    pub add_partial_tags: bool,

    #[serde(default)]
    pub strict: bool,

    #[serde(default)]
    pub monorepo: Option<MonorepoOptions>,
}

fn default_tag_format() -> String {
    DEFAULT_TAG_FORMAT.to_string()
}

fn default_true() -> bool {
    true
}

/// Returns the default branch policy: `main` or `master` release final versions.
fn default_branches() -> Vec<BranchSettings> {
    vec![BranchSettings {
        name: "main".to_string(),
        pattern: "^(main|master)$".to_string(),
        prerelease: false,
        prerelease_token: DEFAULT_PRERELEASE_TOKEN.to_string(),
    }]
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tag_format: default_tag_format(),
            branches: default_branches(),
            commit_parser: ParserKind::default(),
            commit_parser_options: ParserOptions::default(),
            major_on_zero: false,
            allow_zero_version: true,
            patch_without_tag: false,
            add_partial_tags: false,
            strict: false,
            monorepo: None,
        }
    }
}

impl Config {
    /// Translator for the configured tag format
    pub fn translator(&self) -> Result<VersionTranslator> {
        VersionTranslator::new(
            self.tag_format.as_str(),
            DEFAULT_PRERELEASE_TOKEN,
            self.add_partial_tags,
        )
    }

    /// The configured grammar, scoped to the monorepo package when one is set
    pub fn parser(&self) -> Result<Box<dyn CommitParser>> {
        build_parser(
            self.commit_parser,
            &self.commit_parser_options,
            self.monorepo.as_ref(),
        )
    }

    /// Release policy switches taken from the file; run-time overrides are
    /// applied by the caller.
    pub fn policy(&self) -> ReleasePolicy {
        ReleasePolicy {
            major_on_zero: self.major_on_zero,
            allow_zero_version: self.allow_zero_version,
            patch_without_tag: self.patch_without_tag,
            strict: self.strict,
            ..ReleasePolicy::default()
        }
    }

    /// Policy of the first branch group matching `branch_name`
    pub fn branch(&self, branch_name: &str) -> Result<BranchConfig> {
        select_branch(&self.branches, branch_name)
    }

    /// Analyzer wired from this configuration with `policy`
    pub fn analyzer(&self, policy: ReleasePolicy) -> Result<VersionAnalyzer> {
        Ok(VersionAnalyzer::new(self.translator()?, self.parser()?, policy))
    }

    /// Whether the grammar needs the paths each commit touched
    pub fn needs_paths(&self) -> bool {
        self.monorepo
            .as_ref()
            .is_some_and(|m| !m.path_filters.is_empty())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `semrel.toml` in current directory
/// 3. `semrel.toml` in user config directory
/// 4. Default configuration if no file found
///
/// The tag format and every branch pattern are validated before returning.
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        debug!(path, "loading configuration");
        fs::read_to_string(path)?
    } else if Path::new(CONFIG_FILE_NAME).exists() {
        debug!(path = CONFIG_FILE_NAME, "loading configuration");
        fs::read_to_string(CONFIG_FILE_NAME)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            debug!(path = %config_path.display(), "loading configuration");
            fs::read_to_string(config_path)?
        } else {
            debug!("no configuration file found, using defaults");
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    parse_config(&config_str)
}

/// Parse and validate configuration text
pub fn parse_config(config_str: &str) -> Result<Config> {
    let config: Config = toml::from_str(config_str)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    config.translator()?;
    for settings in &config.branches {
        BranchConfig::compile(settings)?;
    }
    config.parser()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LevelBump;
    use crate::error::ReleaseError;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.tag_format, "v{version}");
        assert!(config.allow_zero_version);
        assert!(!config.major_on_zero);
    }

    #[test]
    fn test_default_branch_matches_main_and_master() {
        let config = Config::default();
        assert!(!config.branch("main").unwrap().prerelease);
        assert!(config.branch("master").is_ok());
        assert!(matches!(
            config.branch("feature/x"),
            Err(ReleaseError::NotAReleaseBranch(_))
        ));
    }

    #[test]
    fn test_full_config() {
        let config = parse_config(
            r#"
tag_format = "release-{version}"
commit_parser = "emoji"
major_on_zero = true
strict = true

[commit_parser_options]
minor_tags = [":sparkles:"]
default_bump_level = "patch"

[[branches]]
name = "beta"
match = "^beta/"
prerelease = true
prerelease_token = "beta"

[[branches]]
name = "main"
match = "^main$"

[monorepo]
path_filters = ["packages/api"]
"#,
        )
        .unwrap();

        assert_eq!(config.commit_parser, ParserKind::Emoji);
        assert_eq!(
            config.commit_parser_options.default_bump_level,
            Some(LevelBump::Patch)
        );
        assert_eq!(config.branches.len(), 2);
        let beta = config.branch("beta/2").unwrap();
        assert!(beta.prerelease);
        assert_eq!(beta.prerelease_token, "beta");
        assert!(config.needs_paths());

        let policy = config.policy();
        assert!(policy.major_on_zero);
        assert!(policy.strict);
        assert_eq!(config.parser().unwrap().name(), "monorepo");
    }

    #[test]
    fn test_invalid_tag_format_rejected() {
        let err = parse_config(r#"tag_format = "release""#).unwrap_err();
        assert!(matches!(err, ReleaseError::InvalidTagFormat(_)));
    }

    #[test]
    fn test_invalid_branch_regex_rejected() {
        let err = parse_config(
            r#"
[[branches]]
name = "broken"
match = "("
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ReleaseError::Config(_)));
    }

    #[test]
    fn test_unknown_parser_rejected() {
        let err = parse_config(r#"commit_parser = "gitmoji2""#).unwrap_err();
        assert!(matches!(err, ReleaseError::Toml(_)));
    }
}
