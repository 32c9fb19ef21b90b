//! Conventional Commits grammar
//!
//! Parses commits following https://www.conventionalcommits.org/:
//! `type(scope)!: subject`, an optional body and footers.

use regex::Regex;
use std::sync::LazyLock;

use super::util::{contains, split_merge_request, split_message};
use super::{CommitParser, ParserOptions};
use crate::domain::{Commit, LevelBump, ParseError, ParseResult, ParsedCommit};

static HEADER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<type>[\w-]+)(?:\((?P<scope>[^)\n]+)\))?(?P<breaking>!)?:[\t ]+(?P<subject>.+)$")
        .expect("Invalid regex")
});

fn default_allowed_tags() -> Vec<String> {
    [
        "build", "chore", "ci", "docs", "feat", "fix", "perf", "style", "refactor", "test",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Tunables for [`ConventionalParser`]
#[derive(Debug, Clone, PartialEq)]
pub struct ConventionalOptions {
    pub allowed_tags: Vec<String>,
    pub minor_tags: Vec<String>,
    pub patch_tags: Vec<String>,
    pub default_bump_level: LevelBump,
}

impl ConventionalOptions {
    pub fn from_options(options: &ParserOptions) -> Self {
        let defaults = ConventionalOptions::default();
        ConventionalOptions {
            allowed_tags: options.allowed_tags.clone().unwrap_or(defaults.allowed_tags),
            minor_tags: options.minor_tags.clone().unwrap_or(defaults.minor_tags),
            patch_tags: options.patch_tags.clone().unwrap_or(defaults.patch_tags),
            default_bump_level: options
                .default_bump_level
                .unwrap_or(defaults.default_bump_level),
        }
    }
}

impl Default for ConventionalOptions {
    fn default() -> Self {
        ConventionalOptions {
            allowed_tags: default_allowed_tags(),
            minor_tags: vec!["feat".to_string()],
            patch_tags: vec!["fix".to_string(), "perf".to_string()],
            default_bump_level: LevelBump::NoRelease,
        }
    }
}

/// Long category name for a commit type
fn category_for(commit_type: &str) -> String {
    match commit_type {
        "build" => "build system",
        "chore" => "chores",
        "ci" => "continuous integration",
        "docs" => "documentation",
        "feat" => "features",
        "fix" => "bug fixes",
        "perf" => "performance improvements",
        "refactor" => "refactoring",
        "style" => "code style",
        "test" => "testing",
        other => other,
    }
    .to_string()
}

/// Parser for Conventional Commits (also known as the Angular convention)
#[derive(Debug, Clone, Default)]
pub struct ConventionalParser {
    options: ConventionalOptions,
}

impl ConventionalParser {
    /// Create a new parser with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with custom configuration
    pub fn with_options(options: ConventionalOptions) -> Self {
        Self { options }
    }

    fn level_for(&self, commit_type: &str, breaking: bool) -> LevelBump {
        if breaking {
            LevelBump::Major
        } else if contains(&self.options.minor_tags, commit_type) {
            LevelBump::Minor
        } else if contains(&self.options.patch_tags, commit_type) {
            LevelBump::Patch
        } else {
            self.options.default_bump_level
        }
    }
}

impl CommitParser for ConventionalParser {
    fn name(&self) -> &'static str {
        "conventional"
    }

    fn parse(&self, commit: &Commit) -> ParseResult {
        let parts = split_message(&commit.message);

        let Some(caps) = HEADER_REGEX.captures(&parts.subject) else {
            return ParseError::new(
                commit,
                format!("Unable to parse the given commit message: {:?}", parts.subject),
            )
            .into();
        };

        let commit_type = &caps["type"];
        if !contains(&self.options.allowed_tags, commit_type) {
            return ParseError::new(
                commit,
                format!("Unknown commit type '{}' in {:?}", commit_type, parts.subject),
            )
            .into();
        }

        let (subject, linked_merge_request) = split_merge_request(caps["subject"].trim());
        let bang = caps.name("breaking").is_some();

        let mut breaking_descriptions = parts.breaking;
        if bang && breaking_descriptions.is_empty() {
            breaking_descriptions.push(subject.clone());
        }
        let breaking = bang || parts.breaking_marker;

        let mut descriptions = vec![subject];
        descriptions.extend(parts.paragraphs);

        ParsedCommit {
            bump: self.level_for(commit_type, breaking),
            category: category_for(commit_type),
            scope: caps
                .name("scope")
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default(),
            descriptions,
            breaking_descriptions,
            linked_merge_request,
            commit: commit.clone(),
        }
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(message: &str) -> ParsedCommit {
        match ConventionalParser::new().parse(&Commit::new("abc1234567890", message)) {
            ParseResult::Parsed(parsed) => parsed,
            ParseResult::Failed(err) => panic!("unexpected parse error: {}", err),
        }
    }

    fn fails(message: &str) -> bool {
        matches!(
            ConventionalParser::new().parse(&Commit::new("abc", message)),
            ParseResult::Failed(_)
        )
    }

    #[test]
    fn test_parse_simple_feat() {
        let parsed = parse("feat: add new feature");
        assert_eq!(parsed.bump, LevelBump::Minor);
        assert_eq!(parsed.category, "features");
        assert_eq!(parsed.scope, "");
        assert_eq!(parsed.descriptions, vec!["add new feature"]);
        assert!(parsed.breaking_descriptions.is_empty());
    }

    #[test]
    fn test_parse_with_scope() {
        let parsed = parse("fix(parser): handle edge case");
        assert_eq!(parsed.bump, LevelBump::Patch);
        assert_eq!(parsed.scope, "parser");
        assert_eq!(parsed.category, "bug fixes");
    }

    #[test]
    fn test_perf_is_patch_and_docs_is_no_release() {
        assert_eq!(parse("perf: faster").bump, LevelBump::Patch);
        assert_eq!(parse("docs: readme").bump, LevelBump::NoRelease);
        assert_eq!(parse("chore(deps): bump").bump, LevelBump::NoRelease);
    }

    #[test]
    fn test_bang_forces_major() {
        let parsed = parse("refactor(api)!: drop v1 endpoints");
        assert_eq!(parsed.bump, LevelBump::Major);
        assert_eq!(parsed.breaking_descriptions, vec!["drop v1 endpoints"]);
    }

    #[test]
    fn test_breaking_footer_forces_major() {
        let parsed = parse(
            "fix: tighten validation\n\nExplain the fix.\n\nBREAKING CHANGE: empty names are rejected\n\nBREAKING-CHANGE: ids are now strings",
        );
        assert_eq!(parsed.bump, LevelBump::Major);
        assert_eq!(
            parsed.descriptions,
            vec!["tighten validation", "Explain the fix."]
        );
        assert_eq!(
            parsed.breaking_descriptions,
            vec!["empty names are rejected", "ids are now strings"]
        );
    }

    #[test]
    fn test_bang_with_footer_keeps_footer_only() {
        let parsed = parse("feat!: new api\n\nBREAKING CHANGE: old api removed");
        assert_eq!(parsed.breaking_descriptions, vec!["old api removed"]);
    }

    #[test]
    fn test_linked_merge_request() {
        let parsed = parse("feat(ui): dark mode (#128)");
        assert_eq!(parsed.descriptions[0], "dark mode");
        assert_eq!(parsed.linked_merge_request.as_deref(), Some("#128"));
    }

    #[test]
    fn test_non_conventional_fails() {
        assert!(fails("Update README"));
        assert!(fails("feat:missing space"));
        assert!(fails(""));
    }

    #[test]
    fn test_unknown_type_fails() {
        assert!(fails("wip: half done"));
    }

    #[test]
    fn test_custom_options() {
        let options = ConventionalOptions {
            allowed_tags: vec!["feature".to_string(), "bugfix".to_string(), "misc".to_string()],
            minor_tags: vec!["feature".to_string()],
            patch_tags: vec!["bugfix".to_string()],
            default_bump_level: LevelBump::Patch,
        };
        let parser = ConventionalParser::with_options(options);
        let result = parser.parse(&Commit::new("a", "misc: tidy"));
        assert_eq!(result.bump(), LevelBump::Patch);
        let result = parser.parse(&Commit::new("a", "feature: new"));
        assert_eq!(result.bump(), LevelBump::Minor);
        let result = parser.parse(&Commit::new("a", "feat: new"));
        assert!(matches!(result, ParseResult::Failed(_)));
    }

    #[test]
    fn test_back_reference_to_commit() {
        let parsed = parse("fix: x");
        assert_eq!(parsed.commit.id, "abc1234567890");
    }
}
