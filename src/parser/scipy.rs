//! Scipy-style grammar: `TAG: subject` with a fixed table of short tags

use regex::Regex;
use std::sync::LazyLock;

use super::util::{split_merge_request, split_message};
use super::CommitParser;
use crate::domain::{Commit, LevelBump, ParseResult, ParsedCommit};

static HEADER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<tag>[A-Z]+)(?:\((?P<scope>[^)\n]+)\))?:[\t ]*(?P<subject>.*)$")
        .expect("Invalid regex")
});

/// Tag, category and bump level of every recognized scipy tag
const TAGS: &[(&str, &str, LevelBump)] = &[
    ("API", "api changes", LevelBump::Major),
    ("DEP", "deprecations", LevelBump::Minor),
    ("DEV", "development", LevelBump::Minor),
    ("ENH", "enhancements", LevelBump::Minor),
    ("REV", "reverts", LevelBump::Minor),
    ("FEAT", "features", LevelBump::Minor),
    ("BUG", "bug fixes", LevelBump::Patch),
    ("MAINT", "maintenance", LevelBump::Patch),
    ("BLD", "build", LevelBump::Patch),
    ("BENCH", "benchmarks", LevelBump::NoRelease),
    ("DOC", "documentation", LevelBump::NoRelease),
    ("STY", "style", LevelBump::NoRelease),
    ("TST", "tests", LevelBump::NoRelease),
    ("TEST", "tests", LevelBump::NoRelease),
    ("REL", "release", LevelBump::NoRelease),
];

const UNTAGGED: &str = "untagged";

fn lookup(tag: &str) -> Option<(&'static str, LevelBump)> {
    TAGS.iter()
        .find(|(name, _, _)| *name == tag)
        .map(|(_, category, level)| (*category, *level))
}

/// Parser for scipy/numpy style commit messages.
///
/// Unrecognized messages are reported as "untagged" with no release rather
/// than as failures.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScipyParser;

impl ScipyParser {
    pub fn new() -> Self {
        ScipyParser
    }
}

impl CommitParser for ScipyParser {
    fn name(&self) -> &'static str {
        "scipy"
    }

    fn parse(&self, commit: &Commit) -> ParseResult {
        let parts = split_message(&commit.message);

        let header = HEADER_REGEX
            .captures(&parts.subject)
            .and_then(|caps| lookup(&caps["tag"]).map(|entry| (caps, entry)));

        let (mut parsed, subject) = match header {
            Some((caps, (category, level))) => {
                let mut parsed = ParsedCommit::new(commit, level, category);
                parsed.scope = caps
                    .name("scope")
                    .map(|m| m.as_str().trim().to_string())
                    .unwrap_or_default();
                (parsed, caps["subject"].trim().to_string())
            }
            None => (
                ParsedCommit::new(commit, LevelBump::NoRelease, UNTAGGED),
                parts.subject.clone(),
            ),
        };

        let (subject, linked_merge_request) = split_merge_request(&subject);
        parsed.linked_merge_request = linked_merge_request;

        if parts.breaking_marker {
            parsed.bump = LevelBump::Major;
        }
        parsed.descriptions = std::iter::once(subject)
            .chain(parts.paragraphs)
            .collect();
        parsed.breaking_descriptions = parts.breaking;
        parsed.into()
    }
}
