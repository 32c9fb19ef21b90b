//! Legacy tag grammar: a configured marker anywhere in the message decides the bump

use super::util::{split_merge_request, split_message};
use super::{CommitParser, ParserOptions};
use crate::domain::{Commit, LevelBump, ParseError, ParseResult, ParsedCommit};
use crate::error::{ReleaseError, Result};

/// Markers recognized by [`TagParser`]
#[derive(Debug, Clone, PartialEq)]
pub struct TagOptions {
    pub minor_tag: String,
    pub fix_tag: String,
}

impl Default for TagOptions {
    fn default() -> Self {
        TagOptions {
            minor_tag: ":sparkles:".to_string(),
            fix_tag: ":nut_and_bolt:".to_string(),
        }
    }
}

impl TagOptions {
    pub fn from_options(options: &ParserOptions) -> Result<Self> {
        let defaults = TagOptions::default();
        let tag_options = TagOptions {
            minor_tag: options.minor_tag.clone().unwrap_or(defaults.minor_tag),
            fix_tag: options.fix_tag.clone().unwrap_or(defaults.fix_tag),
        };

        if tag_options.minor_tag.is_empty() || tag_options.fix_tag.is_empty() {
            return Err(ReleaseError::config(
                "tag parser needs non-empty minor_tag and fix_tag",
            ));
        }
        Ok(tag_options)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TagParser {
    options: TagOptions,
}

impl TagParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: TagOptions) -> Self {
        Self { options }
    }
}

impl CommitParser for TagParser {
    fn name(&self) -> &'static str {
        "tag"
    }

    fn parse(&self, commit: &Commit) -> ParseResult {
        let (level, category, marker) = if commit.message.contains(&self.options.minor_tag) {
            (LevelBump::Minor, "feature", &self.options.minor_tag)
        } else if commit.message.contains(&self.options.fix_tag) {
            (LevelBump::Patch, "fix", &self.options.fix_tag)
        } else {
            return ParseError::new(
                commit,
                format!(
                    "Unable to parse the given commit message: neither {} nor {} found",
                    self.options.minor_tag, self.options.fix_tag
                ),
            )
            .into();
        };

        let parts = split_message(&commit.message);
        let stripped = parts.subject.replace(marker.as_str(), "");
        let (subject, linked_merge_request) = split_merge_request(stripped.trim());

        let bump = if parts.breaking_marker {
            LevelBump::Major
        } else {
            level
        };

        let mut parsed = ParsedCommit::new(commit, bump, category);
        parsed.descriptions = std::iter::once(subject).chain(parts.paragraphs).collect();
        parsed.breaking_descriptions = parts.breaking;
        parsed.linked_merge_request = linked_merge_request;
        parsed.into()
    }
}
