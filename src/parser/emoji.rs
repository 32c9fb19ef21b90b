//! Emoji (gitmoji style) grammar

use super::util::{split_merge_request, split_message};
use super::{CommitParser, ParserOptions};
use crate::domain::{Commit, LevelBump, ParseResult, ParsedCommit};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Emoji sets for each bump level, in precedence order within a level
#[derive(Debug, Clone, PartialEq)]
pub struct EmojiOptions {
    pub major_tags: Vec<String>,
    pub minor_tags: Vec<String>,
    pub patch_tags: Vec<String>,
    pub default_bump_level: LevelBump,
}

impl Default for EmojiOptions {
    fn default() -> Self {
        EmojiOptions {
            major_tags: strings(&[":boom:"]),
            minor_tags: strings(&[
                ":sparkles:",
                ":children_crossing:",
                ":lipstick:",
                ":iphone:",
                ":egg:",
                ":chart_with_upwards_trend:",
            ]),
            patch_tags: strings(&[
                ":ambulance:",
                ":lock:",
                ":bug:",
                ":zap:",
                ":goal_net:",
                ":alien:",
                ":wheelchair:",
                ":speech_balloon:",
                ":mag:",
                ":apple:",
                ":penguin:",
                ":checkered_flag:",
                ":robot:",
                ":green_apple:",
            ]),
            default_bump_level: LevelBump::NoRelease,
        }
    }
}

impl EmojiOptions {
    pub fn from_options(options: &ParserOptions) -> Self {
        let defaults = EmojiOptions::default();
        EmojiOptions {
            major_tags: options.major_tags.clone().unwrap_or(defaults.major_tags),
            minor_tags: options.minor_tags.clone().unwrap_or(defaults.minor_tags),
            patch_tags: options.patch_tags.clone().unwrap_or(defaults.patch_tags),
            default_bump_level: options
                .default_bump_level
                .unwrap_or(defaults.default_bump_level),
        }
    }
}

/// Classifies commits by the emoji found in their subject.
///
/// Never fails: a subject without a configured emoji is filed under
/// "Other" with the default bump level.
#[derive(Debug, Clone, Default)]
pub struct EmojiParser {
    options: EmojiOptions,
}

impl EmojiParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: EmojiOptions) -> Self {
        Self { options }
    }

    /// Highest level emoji present in `subject`, first configured wins on ties
    fn find<'a>(&'a self, subject: &str) -> Option<(LevelBump, &'a str)> {
        [
            (LevelBump::Major, &self.options.major_tags),
            (LevelBump::Minor, &self.options.minor_tags),
            (LevelBump::Patch, &self.options.patch_tags),
        ]
        .into_iter()
        .find_map(|(level, tags)| {
            tags.iter()
                .find(|tag| !tag.is_empty() && subject.contains(tag.as_str()))
                .map(|tag| (level, tag.as_str()))
        })
    }
}

impl CommitParser for EmojiParser {
    fn name(&self) -> &'static str {
        "emoji"
    }

    fn parse(&self, commit: &Commit) -> ParseResult {
        let parts = split_message(&commit.message);
        let (subject, linked_merge_request) = split_merge_request(&parts.subject);

        let (bump, category) = match self.find(&subject) {
            Some((level, tag)) => (level, tag.to_string()),
            None => (self.options.default_bump_level, "Other".to_string()),
        };

        let mut descriptions = vec![subject];
        descriptions.extend(parts.paragraphs);
        descriptions.extend(parts.breaking);

        let breaking_descriptions = if bump == LevelBump::Major {
            descriptions[1..].to_vec()
        } else {
            Vec::new()
        };

        let mut parsed = ParsedCommit::new(commit, bump, category);
        parsed.descriptions = descriptions;
        parsed.breaking_descriptions = breaking_descriptions;
        parsed.linked_merge_request = linked_merge_request;
        parsed.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(message: &str) -> ParsedCommit {
        match EmojiParser::new().parse(&Commit::new("abc", message)) {
            ParseResult::Parsed(parsed) => parsed,
            ParseResult::Failed(err) => panic!("emoji parser must not fail: {}", err),
        }
    }

    #[test]
    fn test_minor_emoji() {
        let parsed = parse(":sparkles: add search");
        assert_eq!(parsed.bump, LevelBump::Minor);
        assert_eq!(parsed.category, ":sparkles:");
    }

    #[test]
    fn test_patch_emoji() {
        assert_eq!(parse(":bug: fix crash").bump, LevelBump::Patch);
    }

    #[test]
    fn test_highest_level_wins() {
        let parsed = parse(":bug: :boom: rewrite storage\n\nold files unreadable");
        assert_eq!(parsed.bump, LevelBump::Major);
        assert_eq!(parsed.category, ":boom:");
        assert_eq!(parsed.breaking_descriptions, vec!["old files unreadable"]);
    }

    #[test]
    fn test_configuration_order_breaks_ties() {
        let parsed = parse(":lipstick: :sparkles: restyle and add");
        assert_eq!(parsed.category, ":sparkles:");
    }

    #[test]
    fn test_unknown_emoji_is_other() {
        let parsed = parse(":memo: update docs");
        assert_eq!(parsed.bump, LevelBump::NoRelease);
        assert_eq!(parsed.category, "Other");
        let parsed = parse("plain text without emoji");
        assert_eq!(parsed.category, "Other");
    }

    #[test]
    fn test_emoji_only_in_body_is_ignored() {
        let parsed = parse("update\n\n:boom: mentioned in body");
        assert_eq!(parsed.bump, LevelBump::NoRelease);
    }

    #[test]
    fn test_unicode_emoji_sets() {
        let parser = EmojiParser::with_options(EmojiOptions {
            major_tags: vec!["💥".to_string()],
            minor_tags: vec!["✨".to_string()],
            patch_tags: vec!["🐛".to_string()],
            default_bump_level: LevelBump::NoRelease,
        });
        assert_eq!(
            parser.parse(&Commit::new("a", "✨ new thing")).bump(),
            LevelBump::Minor
        );
    }
}
