//! Monorepo decorator: scopes any grammar to one package of a repository

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::debug;

use super::CommitParser;
use crate::domain::{Commit, LevelBump, ParseResult, ParsedCommit};

static SQUASH_ITEM_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*[\t ]+(?P<text>\S.*)$").expect("Invalid regex"));

const OUT_OF_SCOPE: &str = "out of scope";

/// Which part of the repository a release covers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonorepoOptions {
    /// Path prefixes owned by the package, relative to the repository root
    #[serde(default)]
    pub path_filters: Vec<String>,

    /// Commits whose scope starts with this prefix belong to the package
    #[serde(default)]
    pub scope_prefix: Option<String>,

    /// Split squash-merge commits into one logical commit per `* ` item
    #[serde(default)]
    pub parse_squash_commits: bool,
}

impl MonorepoOptions {
    /// Whether the options change anything about plain parsing
    pub fn is_active(&self) -> bool {
        !self.path_filters.is_empty() || self.scope_prefix.is_some() || self.parse_squash_commits
    }

    fn has_filters(&self) -> bool {
        !self.path_filters.is_empty() || self.scope_prefix.is_some()
    }

    fn path_matches(&self, commit: &Commit) -> bool {
        commit.paths.iter().any(|path| {
            self.path_filters.iter().any(|filter| {
                let filter = filter.trim_end_matches('/');
                filter.is_empty()
                    || filter == "."
                    || path == filter
                    || path
                        .strip_prefix(filter)
                        .is_some_and(|rest| rest.starts_with('/'))
            })
        })
    }

    fn scope_matches(&self, scope: &str) -> bool {
        self.scope_prefix
            .as_deref()
            .is_some_and(|prefix| scope.starts_with(prefix))
    }
}

/// Wraps another grammar and releases only commits that touch the package
pub struct MonorepoParser {
    inner: Box<dyn CommitParser>,
    options: MonorepoOptions,
}

impl MonorepoParser {
    pub fn new(inner: Box<dyn CommitParser>, options: MonorepoOptions) -> Self {
        MonorepoParser { inner, options }
    }

    fn out_of_scope(&self, mut parsed: ParsedCommit) -> ParseResult {
        debug!(
            commit = parsed.commit.short_id(),
            scope = %parsed.scope,
            "commit outside of package"
        );
        parsed.bump = LevelBump::NoRelease;
        parsed.into()
    }
}

/// Split a squash-merge message into the messages of the commits it folds.
///
/// The first message is the subject plus any text before the first `* `
/// item; each item then starts a new message that runs until the next item.
pub fn split_squash_message(message: &str) -> Vec<String> {
    let mut messages: Vec<Vec<&str>> = vec![Vec::new()];

    for line in message.lines() {
        match SQUASH_ITEM_REGEX.captures(line) {
            Some(caps) => {
                let text = caps.name("text").map_or("", |m| m.as_str());
                messages.push(vec![text]);
            }
            None => {
                if let Some(current) = messages.last_mut() {
                    current.push(line.strip_prefix("  ").unwrap_or(line));
                }
            }
        }
    }

    messages
        .into_iter()
        .map(|lines| lines.join("\n").trim().to_string())
        .filter(|text| !text.is_empty())
        .collect()
}

impl CommitParser for MonorepoParser {
    fn name(&self) -> &'static str {
        "monorepo"
    }

    fn parse(&self, commit: &Commit) -> ParseResult {
        let result = self.inner.parse(commit);
        if !self.options.has_filters() || self.options.path_matches(commit) {
            return result;
        }

        match result {
            ParseResult::Parsed(parsed) if self.options.scope_matches(&parsed.scope) => {
                parsed.into()
            }
            ParseResult::Parsed(parsed) => self.out_of_scope(parsed),
            ParseResult::Failed(err) if !commit.paths.is_empty() => {
                self.out_of_scope(ParsedCommit::new(&err.commit, LevelBump::NoRelease, OUT_OF_SCOPE))
            }
            failed => failed,
        }
    }

    fn parse_all(&self, commit: &Commit) -> Vec<ParseResult> {
        if !self.options.parse_squash_commits {
            return vec![self.parse(commit)];
        }

        let messages = split_squash_message(&commit.message);
        if messages.len() <= 1 {
            return vec![self.parse(commit)];
        }

        debug!(
            commit = commit.short_id(),
            count = messages.len(),
            "expanding squash commit"
        );

        let mut results: Vec<ParseResult> = messages
            .into_iter()
            .map(|message| {
                let logical = Commit {
                    message,
                    ..commit.clone()
                };
                self.parse(&logical)
            })
            .collect();

        // Items inherit the pull request reference of the squash subject
        let linked = results
            .first()
            .and_then(ParseResult::parsed)
            .and_then(|parsed| parsed.linked_merge_request.clone());
        if let Some(linked) = linked {
            for result in results.iter_mut().skip(1) {
                if let ParseResult::Parsed(parsed) = result {
                    parsed
                        .linked_merge_request
                        .get_or_insert_with(|| linked.clone());
                }
            }
        }

        results
    }
}
