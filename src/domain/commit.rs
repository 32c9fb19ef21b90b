use crate::domain::LevelBump;
use crate::error::ReleaseError;
use std::fmt;

/// One commit as handed in by the history reader
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Commit {
    pub id: String,
    pub message: String,
    /// Paths changed by this commit, relative to the repository root
    pub paths: Vec<String>,
    /// Parent commit ids; empty when the history is linear or unknown
    pub parents: Vec<String>,
}

impl Commit {
    pub fn new(id: impl Into<String>, message: impl Into<String>) -> Self {
        Commit {
            id: id.into(),
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.paths = paths.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_parents<I, S>(mut self, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parents = parents.into_iter().map(Into::into).collect();
        self
    }

    /// First line of the message
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("").trim()
    }

    pub fn short_id(&self) -> &str {
        self.id.get(..7).unwrap_or(&self.id)
    }
}

/// Structured bump decision for one commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommit {
    pub bump: LevelBump,
    pub category: String,
    pub scope: String,
    pub descriptions: Vec<String>,
    pub breaking_descriptions: Vec<String>,
    /// Merge or pull request reference such as `#123`, when the subject carries one
    pub linked_merge_request: Option<String>,
    pub commit: Commit,
}

impl ParsedCommit {
    pub fn new(commit: &Commit, bump: LevelBump, category: impl Into<String>) -> Self {
        ParsedCommit {
            bump,
            category: category.into(),
            scope: String::new(),
            descriptions: Vec::new(),
            breaking_descriptions: Vec::new(),
            linked_merge_request: None,
            commit: commit.clone(),
        }
    }

    pub fn is_breaking(&self) -> bool {
        self.bump == LevelBump::Major
    }
}

/// A commit the active grammar could not classify
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub commit: Commit,
    pub reason: String,
}

impl ParseError {
    pub fn new(commit: &Commit, reason: impl Into<String>) -> Self {
        ParseError {
            commit: commit.clone(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "commit {}: {}", self.commit.short_id(), self.reason)
    }
}

impl From<ParseError> for ReleaseError {
    fn from(err: ParseError) -> Self {
        ReleaseError::unknown_style(err.to_string())
    }
}

/// Outcome of running one commit through a grammar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseResult {
    Parsed(ParsedCommit),
    Failed(ParseError),
}

impl ParseResult {
    pub fn commit(&self) -> &Commit {
        match self {
            ParseResult::Parsed(parsed) => &parsed.commit,
            ParseResult::Failed(err) => &err.commit,
        }
    }

    pub fn parsed(&self) -> Option<&ParsedCommit> {
        match self {
            ParseResult::Parsed(parsed) => Some(parsed),
            ParseResult::Failed(_) => None,
        }
    }

    /// Bump level, counting failures as no release
    pub fn bump(&self) -> LevelBump {
        self.parsed().map_or(LevelBump::NoRelease, |p| p.bump)
    }
}

impl From<ParsedCommit> for ParseResult {
    fn from(parsed: ParsedCommit) -> Self {
        ParseResult::Parsed(parsed)
    }
}

impl From<ParseError> for ParseResult {
    fn from(err: ParseError) -> Self {
        ParseResult::Failed(err)
    }
}
