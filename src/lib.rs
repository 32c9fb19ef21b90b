//! Release version computation from commit history
//!
//! Reads the newest-first history of a branch, finds the last release tag,
//! classifies every commit since with a pluggable grammar and derives the next
//! semantic version under the branch's release policy.

pub mod analyzer;
pub mod boundary;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod parser;
pub mod ui;

pub use analyzer::{Decision, History, NextVersion, ReleasePolicy, Tag, VersionAnalyzer};
pub use boundary::BoundaryWarning;
pub use config::{load_config, Config};
pub use domain::{BranchConfig, Commit, LevelBump, ParsedCommit, Version, VersionTranslator};
pub use error::{ReleaseError, Result};
pub use parser::{build_parser, CommitParser, ParserKind};
