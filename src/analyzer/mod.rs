//! Analysis engine for determining the next version from history

pub mod history;
pub mod version_analyzer;

pub use history::{History, Tag};
pub use version_analyzer::{Classification, Decision, NextVersion, ReleasePolicy, VersionAnalyzer};
