//! Domain logic - pure business rules independent of git operations

pub mod branch;
pub mod commit;
pub mod level;
pub mod translator;
pub mod version;

pub use branch::{select_branch, BranchConfig, BranchSettings};
pub use commit::{Commit, ParseError, ParseResult, ParsedCommit};
pub use level::LevelBump;
pub use translator::VersionTranslator;
pub use version::{Version, DEFAULT_PRERELEASE_TOKEN, DEFAULT_TAG_FORMAT};
