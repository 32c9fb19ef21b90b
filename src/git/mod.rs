//! Read-only access to the repository history
//!
//! The analyzer works on a materialized [`History`]; this module produces one
//! from a real repository. Nothing here writes to the repository: creating
//! and pushing tags is left to the caller.
//!
//! ```rust,no_run
//! # use semrel::git::{Git2Repository, Repository};
//! # fn example() -> semrel::Result<()> {
//! let repo = Git2Repository::discover(".")?;
//! let branch = repo.current_branch()?;
//! let history = repo.history(false)?;
//! println!("{} commits on {}", history.commits.len(), branch);
//! # Ok(())
//! # }
//! ```

pub mod repository;

pub use repository::Git2Repository;

use crate::analyzer::History;
use crate::error::Result;

/// Source of commit history and tags
///
/// Implementors must be `Send` so a reader can be moved into a worker thread.
pub trait Repository: Send {
    /// Name of the checked-out branch
    ///
    /// Returns [`ReleaseError::DetachedHead`](crate::error::ReleaseError::DetachedHead)
    /// when HEAD does not point at a branch.
    fn current_branch(&self) -> Result<String>;

    /// Commits reachable from HEAD, newest first, and every tag peeled to the
    /// commit it points at.
    ///
    /// When `include_paths` is set each commit carries the paths it changed
    /// relative to its first parent. An unborn HEAD yields an empty history.
    fn history(&self, include_paths: bool) -> Result<History>;
}
