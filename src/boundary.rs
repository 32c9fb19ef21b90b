use std::fmt;

/// Warnings that occur when reading history near release boundaries.
/// These are non-fatal issues that should be reported to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// No new commits since the latest release tag
    NoNewCommits {
        latest_tag: String,
        current_commit_hash: String,
    },
    /// Tag looks like a release but cannot be parsed under the current tag format
    UnparsableTag { tag: String, reason: String },
    /// Commit message the active grammar could not classify
    UnclassifiedCommit { commit_hash: String, reason: String },
    /// No release tag is reachable; the first release will be computed
    NoPreviousRelease { tag_format: String },
}

fn short_hash(hash: &str) -> &str {
    hash.get(..7).unwrap_or(hash)
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoNewCommits {
                latest_tag,
                current_commit_hash,
            } => {
                write!(
                    f,
                    "No new commits since tag '{}' (current: {})",
                    latest_tag,
                    short_hash(current_commit_hash)
                )
            }
            BoundaryWarning::UnparsableTag { tag, reason } => {
                write!(f, "Cannot parse tag '{}': {}", tag, reason)
            }
            BoundaryWarning::UnclassifiedCommit {
                commit_hash,
                reason,
            } => {
                write!(
                    f,
                    "Skipping commit {}: {}",
                    short_hash(commit_hash),
                    reason
                )
            }
            BoundaryWarning::NoPreviousRelease { tag_format } => {
                write!(
                    f,
                    "No tag matching '{}' found; computing the first release",
                    tag_format
                )
            }
        }
    }
}
