use std::fmt;

/// Non-fatal conditions met while deriving a release.
/// They never stop the run but should be reported to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// No tag in the repository parses as a version; history starts from 0.0.0
    NoVersionTag { current_commit_hash: String },
    /// No new commits since the latest tag
    NoNewCommits {
        latest_tag: String,
        current_commit_hash: String,
    },
    /// Commits exist but none of them triggers a release
    NoReleasableCommits { commit_count: usize },
    /// Tag looks like a version under the pattern but cannot be parsed
    UnparsableTag { tag: String, reason: String },
}

fn short_hash(hash: &str) -> &str {
    match hash.char_indices().nth(7) {
        Some((idx, _)) => &hash[..idx],
        None => hash,
    }
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoVersionTag {
                current_commit_hash,
            } => write!(
                f,
                "No version tag found; starting from 0.0.0 (current: {})",
                short_hash(current_commit_hash)
            ),
            BoundaryWarning::NoNewCommits {
                latest_tag,
                current_commit_hash,
            } => write!(
                f,
                "No new commits since tag '{}' (current: {})",
                latest_tag,
                short_hash(current_commit_hash)
            ),
            BoundaryWarning::NoReleasableCommits { commit_count } => write!(
                f,
                "None of the {} new commit(s) triggers a release",
                commit_count
            ),
            BoundaryWarning::UnparsableTag { tag, reason } => {
                write!(f, "Cannot parse tag '{}': {}", tag, reason)
            }
        }
    }
}
