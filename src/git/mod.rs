//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the repository access
//! the release engine needs, so the engine can run against a real repository
//! or an in-memory one in tests.
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: A mock implementation for testing
//!
//! ```rust,no_run
//! # use git_autotag::git::{Git2Repository, Repository};
//! # fn example() -> git_autotag::Result<()> {
//! let repo = Git2Repository::open(".")?;
//! for commit in repo.commits_since(None)? {
//!     let commit = commit?;
//!     println!("{}: {}", commit.hash, commit.message);
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::config::TaggerIdentity;
use crate::domain::RepositoryTag;
use crate::error::Result;

/// Commit information for analysis
#[derive(Debug, Clone, PartialEq)]
pub struct CommitInfo {
    /// The full commit hash
    pub hash: String,
    /// The full commit message, body included
    pub message: String,
    /// The commit author
    pub author: String,
}

impl CommitInfo {
    pub fn new(hash: impl Into<String>, message: impl Into<String>, author: impl Into<String>) -> Self {
        CommitInfo {
            hash: hash.into(),
            message: message.into(),
            author: author.into(),
        }
    }
}

/// Lazily produced commit history, oldest first.
///
/// Each item is fallible so that a failure part-way through the walk reaches
/// the consumer instead of silently truncating history.
pub type CommitStream<'a> = Box<dyn Iterator<Item = Result<CommitInfo>> + 'a>;

/// Repository access used by the release workflow
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Implementations map
/// underlying errors (like `git2::Error`) to [crate::error::AutotagError]
/// variants and never retry.
pub trait Repository {
    /// Hash of the commit HEAD points to
    fn head_hash(&self) -> Result<String>;

    /// All tags with the commit they point to; no ordering is guaranteed
    fn list_tags(&self) -> Result<Vec<RepositoryTag>>;

    /// Commits reachable from HEAD but not from `cutoff`, oldest first.
    ///
    /// With no cutoff the whole history reachable from HEAD is returned.
    fn commits_since(&self, cutoff: Option<&str>) -> Result<CommitStream<'_>>;

    /// Create an annotated tag pointing at `target` (a commit hash)
    fn create_tag(
        &self,
        name: &str,
        target: &str,
        message: &str,
        tagger: &TaggerIdentity,
    ) -> Result<()>;

    /// Push a single tag to the named remote
    fn push_tag(&self, remote: &str, name: &str) -> Result<()>;
}
