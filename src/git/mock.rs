use crate::config::TaggerIdentity;
use crate::domain::RepositoryTag;
use crate::error::{AutotagError, Result};
use crate::git::{CommitInfo, CommitStream, Repository};
use std::cell::RefCell;

/// An annotated tag created through [`MockRepository`]
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedTag {
    pub name: String,
    pub target: String,
    pub message: String,
    pub tagger: TaggerIdentity,
}

/// Mock repository with a linear history, for testing without actual git operations
#[derive(Default)]
pub struct MockRepository {
    commits: Vec<CommitInfo>,
    tags: Vec<RepositoryTag>,
    head: Option<String>,
    fail_history_after: Option<usize>,
    fail_tag_listing: bool,
    created: RefCell<Vec<CreatedTag>>,
    pushed: RefCell<Vec<(String, String)>>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a commit on top of the history; it becomes HEAD unless one was set
    pub fn add_commit(&mut self, hash: impl Into<String>, message: impl Into<String>) {
        self.commits
            .push(CommitInfo::new(hash, message, "Test Author"));
    }

    /// Add a tag pointing to a commit hash
    pub fn add_tag(&mut self, name: impl Into<String>, commit_hash: impl Into<String>, timestamp: Option<i64>) {
        self.tags
            .push(RepositoryTag::new(name, commit_hash, timestamp));
    }

    /// Pin HEAD to a specific hash
    pub fn set_head(&mut self, hash: impl Into<String>) {
        self.head = Some(hash.into());
    }

    /// Make the history stream fail after yielding `count` commits
    pub fn fail_history_after(&mut self, count: usize) {
        self.fail_history_after = Some(count);
    }

    /// Make tag listing fail
    pub fn fail_tag_listing(&mut self) {
        self.fail_tag_listing = true;
    }

    /// Tags created through [`Repository::create_tag`]
    pub fn created_tags(&self) -> Vec<CreatedTag> {
        self.created.borrow().clone()
    }

    /// `(remote, tag)` pairs pushed through [`Repository::push_tag`]
    pub fn pushed_tags(&self) -> Vec<(String, String)> {
        self.pushed.borrow().clone()
    }
}

impl Repository for MockRepository {
    fn head_hash(&self) -> Result<String> {
        self.head
            .clone()
            .or_else(|| self.commits.last().map(|c| c.hash.clone()))
            .ok_or_else(|| AutotagError::tag("repository has no commits"))
    }

    fn list_tags(&self) -> Result<Vec<RepositoryTag>> {
        if self.fail_tag_listing {
            return Err(AutotagError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "tag listing failed",
            )));
        }
        Ok(self.tags.clone())
    }

    fn commits_since(&self, cutoff: Option<&str>) -> Result<CommitStream<'_>> {
        let start = match cutoff {
            None => 0,
            Some(hash) => {
                self.commits
                    .iter()
                    .position(|c| c.hash == hash)
                    .ok_or_else(|| AutotagError::tag(format!("unknown commit {}", hash)))?
                    + 1
            }
        };

        let fail_after = self.fail_history_after;
        let stream = self.commits[start..]
            .iter()
            .cloned()
            .enumerate()
            .map(move |(i, commit)| match fail_after {
                Some(limit) if i >= limit => Err(AutotagError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "history walk interrupted",
                ))),
                _ => Ok(commit),
            });

        Ok(Box::new(stream))
    }

    fn create_tag(
        &self,
        name: &str,
        target: &str,
        message: &str,
        tagger: &TaggerIdentity,
    ) -> Result<()> {
        let exists = self.tags.iter().any(|t| t.name == name)
            || self.created.borrow().iter().any(|t| t.name == name);
        if exists {
            return Err(AutotagError::tag(format!("tag '{}' already exists", name)));
        }

        self.created.borrow_mut().push(CreatedTag {
            name: name.to_string(),
            target: target.to_string(),
            message: message.to_string(),
            tagger: tagger.clone(),
        });
        Ok(())
    }

    fn push_tag(&self, remote: &str, name: &str) -> Result<()> {
        self.pushed
            .borrow_mut()
            .push((remote.to_string(), name.to_string()));
        Ok(())
    }
}
