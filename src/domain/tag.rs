use crate::domain::version::SemanticVersion;
use crate::error::{AutotagError, Result};

const VERSION_PLACEHOLDER: &str = "{version}";

/// A tag as reported by the repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryTag {
    pub name: String,
    /// Hash of the commit the tag ultimately points to
    pub commit_hash: String,
    /// Tagger time in seconds since the epoch (annotated tags only)
    pub timestamp: Option<i64>,
}

impl RepositoryTag {
    pub fn new(name: impl Into<String>, commit_hash: impl Into<String>, timestamp: Option<i64>) -> Self {
        RepositoryTag {
            name: name.into(),
            commit_hash: commit_hash.into(),
            timestamp,
        }
    }
}

/// The version history is replayed from.
///
/// Either an existing version tag, or a synthetic `0.0.0` anchored at HEAD
/// when the repository has no version tag yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaselineTag {
    pub version: SemanticVersion,
    pub commit_hash: String,
    pub timestamp: Option<i64>,
    /// `None` for the synthetic baseline
    pub tag_name: Option<String>,
}

impl BaselineTag {
    pub fn from_tag(tag: RepositoryTag, version: SemanticVersion) -> Self {
        BaselineTag {
            version,
            commit_hash: tag.commit_hash,
            timestamp: tag.timestamp,
            tag_name: Some(tag.name),
        }
    }

    /// `0.0.0` at the given HEAD commit
    pub fn synthetic(head_hash: impl Into<String>) -> Self {
        BaselineTag {
            version: SemanticVersion::zero(),
            commit_hash: head_hash.into(),
            timestamp: None,
            tag_name: None,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        self.tag_name.is_none()
    }

    /// Commit whose ancestors are excluded from history; `None` means the whole history
    pub fn history_cutoff(&self) -> Option<&str> {
        if self.is_synthetic() {
            None
        } else {
            Some(&self.commit_hash)
        }
    }
}

/// Tag naming pattern (e.g., "v{version}", "release-{version}")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPattern {
    prefix: String,
    suffix: String,
}

impl TagPattern {
    /// Create a tag pattern; it must contain exactly one `{version}` placeholder
    pub fn new(pattern: &str) -> Result<Self> {
        let mut parts = pattern.split(VERSION_PLACEHOLDER);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(prefix), Some(suffix), None) => Ok(TagPattern {
                prefix: prefix.to_string(),
                suffix: suffix.to_string(),
            }),
            _ => Err(AutotagError::config(format!(
                "tag pattern '{}' must contain exactly one {} placeholder",
                pattern, VERSION_PLACEHOLDER
            ))),
        }
    }

    /// Format a version according to pattern
    /// Example: pattern="v{version}", version="1.2.3" -> "v1.2.3"
    pub fn format(&self, version: &SemanticVersion) -> String {
        format!("{}{}{}", self.prefix, version.render(), self.suffix)
    }

    /// Candidate version text inside a tag name.
    ///
    /// Names that do not carry the pattern's prefix and suffix are returned
    /// unchanged, so bare `1.2.3` tags are still recognised.
    pub fn version_part<'a>(&self, tag_name: &'a str) -> &'a str {
        tag_name
            .strip_prefix(self.prefix.as_str())
            .and_then(|rest| rest.strip_suffix(self.suffix.as_str()))
            .filter(|inner| !inner.is_empty())
            .unwrap_or(tag_name)
    }

    /// Parse the version a tag name denotes under this pattern
    pub fn parse_version(&self, tag_name: &str) -> Result<SemanticVersion> {
        SemanticVersion::parse(self.version_part(tag_name))
    }

    /// Whether a tag name looks like it was meant to be a version under this pattern
    pub fn looks_like_version(&self, tag_name: &str) -> bool {
        self.version_part(tag_name)
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit())
    }
}

impl Default for TagPattern {
    fn default() -> Self {
        TagPattern {
            prefix: "v".to_string(),
            suffix: String::new(),
        }
    }
}

impl std::fmt::Display for TagPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.prefix, VERSION_PLACEHOLDER, self.suffix)
    }
}
