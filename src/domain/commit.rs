use crate::domain::rules::CommitType;
use regex::Regex;
use std::sync::OnceLock;

/// Longest description kept before truncation
pub const SHORT_DESCRIPTION_LIMIT: usize = 50;

const BREAKING_CHANGE_TOKEN: &str = "BREAKING CHANGE";

/// `<type>[(<scope>)][!]: <description>` on the first line
static HEADER_REGEX: OnceLock<Regex> = OnceLock::new();

fn header_regex() -> &'static Regex {
    HEADER_REGEX.get_or_init(|| {
        Regex::new(
            r"^(?P<type>[a-z]+)(?:\((?P<scope>[^()\r\n]+)\))?(?P<breaking>!)?: (?P<description>[^\r\n]*)",
        )
        .expect("commit header pattern is valid")
    })
}

/// Parsed representation of a conventional commit message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommit {
    pub commit_type: CommitType,
    pub scope: Option<String>,
    pub breaking: bool,
    pub short_description: String,
    pub hash: String,
}

impl ParsedCommit {
    /// Classify a commit message.
    ///
    /// Returns `None` when the message is not a conventional commit: the header
    /// does not match the grammar, the type is outside the known vocabulary, or
    /// the description is blank.
    ///
    /// Supports formats:
    /// - type(scope)!: description
    /// - type(scope): description
    /// - type!: description
    /// - type: description
    ///
    /// A commit is breaking when `!` precedes the colon or when the literal
    /// `BREAKING CHANGE` appears anywhere in the message.
    pub fn classify(message: &str, hash: impl Into<String>) -> Option<Self> {
        let captures = header_regex().captures(message)?;

        let commit_type = CommitType::from_keyword(captures.name("type")?.as_str())?;
        let description = captures.name("description")?.as_str().trim();
        if description.is_empty() {
            return None;
        }

        let scope = captures.name("scope").map(|m| m.as_str().to_string());
        let breaking =
            captures.name("breaking").is_some() || message.contains(BREAKING_CHANGE_TOKEN);

        Some(ParsedCommit {
            commit_type,
            scope,
            breaking,
            short_description: shorten(description),
            hash: hash.into(),
        })
    }

    /// First seven characters of the commit hash
    pub fn short_hash(&self) -> &str {
        match self.hash.char_indices().nth(7) {
            Some((idx, _)) => &self.hash[..idx],
            None => &self.hash,
        }
    }
}

fn shorten(description: &str) -> String {
    match description.char_indices().nth(SHORT_DESCRIPTION_LIMIT) {
        Some((idx, _)) => format!("{}...", &description[..idx]),
        None => description.to_string(),
    }
}
