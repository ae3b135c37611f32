//! Domain logic - pure business rules independent of git operations

pub mod commit;
pub mod rules;
pub mod tag;
pub mod version;

pub use commit::ParsedCommit;
pub use rules::{CommitType, ReleaseRule, ReleaseRuleTable};
pub use tag::{BaselineTag, RepositoryTag, TagPattern};
pub use version::{SemanticVersion, VersionBump};
