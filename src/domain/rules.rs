use crate::domain::version::VersionBump;
use crate::error::{AutotagError, Result};
use std::fmt;
use std::str::FromStr;

/// Commit type keywords recognised by the conventional commit grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommitType {
    Build,
    Chore,
    Ci,
    Docs,
    Feat,
    Fix,
    Perf,
    Refactor,
    Revert,
    Style,
    Test,
}

impl CommitType {
    pub const ALL: [CommitType; 11] = [
        CommitType::Build,
        CommitType::Chore,
        CommitType::Ci,
        CommitType::Docs,
        CommitType::Feat,
        CommitType::Fix,
        CommitType::Perf,
        CommitType::Refactor,
        CommitType::Revert,
        CommitType::Style,
        CommitType::Test,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommitType::Build => "build",
            CommitType::Chore => "chore",
            CommitType::Ci => "ci",
            CommitType::Docs => "docs",
            CommitType::Feat => "feat",
            CommitType::Fix => "fix",
            CommitType::Perf => "perf",
            CommitType::Refactor => "refactor",
            CommitType::Revert => "revert",
            CommitType::Style => "style",
            CommitType::Test => "test",
        }
    }

    /// Look up a keyword; matching is exact and case-sensitive
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == keyword)
    }
}

impl FromStr for CommitType {
    type Err = AutotagError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_keyword(s).ok_or_else(|| {
            AutotagError::config(format!("unknown commit type '{}' in release rules", s))
        })
    }
}

impl fmt::Display for CommitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps one commit type to the bump it triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseRule {
    pub commit_type: CommitType,
    pub bump: VersionBump,
}

impl ReleaseRule {
    pub fn new(commit_type: CommitType, bump: VersionBump) -> Self {
        ReleaseRule { commit_type, bump }
    }
}

/// Validated, ordered set of release rules with at most one rule per commit type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRuleTable {
    rules: Vec<ReleaseRule>,
}

impl ReleaseRuleTable {
    /// Build a table from typed rules, rejecting duplicate commit types
    pub fn new(rules: Vec<ReleaseRule>) -> Result<Self> {
        for (i, rule) in rules.iter().enumerate() {
            if rules[..i].iter().any(|r| r.commit_type == rule.commit_type) {
                return Err(AutotagError::config(format!(
                    "duplicate release rule for commit type '{}'",
                    rule.commit_type
                )));
            }
        }
        Ok(ReleaseRuleTable { rules })
    }

    /// Build a table from raw `(commit type, magnitude)` pairs as found in configuration
    pub fn build<I, T, B>(raw: I) -> Result<Self>
    where
        I: IntoIterator<Item = (T, B)>,
        T: AsRef<str>,
        B: AsRef<str>,
    {
        let rules = raw
            .into_iter()
            .map(|(commit_type, bump)| {
                Ok(ReleaseRule::new(
                    commit_type.as_ref().parse()?,
                    bump.as_ref().parse()?,
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(rules)
    }

    /// Bump triggered by a commit type; `None` means the type does not release
    pub fn lookup(&self, commit_type: CommitType) -> Option<VersionBump> {
        self.rules
            .iter()
            .find(|rule| rule.commit_type == commit_type)
            .map(|rule| rule.bump)
    }

    pub fn rules(&self) -> &[ReleaseRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for ReleaseRuleTable {
    /// feat -> minor, perf -> minor, fix -> patch
    fn default() -> Self {
        ReleaseRuleTable {
            rules: vec![
                ReleaseRule::new(CommitType::Feat, VersionBump::Minor),
                ReleaseRule::new(CommitType::Perf, VersionBump::Minor),
                ReleaseRule::new(CommitType::Fix, VersionBump::Patch),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_commit_type_keywords() {
        for t in CommitType::ALL {
            assert_eq!(CommitType::from_keyword(t.as_str()), Some(t));
        }
        assert_eq!(CommitType::from_keyword("feature"), None);
        assert_eq!(CommitType::from_keyword("Feat"), None);
    }

    #[test]
    fn test_default_table() {
        let table = ReleaseRuleTable::default();
        assert_eq!(table.lookup(CommitType::Feat), Some(VersionBump::Minor));
        assert_eq!(table.lookup(CommitType::Perf), Some(VersionBump::Minor));
        assert_eq!(table.lookup(CommitType::Fix), Some(VersionBump::Patch));
        for t in [CommitType::Chore, CommitType::Docs, CommitType::Refactor, CommitType::Test] {
            assert_eq!(table.lookup(t), None);
        }
    }

    #[test]
    fn test_build_from_raw_pairs() {
        let table =
            ReleaseRuleTable::build([("feat", "major"), ("docs", "patch"), ("revert", "patch")])
                .unwrap();
        assert_eq!(table.rules().len(), 3);
        assert_eq!(table.lookup(CommitType::Feat), Some(VersionBump::Major));
        assert_eq!(table.lookup(CommitType::Docs), Some(VersionBump::Patch));
        assert_eq!(table.lookup(CommitType::Fix), None);
    }

    #[test]
    fn test_build_empty_table() {
        let table = ReleaseRuleTable::build(Vec::<(&str, &str)>::new()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.lookup(CommitType::Feat), None);
    }

    #[rstest]
    #[case(&[("feat", "minor"), ("feat", "patch")], "duplicate")]
    #[case(&[("feature", "minor")], "unknown commit type")]
    #[case(&[("fix", "tiny")], "unknown release magnitude")]
    #[case(&[("fix", "Patch")], "unknown release magnitude")]
    fn test_build_rejects_invalid_rules(#[case] raw: &[(&str, &str)], #[case] expected: &str) {
        let err = ReleaseRuleTable::build(raw.iter().copied()).unwrap_err();
        assert!(err.is_config());
        assert!(
            err.to_string().contains(expected),
            "expected '{}' in '{}'",
            expected,
            err
        );
    }

    #[test]
    fn test_new_rejects_duplicates() {
        let result = ReleaseRuleTable::new(vec![
            ReleaseRule::new(CommitType::Fix, VersionBump::Patch),
            ReleaseRule::new(CommitType::Feat, VersionBump::Minor),
            ReleaseRule::new(CommitType::Fix, VersionBump::Minor),
        ]);
        assert!(result.is_err());
    }
}
