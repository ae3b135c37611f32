use crate::domain::{BaselineTag, ParsedCommit, ReleaseRuleTable, SemanticVersion, VersionBump};
use crate::error::Result;
use crate::git::CommitInfo;
use tracing::{debug, trace};

/// A commit that moved the version, and by how much
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedBump {
    pub commit: ParsedCommit,
    pub author: String,
    pub bump: VersionBump,
}

/// Result of replaying history on top of a baseline
#[derive(Debug, Clone, PartialEq)]
pub struct Derivation {
    pub version: SemanticVersion,
    /// Whether any commit triggered a bump
    pub released: bool,
    /// Number of commits replayed, conventional or not
    pub commit_count: usize,
    pub applied: Vec<AppliedBump>,
}

/// Replays commits through the release rules to derive the next version
pub struct VersionAnalyzer {
    rules: ReleaseRuleTable,
}

impl VersionAnalyzer {
    /// Create a new version analyzer
    pub fn new(rules: ReleaseRuleTable) -> Self {
        VersionAnalyzer { rules }
    }

    /// Bump a single commit message triggers, if any.
    ///
    /// Breaking commits are always major, whatever the rule table says.
    pub fn bump_for(&self, commit: &ParsedCommit) -> Option<VersionBump> {
        if commit.breaking {
            Some(VersionBump::Major)
        } else {
            self.rules.lookup(commit.commit_type)
        }
    }

    /// Replay `commits` (oldest first) on top of `baseline`.
    ///
    /// Every triggering commit applies its own bump in order, so
    /// `feat!` followed by `fix` from 0.0.0 yields 1.0.1. A failure from the
    /// commit source aborts the derivation, as does a bump that would
    /// overflow a version component.
    pub fn derive<I>(&self, baseline: &BaselineTag, commits: I) -> Result<Derivation>
    where
        I: IntoIterator<Item = Result<CommitInfo>>,
    {
        let mut version = baseline.version.clone();
        let mut applied = Vec::new();
        let mut commit_count = 0;

        for commit in commits {
            let commit = commit?;
            commit_count += 1;

            let Some(parsed) = ParsedCommit::classify(&commit.message, commit.hash) else {
                trace!("skipping non-conventional commit");
                continue;
            };

            let Some(bump) = self.bump_for(&parsed) else {
                trace!(commit = parsed.short_hash(), kind = %parsed.commit_type, "no release rule");
                continue;
            };

            version.bump(bump)?;
            debug!(
                commit = parsed.short_hash(),
                bump = %bump,
                version = %version,
                "applied bump"
            );
            applied.push(AppliedBump {
                commit: parsed,
                author: commit.author,
                bump,
            });
        }

        Ok(Derivation {
            version,
            released: !applied.is_empty(),
            commit_count,
            applied,
        })
    }

    /// Derive from plain messages, for callers without commit hashes
    pub fn derive_messages<S: AsRef<str>>(
        &self,
        baseline: &BaselineTag,
        messages: &[S],
    ) -> Result<Derivation> {
        self.derive(
            baseline,
            messages
                .iter()
                .enumerate()
                .map(|(i, message)| Ok(CommitInfo::new(i.to_string(), message.as_ref(), ""))),
        )
    }
}

impl Default for VersionAnalyzer {
    fn default() -> Self {
        VersionAnalyzer::new(ReleaseRuleTable::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CommitType, ReleaseRule, RepositoryTag};
    use crate::error::AutotagError;
    use rstest::rstest;

    fn zero() -> BaselineTag {
        BaselineTag::synthetic("head")
    }

    fn derive(messages: &[&str]) -> Derivation {
        VersionAnalyzer::default()
            .derive_messages(&zero(), messages)
            .unwrap()
    }

    #[test]
    fn test_empty_history_keeps_baseline() {
        let baseline = BaselineTag::from_tag(
            RepositoryTag::new("v1.4.2", "abc", None),
            SemanticVersion::new(1, 4, 2),
        );
        let derivation = VersionAnalyzer::default()
            .derive(&baseline, Vec::new())
            .unwrap();

        assert_eq!(derivation.version, SemanticVersion::new(1, 4, 2));
        assert!(!derivation.released);
        assert_eq!(derivation.commit_count, 0);
    }

    #[rstest]
    #[case::fix(&["fix: a"], "0.0.1")]
    #[case::feat(&["feat: a"], "0.1.0")]
    #[case::perf(&["perf: a"], "0.1.0")]
    #[case::breaking_then_fix(&["feat!: a", "fix: b"], "1.0.1")]
    #[case::each_bump_applies(&["fix: a", "fix: b", "feat: c", "fix: d"], "0.1.1")]
    #[case::footer_breaking(&["fix: a\n\nBREAKING CHANGE: renamed"], "1.0.0")]
    #[case::breaking_beats_unreleased_type(&["docs!: drop old guide"], "1.0.0")]
    fn test_derivation_sequences(#[case] messages: &[&str], #[case] expected: &str) {
        let derivation = derive(messages);
        assert_eq!(derivation.version.render(), expected);
        assert!(derivation.released);
    }

    #[rstest]
    #[case::chore_with_scope(&["chore(docs): typo fix"])]
    #[case::unreleased_types(&["docs: readme", "style: fmt", "test: more"])]
    #[case::not_conventional(&["Merge branch 'main'", "feature: unknown type", "WIP"])]
    fn test_no_release(#[case] messages: &[&str]) {
        let derivation = derive(messages);
        assert!(derivation.version.is_zero());
        assert!(!derivation.released);
        assert_eq!(derivation.commit_count, messages.len());
        assert!(derivation.applied.is_empty());
    }

    #[test]
    fn test_bumps_from_prerelease_baseline_clear_labels() {
        let baseline = BaselineTag::from_tag(
            RepositoryTag::new("v2.0.0-rc.1", "abc", None),
            SemanticVersion::parse("2.0.0-rc.1").unwrap(),
        );
        let derivation = VersionAnalyzer::default()
            .derive_messages(&baseline, &["fix: regression"])
            .unwrap();
        assert_eq!(derivation.version.render(), "2.0.1");
        assert!(!derivation.version.is_prerelease());
        // The baseline is never mutated
        assert_eq!(baseline.version.render(), "2.0.0-rc.1");
    }

    #[test]
    fn test_custom_rules() {
        let rules = ReleaseRuleTable::new(vec![ReleaseRule::new(
            CommitType::Docs,
            VersionBump::Patch,
        )])
        .unwrap();
        let derivation = VersionAnalyzer::new(rules)
            .derive_messages(&zero(), &["feat: ignored", "docs: counted"])
            .unwrap();
        assert_eq!(derivation.version.render(), "0.0.1");
        assert_eq!(derivation.applied.len(), 1);
        assert_eq!(derivation.applied[0].commit.commit_type, CommitType::Docs);
    }

    #[test]
    fn test_applied_records_order_and_magnitude() {
        let derivation = derive(&["feat(api)!: new endpoint", "chore: bump", "fix: edge"]);
        let bumps: Vec<_> = derivation.applied.iter().map(|a| a.bump).collect();
        assert_eq!(bumps, vec![VersionBump::Major, VersionBump::Patch]);
        assert_eq!(derivation.applied[0].commit.scope.as_deref(), Some("api"));
        assert_eq!(derivation.commit_count, 3);
    }

    #[test]
    fn test_bump_overflow_aborts() {
        let baseline = BaselineTag::from_tag(
            RepositoryTag::new("v18446744073709551615.0.0", "abc", None),
            SemanticVersion::parse("18446744073709551615.0.0").unwrap(),
        );
        let result = VersionAnalyzer::default().derive_messages(&baseline, &["feat!: x"]);
        assert!(matches!(result, Err(AutotagError::Version(_))));

        // Minor bumps on the same baseline are still fine
        let derivation = VersionAnalyzer::default()
            .derive_messages(&baseline, &["feat: y"])
            .unwrap();
        assert_eq!(derivation.version.render(), "18446744073709551615.1.0");
    }

    #[test]
    fn test_applied_records_author() {
        let commits = vec![Ok(CommitInfo::new("a", "fix: one", "Jane Doe"))];
        let derivation = VersionAnalyzer::default().derive(&zero(), commits).unwrap();
        assert_eq!(derivation.applied[0].author, "Jane Doe");
    }

    #[test]
    fn test_stream_failure_aborts() {
        let commits = vec![
            Ok(CommitInfo::new("a", "feat: one", "me")),
            Err(AutotagError::tag("walk failed")),
            Ok(CommitInfo::new("c", "fix: never seen", "me")),
        ];
        let result = VersionAnalyzer::default().derive(&zero(), commits);
        assert!(matches!(result, Err(AutotagError::Tag(_))));
    }
}
