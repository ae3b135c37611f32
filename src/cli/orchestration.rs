//! Main workflow orchestration logic
//!
//! Ties the analysis engine to a repository: find the baseline tag, replay the
//! commits made since, and tag HEAD when something releasable happened. Kept
//! apart from `main.rs` so it can run against any [`Repository`] without clap.

use crate::analyzer::{AppliedBump, TagScanner, VersionAnalyzer};
use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::domain::SemanticVersion;
use crate::error::Result;
use crate::git::Repository;
use tracing::{debug, info};

/// Arguments for the release workflow
///
/// Mirrors the CLI flags that act on a run rather than on configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReleaseWorkflowArgs {
    /// Compute everything but create and push nothing
    pub dry_run: bool,

    /// Push the new tag even if the configuration does not ask for it
    pub push: bool,

    /// Remote overriding the configured one
    pub remote: Option<String>,
}

/// Outcome of a release workflow run
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    /// Tag the version was derived from; `None` when starting from 0.0.0
    pub previous_tag: Option<String>,

    /// Version after replaying history
    pub version: SemanticVersion,

    /// Name of the new tag, set only when a release is due
    pub tag: Option<String>,

    pub released: bool,
    pub created: bool,
    pub pushed: bool,

    /// Commits replayed since the baseline
    pub commit_count: usize,

    /// Commits that moved the version, oldest first
    pub applied: Vec<AppliedBump>,

    pub warnings: Vec<BoundaryWarning>,
}

/// Main release workflow
///
/// 1. Validate release rules and tag pattern (nothing is read before this)
/// 2. Select the baseline among the repository's tags
/// 3. Replay commits since the baseline to derive the next version
/// 4. Create an annotated tag on HEAD, then push it when requested
///
/// Any collaborator failure aborts the run; no tag is created from a
/// partial history.
pub fn run_release_workflow<R: Repository>(
    repo: &R,
    config: &Config,
    args: &ReleaseWorkflowArgs,
) -> Result<WorkflowResult> {
    let rules = config.release_rule_table()?;
    let pattern = config.tag_pattern()?;

    let scanner = TagScanner::new(pattern);
    let (baseline, mut warnings) = scanner.find_baseline(repo.list_tags()?, || repo.head_hash())?;
    info!(
        tag = baseline.tag_name.as_deref().unwrap_or("<none>"),
        version = %baseline.version,
        "baseline"
    );

    let analyzer = VersionAnalyzer::new(rules);
    let derivation = analyzer.derive(&baseline, repo.commits_since(baseline.history_cutoff())?)?;

    if derivation.commit_count == 0 {
        if let Some(tag) = &baseline.tag_name {
            warnings.push(BoundaryWarning::NoNewCommits {
                latest_tag: tag.clone(),
                current_commit_hash: repo.head_hash()?,
            });
        }
    } else if !derivation.released {
        warnings.push(BoundaryWarning::NoReleasableCommits {
            commit_count: derivation.commit_count,
        });
    }

    let mut result = WorkflowResult {
        previous_tag: baseline.tag_name.clone(),
        version: derivation.version,
        tag: None,
        released: derivation.released,
        created: false,
        pushed: false,
        commit_count: derivation.commit_count,
        applied: derivation.applied,
        warnings,
    };

    if !result.released {
        debug!("nothing to release");
        return Ok(result);
    }

    let tag = scanner.pattern().format(&result.version);
    result.tag = Some(tag.clone());

    if args.dry_run {
        info!(tag = %tag, "dry run, not creating tag");
        return Ok(result);
    }

    let head = repo.head_hash()?;
    repo.create_tag(&tag, &head, &format!("Release {}", tag), &config.tagger)?;
    result.created = true;

    if args.push || config.remote.push {
        let remote = args.remote.as_deref().unwrap_or(&config.remote.name);
        repo.push_tag(remote, &tag)?;
        result.pushed = true;
    }

    Ok(result)
}
