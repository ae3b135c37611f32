use crate::boundary::BoundaryWarning;
use crate::domain::{BaselineTag, RepositoryTag, SemanticVersion, TagPattern};
use crate::error::Result;
use std::cmp::Ordering;
use tracing::{debug, trace};

/// Outcome of scanning a tag set
#[derive(Debug, Clone, PartialEq)]
pub struct ScanReport {
    /// Highest version tag, if any tag parsed
    pub best: Option<BaselineTag>,
    /// Tags that looked like versions but failed to parse
    pub warnings: Vec<BoundaryWarning>,
}

/// Locates the current version among a repository's tags
pub struct TagScanner {
    pattern: TagPattern,
}

impl TagScanner {
    pub fn new(pattern: TagPattern) -> Self {
        TagScanner { pattern }
    }

    pub fn pattern(&self) -> &TagPattern {
        &self.pattern
    }

    /// Pick the highest-precedence version tag.
    ///
    /// Tags that do not parse are skipped. On equal precedence the tag with
    /// the later tagger timestamp wins, then the one seen first.
    pub fn scan<I>(&self, tags: I) -> ScanReport
    where
        I: IntoIterator<Item = RepositoryTag>,
    {
        let mut best: Option<(SemanticVersion, RepositoryTag)> = None;
        let mut warnings = Vec::new();

        for tag in tags {
            let version = match self.pattern.parse_version(&tag.name) {
                Ok(version) => version,
                Err(e) => {
                    if self.pattern.looks_like_version(&tag.name) {
                        warnings.push(BoundaryWarning::UnparsableTag {
                            tag: tag.name.clone(),
                            reason: e.to_string(),
                        });
                    } else {
                        trace!(tag = %tag.name, "ignoring non-version tag");
                    }
                    continue;
                }
            };

            let replace = match &best {
                None => true,
                Some((current, current_tag)) => {
                    outranks(&version, &tag, current, current_tag) == Ordering::Greater
                }
            };
            if replace {
                best = Some((version, tag));
            }
        }

        if let Some((version, tag)) = &best {
            debug!(tag = %tag.name, version = %version, "selected baseline tag");
        }

        ScanReport {
            best: best.map(|(version, tag)| BaselineTag::from_tag(tag, version)),
            warnings,
        }
    }

    /// Baseline for the release, falling back to `0.0.0` at HEAD when no
    /// version tag exists. `head` is only resolved in that case.
    pub fn find_baseline<I, F>(&self, tags: I, head: F) -> Result<(BaselineTag, Vec<BoundaryWarning>)>
    where
        I: IntoIterator<Item = RepositoryTag>,
        F: FnOnce() -> Result<String>,
    {
        let ScanReport { best, mut warnings } = self.scan(tags);

        let baseline = match best {
            Some(baseline) => baseline,
            None => {
                let head_hash = head()?;
                warnings.push(BoundaryWarning::NoVersionTag {
                    current_commit_hash: head_hash.clone(),
                });
                BaselineTag::synthetic(head_hash)
            }
        };

        Ok((baseline, warnings))
    }
}

impl Default for TagScanner {
    fn default() -> Self {
        TagScanner::new(TagPattern::default())
    }
}

/// Version precedence, then later timestamp; a missing timestamp ranks lowest
fn outranks(
    version: &SemanticVersion,
    tag: &RepositoryTag,
    other_version: &SemanticVersion,
    other_tag: &RepositoryTag,
) -> Ordering {
    version
        .compare(other_version)
        .then_with(|| tag.timestamp.cmp(&other_tag.timestamp))
}
