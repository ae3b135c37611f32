//! Semantic version value used throughout release derivation.
//!
//! Parsing and prerelease precedence are delegated to the `semver` crate; this
//! type adds the in-place bump operations and a precedence ordering that
//! ignores build metadata (https://semver.org/#spec-item-11).

use crate::error::{AutotagError, Result};
use semver::{BuildMetadata, Prerelease};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Semantic version representation
///
/// `PartialEq`/`Ord` follow SemVer precedence, so two versions that differ only
/// in build metadata compare equal while still rendering differently.
#[derive(Debug, Clone)]
pub struct SemanticVersion {
    inner: semver::Version,
}

impl SemanticVersion {
    /// Create a release version from its three numeric components
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        SemanticVersion {
            inner: semver::Version::new(major, minor, patch),
        }
    }

    /// The `0.0.0` version used when a repository has no release yet
    pub fn zero() -> Self {
        Self::new(0, 0, 0)
    }

    /// Parse `MAJOR.MINOR.PATCH[-PRERELEASE][+METADATA]`.
    ///
    /// No prefix stripping or normalisation happens here: leading zeros in
    /// numeric components and numeric prerelease identifiers are rejected.
    pub fn parse(input: &str) -> Result<Self> {
        semver::Version::parse(input)
            .map(|inner| SemanticVersion { inner })
            .map_err(|e| {
                AutotagError::version(format!("'{}' is not a semantic version: {}", input, e))
            })
    }

    pub fn major(&self) -> u64 {
        self.inner.major
    }

    pub fn minor(&self) -> u64 {
        self.inner.minor
    }

    pub fn patch(&self) -> u64 {
        self.inner.patch
    }

    /// Full prerelease string (e.g. `rc.1`), if any
    pub fn prerelease(&self) -> Option<&str> {
        non_empty(self.inner.pre.as_str())
    }

    /// Prerelease label without its trailing iteration number (`rc.2` -> `rc`)
    pub fn prerelease_label(&self) -> Option<&str> {
        self.prerelease().map(|pre| split_prerelease(pre).0)
    }

    /// Trailing numeric iteration of the prerelease (`rc.2` -> 2)
    pub fn prerelease_number(&self) -> Option<u64> {
        self.prerelease().and_then(|pre| split_prerelease(pre).1)
    }

    pub fn build_metadata(&self) -> Option<&str> {
        non_empty(self.inner.build.as_str())
    }

    pub fn is_prerelease(&self) -> bool {
        !self.inner.pre.is_empty()
    }

    /// True when major, minor and patch are all zero
    pub fn is_zero(&self) -> bool {
        self.inner.major == 0 && self.inner.minor == 0 && self.inner.patch == 0
    }

    /// Apply a bump of the given magnitude in place.
    ///
    /// Fails without touching the version when the bumped component would
    /// overflow.
    pub fn bump(&mut self, bump: VersionBump) -> Result<()> {
        match bump {
            VersionBump::Major => self.bump_major(),
            VersionBump::Minor => self.bump_minor(),
            VersionBump::Patch => self.bump_patch(),
        }
    }

    pub fn bump_major(&mut self) -> Result<()> {
        self.inner.major = self.incremented(self.inner.major, "major")?;
        self.inner.minor = 0;
        self.inner.patch = 0;
        self.clear_labels();
        Ok(())
    }

    pub fn bump_minor(&mut self) -> Result<()> {
        self.inner.minor = self.incremented(self.inner.minor, "minor")?;
        self.inner.patch = 0;
        self.clear_labels();
        Ok(())
    }

    pub fn bump_patch(&mut self) -> Result<()> {
        self.inner.patch = self.incremented(self.inner.patch, "patch")?;
        self.clear_labels();
        Ok(())
    }

    /// SemVer precedence comparison; build metadata is ignored
    pub fn compare(&self, other: &Self) -> Ordering {
        self.inner
            .major
            .cmp(&other.inner.major)
            .then(self.inner.minor.cmp(&other.inner.minor))
            .then(self.inner.patch.cmp(&other.inner.patch))
            .then_with(|| compare_prerelease(&self.inner.pre, &other.inner.pre))
    }

    /// Canonical string form, the inverse of [`SemanticVersion::parse`]
    pub fn render(&self) -> String {
        self.inner.to_string()
    }

    // A release is never a prerelease, and stale metadata would leak into the next tag.
    fn clear_labels(&mut self) {
        self.inner.pre = Prerelease::EMPTY;
        self.inner.build = BuildMetadata::EMPTY;
    }

    fn incremented(&self, component: u64, name: &str) -> Result<u64> {
        component.checked_add(1).ok_or_else(|| {
            AutotagError::version(format!("cannot bump {} of {}: component overflows", name, self))
        })
    }
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

fn split_prerelease(pre: &str) -> (&str, Option<u64>) {
    match pre.rsplit_once('.') {
        Some((label, number)) if !number.is_empty() && number.bytes().all(|b| b.is_ascii_digit()) => {
            (label, number.parse().ok())
        }
        _ => (pre, None),
    }
}

fn compare_prerelease(a: &Prerelease, b: &Prerelease) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.cmp(b),
    }
}

impl Default for SemanticVersion {
    fn default() -> Self {
        Self::zero()
    }
}

impl PartialEq for SemanticVersion {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl Eq for SemanticVersion {}

impl PartialOrd for SemanticVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SemanticVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl FromStr for SemanticVersion {
    type Err = AutotagError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

/// Version bump type decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VersionBump {
    Patch,
    Minor,
    Major,
}

impl VersionBump {
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionBump::Major => "major",
            VersionBump::Minor => "minor",
            VersionBump::Patch => "patch",
        }
    }
}

impl FromStr for VersionBump {
    type Err = AutotagError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "major" => Ok(VersionBump::Major),
            "minor" => Ok(VersionBump::Minor),
            "patch" => Ok(VersionBump::Patch),
            other => Err(AutotagError::config(format!(
                "unknown release magnitude '{}' (expected major, minor or patch)",
                other
            ))),
        }
    }
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn v(s: &str) -> SemanticVersion {
        SemanticVersion::parse(s).unwrap()
    }

    #[test]
    fn test_version_parse() {
        let v = v("1.2.3");
        assert_eq!(v.major(), 1);
        assert_eq!(v.minor(), 2);
        assert_eq!(v.patch(), 3);
        assert_eq!(v.prerelease(), None);
        assert_eq!(v.build_metadata(), None);
    }

    #[test]
    fn test_version_parse_full() {
        let v = v("1.0.0-rc.2+build.7");
        assert_eq!(v.prerelease(), Some("rc.2"));
        assert_eq!(v.prerelease_label(), Some("rc"));
        assert_eq!(v.prerelease_number(), Some(2));
        assert_eq!(v.build_metadata(), Some("build.7"));
    }

    #[test]
    fn test_prerelease_without_number() {
        let v = v("2.0.0-alpha");
        assert_eq!(v.prerelease_label(), Some("alpha"));
        assert_eq!(v.prerelease_number(), None);

        let nested = SemanticVersion::parse("2.0.0-alpha.beta").unwrap();
        assert_eq!(nested.prerelease_label(), Some("alpha.beta"));
        assert_eq!(nested.prerelease_number(), None);
    }

    #[rstest]
    #[case("1.2")]
    #[case("v1.2.3")]
    #[case("1.2.3.4")]
    #[case("01.2.3")]
    #[case("1.02.3")]
    #[case("1.2.3-01")]
    #[case("1.2.3-alpha..1")]
    #[case("1.2.3-")]
    #[case("1.2.3+")]
    #[case("")]
    #[case(" 1.2.3")]
    fn test_version_parse_invalid(#[case] input: &str) {
        assert!(SemanticVersion::parse(input).is_err(), "{input} should be rejected");
    }

    #[test]
    fn test_render_round_trip() {
        for s in ["0.0.0", "1.2.3-0", "1.2.3-alpha.1", "10.20.30+exp.sha.5114f85", "1.0.0-x.7.z.92+meta"] {
            assert_eq!(v(s).render(), s);
        }
    }

    #[test]
    fn test_bump_major_clears_everything_below() {
        let mut v = v("1.2.3-rc.1+abc");
        v.bump_major().unwrap();
        assert_eq!(v.render(), "2.0.0");
        assert_eq!(v.prerelease(), None);
        assert_eq!(v.build_metadata(), None);
    }

    #[test]
    fn test_bump_minor() {
        let mut v = v("1.2.3+abc");
        v.bump_minor().unwrap();
        assert_eq!(v.render(), "1.3.0");
    }

    #[test]
    fn test_bump_patch_keeps_major_minor() {
        let mut v = v("1.2.3-beta.4");
        v.bump_patch().unwrap();
        assert_eq!(v.render(), "1.2.4");
    }

    #[test]
    fn test_bump_dispatch() {
        let mut v = SemanticVersion::zero();
        v.bump(VersionBump::Patch).unwrap();
        v.bump(VersionBump::Minor).unwrap();
        v.bump(VersionBump::Major).unwrap();
        v.bump(VersionBump::Patch).unwrap();
        assert_eq!(v, SemanticVersion::new(1, 0, 1));
    }

    #[rstest]
    #[case("18446744073709551615.0.0", VersionBump::Major)]
    #[case("1.18446744073709551615.0", VersionBump::Minor)]
    #[case("1.2.18446744073709551615-rc.1", VersionBump::Patch)]
    fn test_bump_overflow_is_an_error(#[case] input: &str, #[case] bump: VersionBump) {
        let mut version = v(input);
        let err = version.bump(bump).unwrap_err();
        assert!(matches!(err, AutotagError::Version(_)));
        // Left untouched, labels included
        assert_eq!(version.render(), input);
    }

    #[test]
    fn test_bump_below_overflowing_component() {
        let mut version = v("1.18446744073709551615.3");
        version.bump_major().unwrap();
        assert_eq!(version.render(), "2.0.0");
    }

    #[test]
    fn test_is_zero() {
        assert!(SemanticVersion::zero().is_zero());
        assert!(v("0.0.0-alpha").is_zero());
        assert!(!v("0.0.1").is_zero());
    }

    #[rstest]
    #[case("1.0.0", "2.0.0")]
    #[case("2.0.0", "2.1.0")]
    #[case("2.1.0", "2.1.1")]
    #[case("1.0.0-alpha", "1.0.0")]
    #[case("1.0.0-alpha", "1.0.0-alpha.1")]
    #[case("1.0.0-alpha.1", "1.0.0-alpha.beta")]
    #[case("1.0.0-alpha.beta", "1.0.0-beta")]
    #[case("1.0.0-beta", "1.0.0-beta.2")]
    #[case("1.0.0-beta.2", "1.0.0-beta.11")]
    #[case("1.0.0-beta.11", "1.0.0-rc.1")]
    #[case("1.0.0-rc.1", "1.0.0")]
    #[case("0.9.9", "1.0.0-alpha")]
    fn test_precedence(#[case] lower: &str, #[case] higher: &str) {
        let (a, b) = (v(lower), v(higher));
        assert_eq!(a.compare(&b), Ordering::Less);
        assert_eq!(b.compare(&a), Ordering::Greater);
        assert!(a < b);
    }

    #[test]
    fn test_build_metadata_ignored_in_comparison() {
        let a = v("1.0.0+one");
        let b = v("1.0.0+two");
        assert_eq!(a.compare(&b), Ordering::Equal);
        assert_eq!(a, b);
        assert_ne!(a.render(), b.render());
    }

    #[test]
    fn test_compare_reflexive() {
        for s in ["0.0.0", "1.0.0-rc.1", "3.4.5+meta"] {
            assert_eq!(v(s).compare(&v(s)), Ordering::Equal);
        }
    }

    #[test]
    fn test_sorting_is_total() {
        let mut versions: Vec<SemanticVersion> = [
            "1.0.0", "1.0.0-rc.1", "0.1.0", "1.0.0-alpha", "2.0.0", "1.0.0-alpha.1",
        ]
        .iter()
        .map(|s| v(s))
        .collect();
        versions.sort();
        let rendered: Vec<String> = versions.iter().map(|v| v.render()).collect();
        assert_eq!(
            rendered,
            vec!["0.1.0", "1.0.0-alpha", "1.0.0-alpha.1", "1.0.0-rc.1", "1.0.0", "2.0.0"]
        );
    }

    #[test]
    fn test_version_bump_from_str() {
        assert_eq!("major".parse::<VersionBump>().unwrap(), VersionBump::Major);
        assert_eq!("minor".parse::<VersionBump>().unwrap(), VersionBump::Minor);
        assert_eq!("patch".parse::<VersionBump>().unwrap(), VersionBump::Patch);
        let err = "huge".parse::<VersionBump>().unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_version_display() {
        assert_eq!(SemanticVersion::new(1, 2, 3).to_string(), "1.2.3");
    }
}
