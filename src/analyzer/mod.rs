//! Analysis engine: locating the baseline tag and deriving the next version from commits

pub mod tag_scanner;
pub mod version_analyzer;

pub use tag_scanner::{ScanReport, TagScanner};
pub use version_analyzer::{AppliedBump, Derivation, VersionAnalyzer};
