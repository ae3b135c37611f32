use crate::domain::{ReleaseRuleTable, TagPattern};
use crate::error::{AutotagError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "autotag.toml";
/// File name looked up in the user config directory
pub const USER_CONFIG_FILE: &str = ".autotag.toml";

/// Represents the complete configuration for git-autotag.
///
/// Contains the tag naming pattern, release rules, tagger identity and remote settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_tag_pattern")]
    pub tag_pattern: String,

    #[serde(default = "default_release_rules")]
    pub release_rules: Vec<ReleaseRuleConfig>,

    #[serde(default)]
    pub tagger: TaggerIdentity,

    #[serde(default)]
    pub remote: RemoteConfig,
}

/// One `[[release_rules]]` entry, kept as raw strings until validated
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseRuleConfig {
    #[serde(rename = "type")]
    pub commit_type: String,
    pub release: String,
}

impl ReleaseRuleConfig {
    pub fn new(commit_type: impl Into<String>, release: impl Into<String>) -> Self {
        ReleaseRuleConfig {
            commit_type: commit_type.into(),
            release: release.into(),
        }
    }
}

/// Identity recorded as the tagger of annotated tags
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct TaggerIdentity {
    #[serde(default = "default_tagger_name")]
    pub name: String,
    #[serde(default = "default_tagger_email")]
    pub email: String,
}

/// Where and whether new tags are pushed
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    #[serde(default = "default_remote_name")]
    pub name: String,
    #[serde(default)]
    pub push: bool,
}

fn default_tag_pattern() -> String {
    "v{version}".to_string()
}

/// feat -> minor, perf -> minor, fix -> patch
fn default_release_rules() -> Vec<ReleaseRuleConfig> {
    vec![
        ReleaseRuleConfig::new("feat", "minor"),
        ReleaseRuleConfig::new("perf", "minor"),
        ReleaseRuleConfig::new("fix", "patch"),
    ]
}

fn default_tagger_name() -> String {
    "git-autotag".to_string()
}

fn default_tagger_email() -> String {
    "git-autotag@localhost".to_string()
}

fn default_remote_name() -> String {
    "origin".to_string()
}

impl Default for TaggerIdentity {
    fn default() -> Self {
        TaggerIdentity {
            name: default_tagger_name(),
            email: default_tagger_email(),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig {
            name: default_remote_name(),
            push: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tag_pattern: default_tag_pattern(),
            release_rules: default_release_rules(),
            tagger: TaggerIdentity::default(),
            remote: RemoteConfig::default(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| AutotagError::config(format!("invalid TOML: {}", e)))
    }

    /// Validate the configured release rules into a lookup table
    pub fn release_rule_table(&self) -> Result<ReleaseRuleTable> {
        ReleaseRuleTable::build(
            self.release_rules
                .iter()
                .map(|rule| (&rule.commit_type, &rule.release)),
        )
    }

    /// Validate the configured tag naming pattern
    pub fn tag_pattern(&self) -> Result<TagPattern> {
        TagPattern::new(&self.tag_pattern)
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `autotag.toml` in current directory
/// 3. `.autotag.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let path = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => discover_config_file(),
    };

    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading configuration");
            let text = fs::read_to_string(&path).map_err(|e| {
                AutotagError::config(format!("cannot read {}: {}", path.display(), e))
            })?;
            Config::from_toml(&text)
        }
        None => {
            debug!("no configuration file found, using defaults");
            Ok(Config::default())
        }
    }
}

fn discover_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join(USER_CONFIG_FILE))
        .filter(|path| path.exists())
}
