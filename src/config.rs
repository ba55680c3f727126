use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::conventional::SectionMap;
use crate::error::{Result, SinceError};

/// File name looked up in the repository root
pub const CONFIG_FILE_NAME: &str = "since.toml";

/// Represents the complete configuration for since.
///
/// Contains the required branch, commit exclusion patterns, release hooks and
/// changelog section mapping.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    /// Branch releases must be made from, if any
    #[serde(default)]
    pub require_branch: Option<String>,

    /// Regexes matched against full commit messages; matching commits are left out
    #[serde(default)]
    pub ignore: Vec<String>,

    #[serde(default)]
    pub before: Vec<HookCommand>,

    #[serde(default)]
    pub after: Vec<HookCommand>,

    #[serde(default)]
    pub changelog: ChangelogConfig,
}

/// A command run before or after a release
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct HookCommand {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl HookCommand {
    /// Command line as shown in logs and errors
    pub fn display(&self) -> String {
        if self.args.is_empty() {
            self.command.clone()
        } else {
            format!("{} {}", self.command, self.args.join(" "))
        }
    }
}

/// Changelog rendering options.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ChangelogConfig {
    /// Section name to the commit types it collects; empty means the built-in table
    #[serde(default)]
    pub sections: BTreeMap<String, Vec<String>>,
}

impl ChangelogConfig {
    pub fn section_map(&self) -> SectionMap {
        if self.sections.is_empty() {
            SectionMap::default()
        } else {
            SectionMap::new(self.sections.clone())
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Explicit path provided as parameter
/// 2. `since.toml` in the repository directory
/// 3. `since/config.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to a configuration file; it must exist
/// * `repo_dir` - Repository directory searched for `since.toml`
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err(SinceError::Config)` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>, repo_dir: &Path) -> Result<Config> {
    let path = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => find_config_file(repo_dir),
    };

    let Some(path) = path else {
        trace!("no config file found, using defaults");
        return Ok(Config::default());
    };

    let config_str = fs::read_to_string(&path).map_err(|e| {
        SinceError::config(format!("cannot read {}: {}", path.display(), e))
    })?;
    let config: Config = toml::from_str(&config_str).map_err(|e| {
        SinceError::config(format!("cannot parse {}: {}", path.display(), e))
    })?;

    debug!(file = %path.display(), "loaded config");
    Ok(config)
}

fn find_config_file(repo_dir: &Path) -> Option<PathBuf> {
    let local = repo_dir.join(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }

    let user = dirs::config_dir()?.join("since").join("config.toml");
    user.exists().then_some(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.require_branch.is_none());
        assert!(config.ignore.is_empty());
        assert!(config.before.is_empty());
        assert_eq!(config.changelog.section_map(), SectionMap::default());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
require_branch = "main"
ignore = ["^Merge branch", "\\[skip changelog\\]"]

[[before]]
command = "make"
args = ["check"]

[[after]]
command = "./publish.sh"

[changelog.sections]
Features = ["feat"]
Fixes = ["fix", "perf"]
"#;
        let config: Config = toml::from_str(toml_str).unwrap();

        assert_eq!(config.require_branch.as_deref(), Some("main"));
        assert_eq!(config.ignore.len(), 2);
        assert_eq!(config.before[0].display(), "make check");
        assert_eq!(config.after[0].display(), "./publish.sh");

        let sections = config.changelog.section_map();
        assert_eq!(sections.section_for("perf"), "Fixes");
        assert_eq!(sections.section_for("docs"), "Other");
    }

    #[test]
    fn test_load_from_repo_dir() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE_NAME), "ignore = [\"wip\"]\n").unwrap();

        let config = load_config(None, temp.path()).unwrap();
        assert_eq!(config.ignore, vec!["wip".to_string()]);
    }

    #[test]
    fn test_load_explicit_path_wins() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE_NAME), "ignore = [\"wip\"]\n").unwrap();
        let explicit = temp.path().join("custom.toml");
        fs::write(&explicit, "require_branch = \"release\"\n").unwrap();

        let config = load_config(Some(&explicit), temp.path()).unwrap();
        assert_eq!(config.require_branch.as_deref(), Some("release"));
        assert!(config.ignore.is_empty());
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let temp = TempDir::new().unwrap();
        let err = load_config(Some(&temp.path().join("nope.toml")), temp.path()).unwrap_err();
        assert!(matches!(err, SinceError::Config(_)));
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE_NAME), "ignore = [").unwrap();

        let err = load_config(None, temp.path()).unwrap_err();
        assert!(err.to_string().starts_with("Configuration error"));
    }
}
