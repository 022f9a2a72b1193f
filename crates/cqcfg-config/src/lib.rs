//! Configuration for the cqcfg scanner
//!
//! Every value has a built-in default matching the CoolQ Go SDK conventions, so a
//! config file is only needed when a plugin vendors the SDK under another import
//! path or uses a different marker token.
//!
//! Lookup order:
//! 1. `CQCFG_CONFIG` environment variable (non-empty)
//! 2. `<target dir>/cqcfg.toml`
//! 3. `~/.config/cqcfg/cqcfg.toml` (platform config dir on Windows)
//! 4. built-in defaults

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Import path of the CoolQ Go SDK package
pub const DEFAULT_SDK_PATH: &str = "github.com/Tnze/CoolQ-Golang-SDK/cqp";
/// Package name the SDK is bound to when imported without a rename
pub const DEFAULT_ALIAS: &str = "cqp";
/// Token following `// ` that marks a metadata comment
pub const DEFAULT_MARKER: &str = "cqp";
/// SDK variable holding the plugin identity
pub const DEFAULT_IDENTITY_FIELD: &str = "AppID";
/// File name of the generated manifest
pub const DEFAULT_MANIFEST_NAME: &str = "app.json";
/// File name looked up in the target directory and the user config dir
pub const CONFIG_FILE_NAME: &str = "cqcfg.toml";
/// Environment variable overriding the config file location
pub const CONFIG_ENV_VAR: &str = "CQCFG_CONFIG";

/// Error type for configuration loading
#[derive(Debug)]
pub enum ConfigError {
    /// The config file exists but could not be read
    Read(PathBuf, std::io::Error),
    /// The config file is not valid TOML for [`ScanConfig`]
    Parse(PathBuf, toml::de::Error),
    /// No usable `git` executable was found
    GitNotFound(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Read(path, e) => {
                write!(f, "Failed to read config {}: {}", path.display(), e)
            }
            ConfigError::Parse(path, e) => {
                write!(f, "Invalid config {}: {}", path.display(), e)
            }
            ConfigError::GitNotFound(msg) => write!(f, "git executable not found: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Scanner configuration
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct ScanConfig {
    /// Import path identifying the SDK package
    pub sdk_path: String,
    /// Local name used when the import carries no rename
    pub default_alias: String,
    /// Marker token; metadata lines start with `// <marker>: `
    pub marker: String,
    /// SDK variable whose string-literal assignment is the plugin identity
    pub identity_field: String,
    /// Name of the manifest file written into the output directory
    pub manifest_name: String,
    /// Explicit git executable used for revision counting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_path: Option<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            sdk_path: DEFAULT_SDK_PATH.to_string(),
            default_alias: DEFAULT_ALIAS.to_string(),
            marker: DEFAULT_MARKER.to_string(),
            identity_field: DEFAULT_IDENTITY_FIELD.to_string(),
            manifest_name: DEFAULT_MANIFEST_NAME.to_string(),
            git_path: None,
        }
    }
}

impl ScanConfig {
    /// Locate the config file that applies to `target_dir`, if any
    pub fn path(target_dir: &Path) -> Option<PathBuf> {
        let env_path = std::env::var(CONFIG_ENV_VAR).ok();
        Self::resolve_path(env_path.as_deref(), target_dir, user_config_dir().as_deref())
    }

    fn resolve_path(
        env_path: Option<&str>,
        target_dir: &Path,
        user_dir: Option<&Path>,
    ) -> Option<PathBuf> {
        if let Some(env_path) = env_path {
            let trimmed = env_path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }

        let local = target_dir.join(CONFIG_FILE_NAME);
        if local.is_file() {
            return Some(local);
        }

        user_dir
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .filter(|p| p.is_file())
    }

    /// Load the configuration that applies to `target_dir`
    pub fn load_for(target_dir: &Path) -> Result<Self, ConfigError> {
        match Self::path(target_dir) {
            Some(path) => Self::load_from_path(&path),
            None => Ok(ScanConfig::default()),
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
    }

    /// Prefix a comment must start with to carry metadata, e.g. `// cqp: `
    pub fn marker_prefix(&self) -> String {
        format!("// {}: ", self.marker)
    }

    /// Resolve the git executable, preferring the configured path
    pub fn git_executable(&self) -> Result<PathBuf, ConfigError> {
        if let Some(ref git) = self.git_path {
            let path = PathBuf::from(git);
            if path.is_file() {
                return Ok(path);
            }
            return which::which(git)
                .map_err(|e| ConfigError::GitNotFound(format!("{}: {}", git, e)));
        }
        which::which("git").map_err(|e| ConfigError::GitNotFound(e.to_string()))
    }
}

fn user_config_dir() -> Option<PathBuf> {
    #[cfg(not(target_os = "windows"))]
    {
        dirs::home_dir().map(|h| h.join(".config").join("cqcfg"))
    }

    #[cfg(target_os = "windows")]
    {
        dirs::config_dir().map(|c| c.join("cqcfg"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_sdk_conventions() {
        let config = ScanConfig::default();
        assert_eq!(config.sdk_path, "github.com/Tnze/CoolQ-Golang-SDK/cqp");
        assert_eq!(config.default_alias, "cqp");
        assert_eq!(config.marker_prefix(), "// cqp: ");
        assert_eq!(config.identity_field, "AppID");
        assert_eq!(config.manifest_name, "app.json");
        assert!(config.git_path.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            "sdk-path = \"example.com/fork/cqp\"\nmarker = \"plugin\"\n",
        )?;

        let config = ScanConfig::load_from_path(&path)?;
        assert_eq!(config.sdk_path, "example.com/fork/cqp");
        assert_eq!(config.marker_prefix(), "// plugin: ");
        assert_eq!(config.default_alias, DEFAULT_ALIAS);
        assert_eq!(config.manifest_name, DEFAULT_MANIFEST_NAME);
        Ok(())
    }

    #[test]
    fn test_malformed_file_is_an_error() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "marker = [")?;

        let result = ScanConfig::load_from_path(&path);
        assert!(matches!(result, Err(ConfigError::Parse(_, _))));
        Ok(())
    }

    #[test]
    fn test_resolve_path_order() -> Result<(), Box<dyn std::error::Error>> {
        let target = TempDir::new()?;
        let user = TempDir::new()?;

        assert_eq!(
            ScanConfig::resolve_path(None, target.path(), Some(user.path())),
            None
        );

        let user_file = user.path().join(CONFIG_FILE_NAME);
        fs::write(&user_file, "")?;
        assert_eq!(
            ScanConfig::resolve_path(None, target.path(), Some(user.path())),
            Some(user_file)
        );

        let local_file = target.path().join(CONFIG_FILE_NAME);
        fs::write(&local_file, "")?;
        assert_eq!(
            ScanConfig::resolve_path(Some("  "), target.path(), Some(user.path())),
            Some(local_file)
        );

        assert_eq!(
            ScanConfig::resolve_path(Some("/etc/cqcfg.toml"), target.path(), None),
            Some(PathBuf::from("/etc/cqcfg.toml"))
        );
        Ok(())
    }
}
