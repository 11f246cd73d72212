// Configuration file handling and reporter settings resolution

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Name of the configuration file looked up in the current and home directories
pub const CONFIG_FILE_NAME: &str = ".teamcity-reporter.toml";

/// Environment variable holding the artifacts base location
pub const ENV_TEAMCITY_ARTIFACTS: &str = "TEAMCITY_ARTIFACTS_PW_RESULT";

/// Configuration file contents
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub reporter: ReporterSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReporterSection {
    /// Dump the run configuration as a service message at run begin
    #[serde(default)]
    pub log_config: bool,

    /// Published artifacts location attachments are rewritten against
    #[serde(default)]
    pub test_metadata_artifacts: Option<String>,
}

pub fn default_test_metadata_artifacts() -> String {
    String::from("test-results")
}

impl Config {
    /// Load configuration from default locations
    pub fn load() -> Option<Self> {
        // 1. ./.teamcity-reporter.toml
        // 2. ~/.teamcity-reporter.toml
        let mut paths = Vec::new();
        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd.join(CONFIG_FILE_NAME));
        }
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(CONFIG_FILE_NAME));
        }

        Self::load_first(&paths)
    }

    /// Load the first existing file that parses; broken files are skipped with a warning
    pub fn load_first(paths: &[PathBuf]) -> Option<Self> {
        paths
            .iter()
            .filter(|path| path.exists())
            .find_map(|path| match Self::load_from_file(path) {
                Ok(config) => Some(config),
                Err(e) => {
                    warn!("Ignoring config file: {:#}", e);
                    None
                }
            })
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Default configuration as TOML
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_else(|_| String::new())
    }

    /// Write the default configuration file
    pub fn init(path: &Path) -> Result<()> {
        let config = Config {
            reporter: ReporterSection {
                log_config: false,
                test_metadata_artifacts: Some(default_test_metadata_artifacts()),
            },
        };
        std::fs::write(path, config.to_toml())
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }
}

/// Settings the reporter runs with. Resolved once, never re-read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReporterConfig {
    pub log_config: bool,
    pub test_metadata_artifacts: String,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            log_config: false,
            test_metadata_artifacts: default_test_metadata_artifacts(),
        }
    }
}

impl ReporterConfig {
    pub fn new(log_config: bool, test_metadata_artifacts: impl Into<String>) -> Self {
        Self {
            log_config,
            test_metadata_artifacts: test_metadata_artifacts.into(),
        }
    }

    /// Resolve settings from explicit values, the environment and defaults.
    ///
    /// Precedence for the artifacts location:
    /// 1. explicit value (command line)
    /// 2. configuration file
    /// 3. `TEAMCITY_ARTIFACTS_PW_RESULT`
    /// 4. `test-results`
    pub fn resolve(
        log_config: bool,
        test_metadata_artifacts: Option<String>,
        file: Option<&Config>,
    ) -> Self {
        Self::resolve_with_env(log_config, test_metadata_artifacts, file, |key| {
            std::env::var(key).ok()
        })
    }

    /// Same as [`ReporterConfig::resolve`] with an injected environment lookup
    pub fn resolve_with_env<F>(
        log_config: bool,
        test_metadata_artifacts: Option<String>,
        file: Option<&Config>,
        env: F,
    ) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let section = file.map(|config| &config.reporter);

        let test_metadata_artifacts = test_metadata_artifacts
            .or_else(|| section.and_then(|s| s.test_metadata_artifacts.clone()))
            .or_else(|| env(ENV_TEAMCITY_ARTIFACTS))
            .unwrap_or_else(default_test_metadata_artifacts);

        Self {
            log_config: log_config || section.is_some_and(|s| s.log_config),
            test_metadata_artifacts,
        }
    }
}
