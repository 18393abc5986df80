//! CLI configuration file loading.
//!
//! The configuration lives at `~/.config/consolekit/config.json` by default
//! and carries everything the core treats as external: the operator
//! identity, default realm/region, the account catalog path, the role
//! overrides and the console destinations handed to the rendering consumer.

use std::path::{Path, PathBuf};

use consolekit_core::StaticOverrides;
use eyre::WrapErr;
use serde::Deserialize;

/// On-disk configuration for the `consolekit` binary.
#[derive(Debug, Default, Deserialize)]
pub struct CliConfig {
    /// Operator identity used in session names.
    pub user_name: Option<String>,
    /// Realm used when `--realm` is not given.
    pub default_realm: Option<String>,
    /// Region used when `--region` is not given.
    pub default_region: Option<String>,
    /// Path to the account catalog JSON file.
    pub catalog: Option<PathBuf>,
    /// Account- and realm-scoped `default_role` overrides.
    #[serde(default)]
    pub overrides: StaticOverrides,
    /// Console destinations for the rendering consumer. Configured
    /// independently of any role selection.
    #[serde(default)]
    pub console_urls: Vec<String>,
}

impl CliConfig {
    fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("consolekit").join("config.json"))
    }

    /// Loads the configuration from `path`, or from the default location.
    ///
    /// An explicitly given path must exist and parse; a missing default
    /// location just yields the default configuration.
    pub fn load(path: Option<&Path>) -> eyre::Result<Self> {
        let path = match path {
            Some(explicit) => explicit.to_path_buf(),
            None => match Self::default_path() {
                Some(default) if default.exists() => default,
                _ => return Ok(Self::default()),
            },
        };

        let raw = std::fs::read_to_string(&path)
            .wrap_err_with(|| format!("failed to read config file `{}`", path.display()))?;
        serde_json::from_str(&raw)
            .wrap_err_with(|| format!("failed to parse config file `{}`", path.display()))
    }
}
