//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate only receives the pieces it needs
//! (e.g. [`ReplicationOptions`]).
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables, `COMPLOC__SECTION__KEY`
//! 3. Config file (`--config`, `COMPLOC_CONFIG`, or the platform default)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use comploc_core::{application::ReplicationOptions, domain::DEFAULT_DELIMITER};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "COMPLOC";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Naming and placement of duplicates.
    pub replication: ReplicationOptions,
    /// Manifest parsing.
    pub manifest: ManifestConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    pub delimiter: char,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            replication: ReplicationOptions::default(),
            manifest: ManifestConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            delimiter: char::from(DEFAULT_DELIMITER),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then the config file, then the
    /// environment.
    ///
    /// With `require_file`, a file passed explicitly (`--config`) must
    /// exist. The platform default location is always optional.
    pub fn load(config_file: Option<&PathBuf>, require_file: bool) -> anyhow::Result<Self> {
        let explicit = config_file.is_some() && require_file;
        let path = config_file.cloned().unwrap_or_else(Self::config_path);

        if explicit && !path.exists() {
            bail!("config file not found: {}", path.display());
        }

        let defaults = config::Config::try_from(&Self::default())
            .context("Failed to build default configuration")?;

        let settings = config::Config::builder()
            .add_source(defaults)
            .add_source(
                config::File::from(path.as_path())
                    .format(config::FileFormat::Toml)
                    .required(explicit),
            )
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

        let config: Self = settings
            .try_deserialize()
            .context("Configuration has invalid values")?;
        config.validate()?;

        debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Reject values the engine cannot use.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.manifest.delimiter_byte()?;
        if self.replication.shared_folder.trim().is_empty() {
            bail!("replication.shared_folder must not be empty");
        }
        if !self.replication.locale_folder.contains("{locale}") {
            bail!("replication.locale_folder must contain '{{locale}}'");
        }
        Ok(())
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.comploc.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "comploc", "comploc")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".comploc.toml"))
    }

    /// The file this process reads: `--config` when given, else the default.
    pub fn active_path(config_file: Option<&Path>) -> PathBuf {
        config_file
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::config_path)
    }
}

impl ManifestConfig {
    /// The delimiter as the single byte the manifest parser takes.
    pub fn delimiter_byte(&self) -> anyhow::Result<u8> {
        delimiter_byte(self.delimiter)
    }
}

/// Manifest delimiters must be single ASCII characters.
pub fn delimiter_byte(c: char) -> anyhow::Result<u8> {
    if c.is_ascii() && c != '"' {
        Ok(c as u8)
    } else {
        bail!("'{c}' cannot be used as a manifest delimiter")
    }
}
