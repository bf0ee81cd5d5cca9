use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod local_install_policy;
pub mod pip;

pub use local_install_policy::LocalInstallPolicy;
pub use pip::PipConfig;

/// The channel used when neither the configuration nor a request names one.
pub const DEFAULT_CHANNEL: &str = "conda-forge";

/// Overrides `check-versions`. Accepts `1`/`0`, `true`/`false`, `yes`/`no`
/// and `on`/`off`.
pub const CHECK_VERSIONS_ENV: &str = "PINENV_CHECK_VERSIONS";

/// Overrides `conda-exe`.
pub const CONDA_EXE_ENV: &str = "PINENV_CONDA_EXE";

/// A configuration value that is syntactically fine but not acceptable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The key and a description of what is wrong with its value.
    #[error("invalid value for `{0}`: {1}")]
    InvalidValue(String, String),
}

/// Errors raised by [`ProvisionConfig::load`] and
/// [`ProvisionConfig::load_from_files`].
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read configuration file")]
    IoError(#[from] std::io::Error),

    /// The file is not valid TOML or has values of the wrong type.
    #[error("failed to parse {}", .1.display())]
    ParseError(#[source] toml::de::Error, PathBuf),

    /// The merged configuration is not acceptable.
    #[error(transparent)]
    ValidationError(#[from] ValidationError),
}

/// A section of the configuration file.
pub trait Config:
    Serialize + for<'de> Deserialize<'de> + std::fmt::Debug + Clone + PartialEq + Eq + Default
{
    /// The name of the section, used as a key prefix.
    fn get_extension_name(&self) -> String;

    /// Layers `other` on top of `self`; values set in `other` win.
    fn merge_config(self, other: &Self) -> Self;

    /// Checks values that deserialize fine but make no sense.
    fn validate(&self) -> Result<(), ValidationError>;

    /// Returns true if nothing in this section is set.
    fn is_default(&self) -> bool {
        self == &Self::default()
    }

    /// The keys this section accepts.
    fn keys(&self) -> Vec<String>;
}

/// Configuration owned by the application that provisions environments.
///
/// Every field is optional so that partial files can be layered on top of
/// each other; use the accessor methods to read the effective values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProvisionConfig {
    /// Reject package specifiers without an explicit version pin. Defaults to
    /// `true`; turning it off is meant for development only.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_versions: Option<bool>,

    /// Channels used when a provisioning request does not name any.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_channels: Option<Vec<String>>,

    /// Path to the conda (or mamba) executable. When unset the executable is
    /// looked up on `PATH`.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conda_exe: Option<PathBuf>,

    /// Settings for the pip step.
    #[serde(default, skip_serializing_if = "PipConfig::is_default")]
    pub pip: PipConfig,

    /// The files this configuration was read from, in merge order.
    #[serde(skip)]
    pub loaded_from: Vec<PathBuf>,
}

impl ProvisionConfig {
    /// Whether unpinned specifiers are rejected.
    pub fn check_versions(&self) -> bool {
        self.check_versions.unwrap_or(true)
    }

    /// The channels to use when a request does not specify any.
    pub fn default_channels(&self) -> Vec<String> {
        self.default_channels
            .clone()
            .unwrap_or_else(|| vec![DEFAULT_CHANNEL.to_string()])
    }

    /// Returns the location of the user wide configuration file.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("pinenv").join("config.toml"))
    }

    /// Reads and merges the given files in order, later files take priority.
    pub fn load_from_files<I, P>(paths: I) -> Result<Self, LoadError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut config = ProvisionConfig::default();

        for path in paths {
            let path = path.as_ref();
            let content = fs_err::read_to_string(path)?;
            let mut other: ProvisionConfig = toml::from_str(&content)
                .map_err(|e| LoadError::ParseError(e, path.to_path_buf()))?;
            other.loaded_from.push(path.to_path_buf());
            config = config.merge_config(&other);
        }

        config.validate()?;
        Ok(config)
    }

    /// Loads the global configuration file (if it exists), then the explicit
    /// `files`, then applies environment variable overrides.
    pub fn load(files: &[PathBuf]) -> Result<Self, LoadError> {
        let global = Self::global_config_path().filter(|path| path.is_file());
        if let Some(global) = &global {
            tracing::debug!("loading global configuration from {}", global.display());
        }

        let config = Self::load_from_files(global.iter().chain(files))?.with_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `PINENV_CHECK_VERSIONS` and `PINENV_CONDA_EXE`.
    pub fn with_env_overrides(mut self) -> Result<Self, LoadError> {
        if let Ok(value) = std::env::var(CHECK_VERSIONS_ENV) {
            let enabled = parse_bool(&value).ok_or_else(|| {
                ValidationError::InvalidValue(
                    CHECK_VERSIONS_ENV.to_string(),
                    format!("expected a boolean, found '{value}'"),
                )
            })?;
            tracing::debug!("{CHECK_VERSIONS_ENV} overrides check-versions to {enabled}");
            self.check_versions = Some(enabled);
        }

        if let Some(conda_exe) = std::env::var_os(CONDA_EXE_ENV).filter(|v| !v.is_empty()) {
            self.conda_exe = Some(PathBuf::from(conda_exe));
        }

        Ok(self)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Config for ProvisionConfig {
    fn get_extension_name(&self) -> String {
        "base".to_string()
    }

    fn merge_config(self, other: &Self) -> Self {
        Self {
            check_versions: other.check_versions.or(self.check_versions),
            default_channels: other
                .default_channels
                .as_ref()
                .or(self.default_channels.as_ref())
                .cloned(),
            conda_exe: other.conda_exe.as_ref().or(self.conda_exe.as_ref()).cloned(),
            pip: self.pip.merge_config(&other.pip),
            loaded_from: self
                .loaded_from
                .iter()
                .chain(&other.loaded_from)
                .cloned()
                .collect(),
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(channels) = &self.default_channels {
            if channels.is_empty() {
                return Err(ValidationError::InvalidValue(
                    "default-channels".to_string(),
                    "at least one channel is required".to_string(),
                ));
            }
            if channels.iter().any(|channel| channel.trim().is_empty()) {
                return Err(ValidationError::InvalidValue(
                    "default-channels".to_string(),
                    "channel names must not be empty".to_string(),
                ));
            }
        }
        self.pip.validate()
    }

    /// Gather all the keys of the configuration.
    fn keys(&self) -> Vec<String> {
        let mut keys = vec![
            "check-versions".to_string(),
            "default-channels".to_string(),
            "conda-exe".to_string(),
        ];
        keys.extend(
            self.pip
                .keys()
                .iter()
                .map(|key| format!("{}.{}", self.pip.get_extension_name(), key)),
        );
        keys
    }
}
