use serde::{Deserialize, Serialize};

use crate::config::{Config, LocalInstallPolicy, ValidationError};

/// Settings for the `python -m pip install` step that runs after the conda
/// environment has been created.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct PipConfig {
    /// Arguments appended to every `pip install` invocation, e.g. `--no-deps`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_args: Vec<String>,

    /// Whether a failing local directory install aborts provisioning.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_install_failure: Option<LocalInstallPolicy>,
}

impl PipConfig {
    /// Returns true if no pip setting is configured.
    pub fn is_default(&self) -> bool {
        PipConfig::default() == *self
    }

    /// The effective local install policy, [`LocalInstallPolicy::Fatal`] unless configured.
    pub fn local_install_policy(&self) -> LocalInstallPolicy {
        self.local_install_failure.unwrap_or_default()
    }
}

impl Config for PipConfig {
    fn get_extension_name(&self) -> String {
        "pip".to_string()
    }

    fn merge_config(self, other: &Self) -> Self {
        Self {
            extra_args: if other.extra_args.is_empty() {
                self.extra_args
            } else {
                other.extra_args.clone()
            },
            local_install_failure: other.local_install_failure.or(self.local_install_failure),
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.extra_args.iter().any(|arg| arg.trim().is_empty()) {
            return Err(ValidationError::InvalidValue(
                "extra-args".to_string(),
                "pip arguments must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        vec![
            "extra-args".to_string(),
            "local-install-failure".to_string(),
        ]
    }
}
