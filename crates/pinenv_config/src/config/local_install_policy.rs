use std::str::FromStr;

use serde::{de::IntoDeserializer, Deserialize, Serialize};

/// What to do when installing a local package directory into a fresh
/// environment fails.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LocalInstallPolicy {
    /// Abort provisioning and remove the environment.
    #[default]
    Fatal,
    /// Log a warning and keep the environment as it is.
    Warn,
}

impl FromStr for LocalInstallPolicy {
    type Err = serde::de::value::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::deserialize(s.into_deserializer())
    }
}
