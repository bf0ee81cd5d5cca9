pub mod config;

pub use config::{
    Config, LoadError, LocalInstallPolicy, PipConfig, ProvisionConfig, ValidationError,
    DEFAULT_CHANNEL,
};
