#![deny(missing_docs)]
//! `pinenv` creates isolated conda environments whose packages are pinned to
//! exact versions.
//!
//! The heavy lifting is delegated to an external package manager (conda,
//! mamba or micromamba) and to the environment's own `pip`. This crate
//! validates the request, drives those tools in order, and guarantees that a
//! failed provisioning run does not leave a half-built environment behind.
//!
//! ```no_run
//! use pinenv::{provision, Conda, ProvisionRequest};
//! use pinenv_config::ProvisionConfig;
//!
//! let config = ProvisionConfig::load(&[])?;
//! let conda = Conda::locate(&config)?;
//! let request = ProvisionRequest::new("/tmp/envs/analysis", ["python=3.10", "pandas==1.4.3"])
//!     .with_pip(["requests==2.31.0"]);
//! provision(&config, &conda, &request)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod conda;
mod package_manager;
mod pip;
mod prefix;
mod provision;

pub use conda::Conda;
pub use package_manager::{
    list_packages, CreateEnvironment, InstalledPackage, PackageManager, PackageManagerError,
};
pub use pip::PipInstaller;
pub use prefix::{python_executable, remove_path, EnvironmentPrefix};
pub use provision::{provision, ProvisionError, ProvisionRequest, RollbackGuard};

pub use pinenv_types::{PackageSpec, PipSpec, PrefixLayout, VersionGate, VersionGateError};
