use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use pinenv_types::{PackageSpec, PrefixLayout};
use serde::{Deserialize, Serialize};

use crate::prefix::EnvironmentPrefix;

/// Everything the package manager needs to create an environment.
#[derive(Debug, Clone, Copy)]
pub struct CreateEnvironment<'a> {
    /// Where to create the environment.
    pub prefix: &'a Path,

    /// The python version to install, e.g. `3.10`.
    pub python_version: &'a str,

    /// The remaining package specifiers, without any `python=` entry.
    pub specs: &'a [PackageSpec],

    /// Channels to consult in addition to the package manager's defaults.
    pub channels: &'a [String],
}

impl CreateEnvironment<'_> {
    /// The full list of specifiers to install, python first.
    pub fn install_specs(&self) -> Vec<String> {
        std::iter::once(format!("python={}", self.python_version))
            .chain(self.specs.iter().map(|spec| spec.as_str().to_string()))
            .collect()
    }
}

/// A package installed in an environment as reported by the package manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledPackage {
    /// The package name.
    pub name: String,

    /// The installed version.
    pub version: String,

    /// The build string, empty for packages installed through pip.
    #[serde(default)]
    pub build_string: String,

    /// The channel the package came from (`pypi` for pip installs).
    #[serde(default)]
    pub channel: String,
}

/// Errors raised while talking to the package manager.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum PackageManagerError {
    /// No executable could be located.
    #[error("could not find a conda installation")]
    #[diagnostic(help(
        "install conda, mamba or micromamba, or point `conda-exe` (or PINENV_CONDA_EXE) at one"
    ))]
    NotFound,

    /// A configured executable does not exist.
    #[error("the package manager executable {} does not exist", .0.display())]
    MissingExecutable(PathBuf),

    /// The executable does not live inside a conda installation.
    #[error("cannot tell which installation {} belongs to", .0.display())]
    #[diagnostic(help(
        "point `conda-exe` at the executable inside the bin directory of the installation"
    ))]
    UnknownBasePrefix(PathBuf),

    /// `info --json` printed something unexpected.
    #[error("failed to parse the installation info reported by the package manager")]
    InvalidInfo(#[source] serde_json::Error),

    /// The process could not be started.
    #[error("failed to run {program}")]
    Spawn {
        /// The program that was started.
        program: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The process ran but reported failure.
    #[error("`{command}` failed ({status})\n{stderr}")]
    CommandFailed {
        /// The command line that was run.
        command: String,
        /// How the process exited.
        status: ExitStatus,
        /// Whatever the process printed on stderr.
        stderr: String,
    },

    /// The base installation has no interpreter to take a version from.
    #[error("the base installation at {} does not provide a python interpreter", .0.display())]
    #[diagnostic(help("pin the interpreter explicitly, e.g. `python=3.10`"))]
    BasePythonUnavailable(PathBuf),

    /// The interpreter printed something that is not a version.
    #[error("could not determine the python version from '{0}'")]
    UnrecognizedPythonVersion(String),

    /// The package list could not be parsed.
    #[error("failed to parse the package list reported by the package manager")]
    InvalidPackageList(#[source] serde_json::Error),

    /// The prefix is not a conda environment.
    #[error("{} is not a conda environment", .0.display())]
    NotAnEnvironment(PathBuf),
}

/// The external tool that resolves and installs conda packages.
///
/// [`crate::Conda`] implements this by shelling out; tests substitute their
/// own implementation.
pub trait PackageManager {
    /// The root prefix of the package manager installation. It is activated
    /// while an environment is created.
    fn base_prefix(&self) -> &Path;

    /// The directory layout of prefixes managed by this package manager.
    fn layout(&self) -> PrefixLayout {
        PrefixLayout::current()
    }

    /// The python version provided by the base installation, used when a
    /// request does not pin python itself.
    fn base_python_version(&self) -> Result<String, PackageManagerError>;

    /// Creates an environment at `request.prefix` with the requested
    /// packages installed. The directory exists and is empty when this is
    /// called.
    fn create_environment(&self, request: &CreateEnvironment<'_>)
        -> Result<(), PackageManagerError>;

    /// Lists the packages installed in the environment at `prefix`.
    fn list_packages(&self, prefix: &Path) -> Result<Vec<InstalledPackage>, PackageManagerError>;
}

/// Lists the packages of an existing environment, sorted by name.
pub fn list_packages<P: PackageManager + ?Sized>(
    package_manager: &P,
    prefix: &Path,
) -> Result<Vec<InstalledPackage>, PackageManagerError> {
    let environment = EnvironmentPrefix::new(prefix, package_manager.layout());
    if !environment.is_conda_environment() {
        return Err(PackageManagerError::NotAnEnvironment(prefix.to_path_buf()));
    }

    let mut packages = package_manager.list_packages(prefix)?;
    packages.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(packages)
}
