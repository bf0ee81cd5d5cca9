use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use itertools::Itertools;
use pinenv_config::ProvisionConfig;
use pinenv_types::PrefixLayout;
use serde::Deserialize;

use crate::package_manager::{
    CreateEnvironment, InstalledPackage, PackageManager, PackageManagerError,
};
use crate::prefix::python_executable;

/// Executables that are searched for on `PATH`, in order.
const CANDIDATES: &[&str] = &["conda", "mamba", "micromamba"];

/// Names the root prefix of a micromamba installation.
const MAMBA_ROOT_PREFIX_ENV: &str = "MAMBA_ROOT_PREFIX";

/// A conda compatible package manager that is driven through its command
/// line interface.
#[derive(Debug, Clone)]
pub struct Conda {
    executable: PathBuf,
    base_prefix: PathBuf,
    layout: PrefixLayout,
}

impl Conda {
    /// Uses the executable at `executable`.
    ///
    /// For conda and mamba the base prefix is derived from the executable
    /// location (`<prefix>/bin/conda`, `<prefix>/condabin/conda`,
    /// `<prefix>\Scripts\conda.exe`). micromamba is a standalone binary, its
    /// root prefix is `MAMBA_ROOT_PREFIX` or, when that is unset, whatever
    /// `micromamba info --json` reports.
    pub fn new(
        executable: impl Into<PathBuf>,
        layout: PrefixLayout,
    ) -> Result<Self, PackageManagerError> {
        let executable = executable.into();
        let executable = if executable.is_file() {
            executable
        } else {
            which::which(&executable)
                .map_err(|_| PackageManagerError::MissingExecutable(executable.clone()))?
        };

        let base_prefix = if is_micromamba(&executable) {
            micromamba_root_prefix(&executable)?
        } else {
            layout
                .prefix_of_executable(&executable)
                .ok_or_else(|| PackageManagerError::UnknownBasePrefix(executable.clone()))?
        };
        tracing::debug!("base prefix of {} is {}", executable.display(), base_prefix.display());

        Ok(Self {
            executable,
            base_prefix,
            layout,
        })
    }

    /// Finds the package manager to use: the configured `conda-exe`, then
    /// the `CONDA_EXE` variable set by an activated conda shell, then the
    /// first of `conda`, `mamba` and `micromamba` found on `PATH`.
    pub fn locate(config: &ProvisionConfig) -> Result<Self, PackageManagerError> {
        let layout = PrefixLayout::current();

        if let Some(executable) = &config.conda_exe {
            tracing::debug!("using configured package manager {}", executable.display());
            return Self::new(executable, layout);
        }

        if let Some(executable) = std::env::var_os("CONDA_EXE").filter(|exe| !exe.is_empty()) {
            let executable = PathBuf::from(executable);
            if executable.is_file() {
                tracing::debug!(
                    "using package manager from CONDA_EXE {}",
                    executable.display()
                );
                return Self::new(executable, layout);
            }
            tracing::debug!(
                "ignoring CONDA_EXE, {} does not exist",
                executable.display()
            );
        }

        for candidate in CANDIDATES {
            if let Ok(executable) = which::which(candidate) {
                tracing::debug!("found {candidate} at {}", executable.display());
                return Self::new(executable, layout);
            }
        }

        Err(PackageManagerError::NotFound)
    }

    /// The package manager executable.
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.executable);
        command.stdin(Stdio::null());
        command
    }

    pub(crate) fn create_command(&self, request: &CreateEnvironment<'_>) -> Command {
        let mut command = self.command();
        command
            .arg("create")
            .arg("--yes")
            .arg("--quiet")
            .arg("--prefix")
            .arg(request.prefix);
        for channel in request.channels {
            command.arg("--channel").arg(channel);
        }
        command.args(request.install_specs());
        command
    }

    pub(crate) fn list_command(&self, prefix: &Path) -> Command {
        let mut command = self.command();
        command.arg("list").arg("--prefix").arg(prefix).arg("--json");
        command
    }
}

/// Formats a command the way a user would type it.
pub(crate) fn display_command(command: &Command) -> String {
    std::iter::once(command.get_program())
        .chain(command.get_args())
        .map(OsStr::to_string_lossy)
        .join(" ")
}

/// Runs `command`, capturing its output, and fails if it exits unsuccessfully.
fn run(mut command: Command) -> Result<Output, PackageManagerError> {
    let rendered = display_command(&command);
    tracing::debug!("running `{rendered}`");

    let output = command.output().map_err(|source| PackageManagerError::Spawn {
        program: command.get_program().to_string_lossy().into_owned(),
        source,
    })?;

    if !output.status.success() {
        return Err(PackageManagerError::CommandFailed {
            command: rendered,
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(output)
}

/// Extracts the version from the output of `python --version`.
fn parse_python_version(output: &str) -> Option<&str> {
    lazy_regex::regex_captures!(r"Python\s+(\d+\.\d+(?:\.\d+)?)", output)
        .map(|(_, version)| version)
}

fn is_micromamba(executable: &Path) -> bool {
    executable
        .file_stem()
        .is_some_and(|stem| stem.eq_ignore_ascii_case("micromamba"))
}

/// The part of `micromamba info --json` that names the root prefix. Older
/// releases call it `root_prefix`.
#[derive(Debug, Deserialize)]
struct MicromambaInfo {
    #[serde(rename = "base environment", alias = "root_prefix")]
    base_environment: PathBuf,
}

fn micromamba_root_prefix(executable: &Path) -> Result<PathBuf, PackageManagerError> {
    if let Some(root) = std::env::var_os(MAMBA_ROOT_PREFIX_ENV).filter(|root| !root.is_empty()) {
        return Ok(PathBuf::from(root));
    }

    let mut command = Command::new(executable);
    command.arg("info").arg("--json").stdin(Stdio::null());
    let output = run(command)?;
    let info: MicromambaInfo =
        serde_json::from_slice(&output.stdout).map_err(PackageManagerError::InvalidInfo)?;
    Ok(info.base_environment)
}

impl PackageManager for Conda {
    fn base_prefix(&self) -> &Path {
        &self.base_prefix
    }

    fn layout(&self) -> PrefixLayout {
        self.layout
    }

    fn base_python_version(&self) -> Result<String, PackageManagerError> {
        let python = python_executable(&self.base_prefix, self.layout);
        if !python.is_file() {
            return Err(PackageManagerError::BasePythonUnavailable(
                self.base_prefix.clone(),
            ));
        }

        let mut command = Command::new(&python);
        command.arg("--version").stdin(Stdio::null());
        let output = run(command)?;

        // Python 2 reports its version on stderr.
        let text = format!(
            "{}{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        let version = parse_python_version(&text).ok_or_else(|| {
            PackageManagerError::UnrecognizedPythonVersion(text.trim().to_string())
        })?;
        tracing::debug!("base installation provides python {version}");
        Ok(version.to_string())
    }

    fn create_environment(
        &self,
        request: &CreateEnvironment<'_>,
    ) -> Result<(), PackageManagerError> {
        let output = run(self.create_command(request))?;
        tracing::trace!("{}", String::from_utf8_lossy(&output.stdout));
        Ok(())
    }

    fn list_packages(&self, prefix: &Path) -> Result<Vec<InstalledPackage>, PackageManagerError> {
        let output = run(self.list_command(prefix))?;
        serde_json::from_slice(&output.stdout).map_err(PackageManagerError::InvalidPackageList)
    }
}
