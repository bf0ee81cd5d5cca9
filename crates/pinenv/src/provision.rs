//! Creates a fresh environment from a [`ProvisionRequest`].

use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use pinenv_config::{LocalInstallPolicy, ProvisionConfig};
use pinenv_shell::{ActivationError, ActivationGuard};
use pinenv_types::{python_version, PackageSpec, PipSpec, VersionGate, VersionGateError};

use crate::package_manager::{CreateEnvironment, PackageManager, PackageManagerError};
use crate::pip::PipInstaller;
use crate::prefix::{remove_path, EnvironmentPrefix};

/// What to put into a new environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionRequest {
    /// Where the environment is created. Anything at this path is deleted.
    pub prefix: PathBuf,

    /// Conda package specifiers, normalized to the single `=` form.
    pub packages: Vec<PackageSpec>,

    /// Channels to install from. `None` uses the configured default channels.
    pub channels: Option<Vec<String>>,

    /// Packages installed with pip after the conda packages.
    pub pip: Vec<PipSpec>,

    /// Local package directories installed with pip, one at a time, last.
    pub paths: Vec<PathBuf>,
}

impl ProvisionRequest {
    /// Creates a request for `packages` at `prefix`.
    pub fn new<I, S>(prefix: impl Into<PathBuf>, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PackageSpec>,
    {
        Self {
            prefix: prefix.into(),
            packages: packages.into_iter().map(Into::into).collect(),
            channels: None,
            pip: Vec::new(),
            paths: Vec::new(),
        }
    }

    /// Installs from `channels` instead of the configured defaults.
    #[must_use]
    pub fn with_channels<I, S>(mut self, channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.channels = Some(channels.into_iter().map(Into::into).collect());
        self
    }

    /// Additionally installs `pip` specifiers.
    #[must_use]
    pub fn with_pip<I, S>(mut self, pip: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PipSpec>,
    {
        self.pip = pip.into_iter().map(Into::into).collect();
        self
    }

    /// Additionally installs the packages in the local directories `paths`.
    #[must_use]
    pub fn with_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.paths = paths.into_iter().map(Into::into).collect();
        self
    }
}

/// Errors raised by [`provision`].
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ProvisionError {
    /// A specifier is missing its version pin.
    #[error(transparent)]
    #[diagnostic(help(
        "pin every package to an exact version or disable `check-versions` during development"
    ))]
    Validation(#[from] VersionGateError),

    /// The target directory could not be removed or created.
    #[error("failed to prepare {}", .path.display())]
    Io {
        /// The target directory.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The package manager failed.
    #[error(transparent)]
    #[diagnostic(transparent)]
    PackageManager(#[from] PackageManagerError),

    /// The base installation could not be activated.
    #[error("failed to activate the base installation")]
    Activation(#[from] ActivationError),

    /// The package manager did not produce an interpreter.
    #[error("the environment at {} does not contain a python interpreter", .0.display())]
    InterpreterNotFound(PathBuf),

    /// The interpreter of the new environment could not be started.
    #[error("failed to run {}", .python.display())]
    Spawn {
        /// The interpreter.
        python: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// pip reported failure for the pip specifiers.
    #[error("failed to install additional packages via pip")]
    PipInstall {
        /// How pip exited.
        status: ExitStatus,
    },

    /// pip reported failure for a local package directory.
    #[error("failed to install {} via pip", .path.display())]
    LocalInstall {
        /// The directory that failed to install.
        path: PathBuf,
        /// How pip exited.
        status: ExitStatus,
    },
}

/// Deletes a directory when dropped unless [`RollbackGuard::disarm`] was
/// called first.
#[derive(Debug)]
#[must_use = "the directory is removed as soon as the guard is dropped"]
pub struct RollbackGuard {
    path: PathBuf,
    armed: bool,
}

impl RollbackGuard {
    /// Arms a guard for `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            armed: true,
        }
    }

    /// Keeps the directory.
    pub fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for RollbackGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        tracing::info!(
            "removing partially provisioned environment at {}",
            self.path.display()
        );
        if let Err(err) = remove_path(&self.path) {
            tracing::warn!("failed to remove {}: {err}", self.path.display());
        }
    }
}

fn require_python(environment: &EnvironmentPrefix) -> Result<PathBuf, ProvisionError> {
    let python = environment.python_executable();
    if python.is_file() {
        Ok(python)
    } else {
        Err(ProvisionError::InterpreterNotFound(
            environment.path().to_path_buf(),
        ))
    }
}

fn prepare_directory(prefix: &Path) -> Result<(), ProvisionError> {
    let io_err = |source| ProvisionError::Io {
        path: prefix.to_path_buf(),
        source,
    };
    if prefix.exists() {
        tracing::info!("replacing existing environment at {}", prefix.display());
    }
    remove_path(prefix).map_err(io_err)?;
    fs_err::create_dir_all(prefix).map_err(io_err)
}

/// Creates a fresh environment at `request.prefix`.
///
/// The steps are, in order:
///
/// 1. every package specifier must pin a version (when `check-versions` is
///    enabled); all offenders are reported at once and nothing on disk is
///    touched yet,
/// 2. the python version is taken from the first `python=` specifier, or from
///    the base installation of the package manager,
/// 3. whatever exists at the prefix is deleted and an empty directory created,
/// 4. the package manager creates the environment while its base installation
///    is activated,
/// 5. pip specifiers are checked for `==` pins and installed in one go,
/// 6. local directories are installed one by one.
///
/// If anything fails from step 3 onwards the directory is deleted again
/// before the error is returned. With [`LocalInstallPolicy::Warn`] failures in
/// step 6 are logged and the environment is kept.
pub fn provision<P: PackageManager + ?Sized>(
    config: &ProvisionConfig,
    package_manager: &P,
    request: &ProvisionRequest,
) -> Result<(), ProvisionError> {
    let prefix = request.prefix.as_path();
    let layout = package_manager.layout();

    VersionGate::conda()
        .enabled(config.check_versions())
        .check(&request.packages)?;

    let python_version = match python_version(&request.packages) {
        Some(version) => version.to_string(),
        None => package_manager.base_python_version()?,
    };
    let specs = request
        .packages
        .iter()
        .filter(|spec| !(spec.is_python() && spec.version().is_some()))
        .cloned()
        .collect::<Vec<_>>();
    let channels = request
        .channels
        .clone()
        .unwrap_or_else(|| config.default_channels());

    let rollback = RollbackGuard::new(prefix);
    prepare_directory(prefix)?;

    tracing::info!(
        "creating environment at {} with python {python_version}",
        prefix.display()
    );
    {
        let _activation = ActivationGuard::enter_prefix(package_manager.base_prefix(), layout)?;
        package_manager.create_environment(&CreateEnvironment {
            prefix,
            python_version: &python_version,
            specs: &specs,
            channels: &channels,
        })?;
    }

    let environment = EnvironmentPrefix::new(prefix, layout);

    if !request.pip.is_empty() {
        VersionGate::pip()
            .enabled(config.check_versions())
            .check(&request.pip)?;

        let python = require_python(&environment)?;
        let installer = PipInstaller::new(&python, &config.pip.extra_args);
        tracing::info!("installing {} package(s) with pip", request.pip.len());
        let status = installer
            .install(request.pip.iter().map(PipSpec::as_str))
            .map_err(|source| ProvisionError::Spawn {
                python: python.clone(),
                source,
            })?;
        if !status.success() {
            return Err(ProvisionError::PipInstall { status });
        }
    }

    if !request.paths.is_empty() {
        let python = require_python(&environment)?;
        let installer = PipInstaller::new(&python, &config.pip.extra_args);
        for path in &request.paths {
            tracing::info!("installing {} with pip", path.display());
            let status = installer
                .install([path])
                .map_err(|source| ProvisionError::Spawn {
                    python: python.clone(),
                    source,
                })?;
            if status.success() {
                continue;
            }
            match config.pip.local_install_policy() {
                LocalInstallPolicy::Fatal => {
                    return Err(ProvisionError::LocalInstall {
                        path: path.clone(),
                        status,
                    });
                }
                LocalInstallPolicy::Warn => {
                    tracing::warn!(
                        "failed to install {} via pip ({status}), keeping the environment",
                        path.display()
                    );
                }
            }
        }
    }

    rollback.disarm();
    tracing::info!("environment at {} is ready", prefix.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::path::Path;

    use assert_matches::assert_matches;
    use pinenv_config::PipConfig;
    use pinenv_types::PrefixLayout;
    use tempfile::TempDir;

    use super::*;
    use crate::package_manager::InstalledPackage;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct CreateCall {
        prefix: PathBuf,
        python_version: String,
        specs: Vec<String>,
        channels: Vec<String>,
        conda_prefix: Option<String>,
    }

    /// Writes a `bin/python` that appends its arguments to `pip.log` next to
    /// the environment and exits with `$FAKE_PIP_STATUS`.
    #[derive(Debug)]
    struct FakePackageManager {
        root: TempDir,
        base_version: String,
        fail_create: bool,
        calls: RefCell<Vec<CreateCall>>,
    }

    impl FakePackageManager {
        fn new() -> Self {
            let root = TempDir::new().unwrap();
            fs_err::create_dir_all(root.path().join("base/bin")).unwrap();
            Self {
                root,
                base_version: "3.11.4".to_string(),
                fail_create: false,
                calls: RefCell::default(),
            }
        }

        fn env_path(&self, name: &str) -> PathBuf {
            self.root.path().join("envs").join(name)
        }

        fn pip_log(&self) -> PathBuf {
            self.root.path().join("pip.log")
        }

        fn pip_calls(&self) -> Vec<String> {
            fs_err::read_to_string(self.pip_log())
                .map(|log| log.lines().map(str::to_string).collect())
                .unwrap_or_default()
        }
    }

    impl PackageManager for FakePackageManager {
        fn base_prefix(&self) -> &Path {
            self.root.path()
        }

        fn layout(&self) -> PrefixLayout {
            PrefixLayout::Unix
        }

        fn base_python_version(&self) -> Result<String, PackageManagerError> {
            Ok(self.base_version.clone())
        }

        fn create_environment(
            &self,
            request: &CreateEnvironment<'_>,
        ) -> Result<(), PackageManagerError> {
            self.calls.borrow_mut().push(CreateCall {
                prefix: request.prefix.to_path_buf(),
                python_version: request.python_version.to_string(),
                specs: request.install_specs(),
                channels: request.channels.to_vec(),
                conda_prefix: std::env::var("CONDA_PREFIX").ok(),
            });
            assert!(request.prefix.is_dir());
            assert_eq!(fs_err::read_dir(request.prefix).unwrap().count(), 0);

            if self.fail_create {
                return Err(PackageManagerError::Spawn {
                    program: "conda".to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::Other, "solver exploded"),
                });
            }

            fs_err::create_dir_all(request.prefix.join("conda-meta")).unwrap();
            fs_err::create_dir_all(request.prefix.join("bin")).unwrap();
            write_script(
                &request.prefix.join("bin/python"),
                &format!(
                    "#!/bin/sh\necho \"$@\" >> '{}'\nexit ${{FAKE_PIP_STATUS:-0}}\n",
                    self.pip_log().display()
                ),
            );
            Ok(())
        }

        fn list_packages(
            &self,
            _prefix: &Path,
        ) -> Result<Vec<InstalledPackage>, PackageManagerError> {
            Ok(vec![])
        }
    }

    fn write_script(path: &Path, content: &str) {
        fs_err::write(path, content).unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs_err::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    /// Runs `f` with a clean activation state and a given pip exit status.
    fn with_env<R>(pip_status: &str, f: impl FnOnce() -> R) -> R {
        temp_env::with_vars(
            [
                ("CONDA_PREFIX", None),
                ("FAKE_PIP_STATUS", Some(pip_status)),
            ],
            f,
        )
    }

    fn strict() -> ProvisionConfig {
        ProvisionConfig::default()
    }

    fn lenient() -> ProvisionConfig {
        ProvisionConfig {
            check_versions: Some(false),
            ..ProvisionConfig::default()
        }
    }

    #[test]
    fn test_unpinned_packages_are_rejected_before_touching_disk() {
        let pm = FakePackageManager::new();
        let prefix = pm.env_path("a");
        let request = ProvisionRequest::new(&prefix, ["pandas", "numpy=1.21", "scipy>=1"]);

        let err = with_env("0", || provision(&strict(), &pm, &request)).unwrap_err();
        assert_matches!(&err, ProvisionError::Validation(e) if e.specs == ["pandas", "scipy>=1"]);
        assert_eq!(
            err.to_string(),
            "version numbers must be explicitly specified for: 'pandas', 'scipy>=1'"
        );
        assert!(!prefix.exists());
        assert!(pm.calls.borrow().is_empty());
    }

    #[test]
    fn test_validation_failure_keeps_existing_environment() {
        let pm = FakePackageManager::new();
        let prefix = pm.env_path("a");
        fs_err::create_dir_all(&prefix).unwrap();
        fs_err::write(prefix.join("marker"), "").unwrap();

        let request = ProvisionRequest::new(&prefix, ["pandas"]);
        with_env("0", || provision(&strict(), &pm, &request)).unwrap_err();
        assert!(prefix.join("marker").exists());
    }

    #[test]
    fn test_unpinned_packages_allowed_when_lenient() {
        let pm = FakePackageManager::new();
        let prefix = pm.env_path("a");
        let request = ProvisionRequest::new(&prefix, ["pandas", ""]);

        with_env("0", || provision(&lenient(), &pm, &request)).unwrap();
        assert!(prefix.join("bin/python").is_file());
    }

    #[test]
    fn test_python_version_from_specs() {
        let pm = FakePackageManager::new();
        let prefix = pm.env_path("a");
        let request = ProvisionRequest::new(&prefix, ["python=3.8", "numpy==1.2"])
            .with_channels(["bioconda"]);

        with_env("0", || provision(&strict(), &pm, &request)).unwrap();

        let calls = pm.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].prefix, prefix);
        assert_eq!(calls[0].python_version, "3.8");
        assert_eq!(calls[0].specs, ["python=3.8", "numpy=1.2"]);
        assert_eq!(calls[0].channels, ["bioconda"]);
    }

    #[test]
    fn test_python_spec_with_spaces() {
        let pm = FakePackageManager::new();
        let request = ProvisionRequest::new(pm.env_path("a"), ["python =3.9", "numpy=1.2"]);

        with_env("0", || provision(&lenient(), &pm, &request)).unwrap();

        let calls = pm.calls.borrow();
        assert_eq!(calls[0].python_version, "3.9");
        assert_eq!(calls[0].specs, ["python=3.9", "numpy=1.2"]);
    }

    #[test]
    fn test_unprepared_directory_is_not_left_behind() {
        let pm = FakePackageManager::new();
        let blocker = pm.root.path().join("blocker");
        fs_err::write(&blocker, "").unwrap();
        let prefix = blocker.join("env");
        let request = ProvisionRequest::new(&prefix, ["numpy=1.2"]);

        let err = with_env("0", || provision(&strict(), &pm, &request)).unwrap_err();
        assert_matches!(err, ProvisionError::Io { ref path, .. } if path == &prefix);
        assert!(!prefix.exists());
        assert!(blocker.is_file());
        assert!(pm.calls.borrow().is_empty());
    }

    #[test]
    fn test_python_version_falls_back_to_base() {
        let pm = FakePackageManager::new();
        let request = ProvisionRequest::new(pm.env_path("a"), ["numpy=1.2"]);

        with_env("0", || provision(&strict(), &pm, &request)).unwrap();

        let calls = pm.calls.borrow();
        assert_eq!(calls[0].python_version, "3.11.4");
        assert_eq!(calls[0].specs, ["python=3.11.4", "numpy=1.2"]);
        assert_eq!(calls[0].channels, ["conda-forge"]);
    }

    #[test]
    fn test_base_installation_is_active_during_create() {
        let pm = FakePackageManager::new();
        let request = ProvisionRequest::new(pm.env_path("a"), ["numpy=1.2"]);

        with_env("0", || {
            provision(&strict(), &pm, &request).unwrap();
            assert!(std::env::var_os("CONDA_PREFIX").is_none());
        });

        let expected = pm.root.path().to_string_lossy().into_owned();
        assert_eq!(pm.calls.borrow()[0].conda_prefix, Some(expected));
    }

    #[test]
    fn test_reprovisioning_replaces_old_contents() {
        let pm = FakePackageManager::new();
        let prefix = pm.env_path("a");
        let request = ProvisionRequest::new(&prefix, ["pandas=1.4.3"]);

        with_env("0", || provision(&strict(), &pm, &request)).unwrap();
        fs_err::write(prefix.join("stale.txt"), "old").unwrap();

        with_env("0", || provision(&strict(), &pm, &request)).unwrap();
        assert!(prefix.join("bin/python").is_file());
        assert!(!prefix.join("stale.txt").exists());
    }

    #[test]
    fn test_package_manager_failure_rolls_back() {
        let mut pm = FakePackageManager::new();
        pm.fail_create = true;
        let prefix = pm.env_path("a");
        let request = ProvisionRequest::new(&prefix, ["pandas=1.4.3"]);

        let err = with_env("0", || provision(&strict(), &pm, &request)).unwrap_err();
        assert_matches!(err, ProvisionError::PackageManager(PackageManagerError::Spawn { .. }));
        assert!(!prefix.exists());
    }

    #[test]
    fn test_activation_is_restored_after_failure() {
        let mut pm = FakePackageManager::new();
        pm.fail_create = true;
        let request = ProvisionRequest::new(pm.env_path("a"), ["pandas=1.4.3"]);

        with_env("0", || {
            let path_before = std::env::var_os("PATH");
            provision(&strict(), &pm, &request).unwrap_err();
            assert_eq!(std::env::var_os("PATH"), path_before);
            assert!(std::env::var_os("CONDA_PREFIX").is_none());
        });
    }

    #[test]
    fn test_unpinned_pip_packages_roll_back() {
        let pm = FakePackageManager::new();
        let prefix = pm.env_path("a");
        let request = ProvisionRequest::new(&prefix, ["pandas=1.4.3"])
            .with_pip(["requests", "idna==3.4", "urllib3=2.0.0"]);

        let err = with_env("0", || provision(&strict(), &pm, &request)).unwrap_err();
        assert_matches!(&err, ProvisionError::Validation(e) if e.specs == ["requests", "urllib3=2.0.0"]);
        assert_eq!(pm.calls.borrow().len(), 1);
        assert!(!prefix.exists());
        assert!(pm.pip_calls().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_pip_packages_installed_in_one_invocation() {
        let pm = FakePackageManager::new();
        let prefix = pm.env_path("a");
        let request = ProvisionRequest::new(&prefix, ["pandas=1.4.3"])
            .with_pip(["requests==2.31.0", "idna==3.4"]);
        let config = ProvisionConfig {
            pip: PipConfig {
                extra_args: vec!["--no-deps".to_string()],
                ..PipConfig::default()
            },
            ..ProvisionConfig::default()
        };

        with_env("0", || provision(&config, &pm, &request)).unwrap();
        assert_eq!(
            pm.pip_calls(),
            ["-m pip install --no-deps requests==2.31.0 idna==3.4"]
        );
        assert!(prefix.is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn test_pip_failure_rolls_back() {
        let pm = FakePackageManager::new();
        let prefix = pm.env_path("a");
        let request =
            ProvisionRequest::new(&prefix, ["pandas=1.4.3"]).with_pip(["requests==2.31.0"]);

        let err = with_env("1", || provision(&strict(), &pm, &request)).unwrap_err();
        assert_matches!(err, ProvisionError::PipInstall { .. });
        assert_eq!(
            err.to_string(),
            "failed to install additional packages via pip"
        );
        assert!(!prefix.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_local_paths_installed_one_at_a_time() {
        let pm = FakePackageManager::new();
        let prefix = pm.env_path("a");
        let request = ProvisionRequest::new(&prefix, ["pandas=1.4.3"])
            .with_paths(["/src/first", "/src/second"]);

        with_env("0", || provision(&strict(), &pm, &request)).unwrap();
        assert_eq!(
            pm.pip_calls(),
            [
                "-m pip install /src/first",
                "-m pip install /src/second"
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_local_install_failure_is_fatal_by_default() {
        let pm = FakePackageManager::new();
        let prefix = pm.env_path("a");
        let request =
            ProvisionRequest::new(&prefix, ["pandas=1.4.3"]).with_paths(["/src/broken"]);

        let err = with_env("1", || provision(&strict(), &pm, &request)).unwrap_err();
        assert_matches!(err, ProvisionError::LocalInstall { ref path, .. } if path == Path::new("/src/broken"));
        assert!(!prefix.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_local_install_failure_can_be_lenient() {
        let pm = FakePackageManager::new();
        let prefix = pm.env_path("a");
        let request = ProvisionRequest::new(&prefix, ["pandas=1.4.3"])
            .with_paths(["/src/broken", "/src/other"]);
        let config = ProvisionConfig {
            pip: PipConfig {
                local_install_failure: Some(LocalInstallPolicy::Warn),
                ..PipConfig::default()
            },
            ..ProvisionConfig::default()
        };

        with_env("1", || provision(&config, &pm, &request)).unwrap();
        assert!(prefix.join("bin/python").is_file());
        assert_eq!(pm.pip_calls().len(), 2);
    }

    #[test]
    fn test_missing_interpreter_rolls_back() {
        let pm = FakePackageManager::new();
        let prefix = pm.env_path("a");
        let request =
            ProvisionRequest::new(&prefix, ["pandas=1.4.3"]).with_pip(["requests==2.31.0"]);

        // An interpreter that vanished after creation.
        let err = with_env("0", || {
            struct NoPython<'a>(&'a FakePackageManager);
            impl PackageManager for NoPython<'_> {
                fn base_prefix(&self) -> &Path {
                    self.0.base_prefix()
                }
                fn layout(&self) -> PrefixLayout {
                    PrefixLayout::Unix
                }
                fn base_python_version(&self) -> Result<String, PackageManagerError> {
                    self.0.base_python_version()
                }
                fn create_environment(
                    &self,
                    request: &CreateEnvironment<'_>,
                ) -> Result<(), PackageManagerError> {
                    self.0.create_environment(request)?;
                    fs_err::remove_file(request.prefix.join("bin/python")).unwrap();
                    Ok(())
                }
                fn list_packages(
                    &self,
                    prefix: &Path,
                ) -> Result<Vec<InstalledPackage>, PackageManagerError> {
                    self.0.list_packages(prefix)
                }
            }
            provision(&strict(), &NoPython(&pm), &request)
        })
        .unwrap_err();

        assert_matches!(err, ProvisionError::InterpreterNotFound(_));
        assert!(!prefix.exists());
    }

    #[test]
    fn test_rollback_guard() {
        let tdir = TempDir::new().unwrap();
        let kept = tdir.path().join("kept");
        let removed = tdir.path().join("removed");
        fs_err::create_dir_all(&kept).unwrap();
        fs_err::create_dir_all(removed.join("nested")).unwrap();

        RollbackGuard::new(&kept).disarm();
        drop(RollbackGuard::new(&removed));

        assert!(kept.exists());
        assert!(!removed.exists());
    }

    #[test]
    fn test_request_builder_normalizes() {
        let request = ProvisionRequest::new("/envs/a", ["pandas==1.4.3"])
            .with_pip(["requests==2.31.0"])
            .with_paths(["/src/pkg"]);
        assert_eq!(request.packages, [PackageSpec::new("pandas=1.4.3")]);
        assert_eq!(request.pip, [PipSpec::new("requests==2.31.0")]);
        assert_eq!(request.paths, [PathBuf::from("/src/pkg")]);
        assert_eq!(request.channels, None);
    }
}
