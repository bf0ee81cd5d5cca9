//! Computes the environment variables that activate a conda prefix.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use pinenv_types::PrefixLayout;

/// Variables that leak configuration of other interpreters into the prefix
/// and are therefore removed on activation.
const ISOLATION_UNSET_VARS: &[&str] = &["PYTHONPATH", "PYTHONHOME"];

/// The values of the environment variables that are relevant for the
/// activation process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivationVariables {
    /// The value of the `CONDA_PREFIX` environment variable that contains the
    /// activated conda prefix path
    pub conda_prefix: Option<PathBuf>,

    /// The value of the `PATH` environment variable that contains the paths to
    /// the executables
    pub path: Option<Vec<PathBuf>>,
}

impl ActivationVariables {
    /// Reads the variables from the current process environment.
    pub fn from_env() -> Self {
        Self {
            conda_prefix: std::env::var_os("CONDA_PREFIX")
                .filter(|prefix| !prefix.is_empty())
                .map(PathBuf::from),
            path: std::env::var_os("PATH").map(|p| std::env::split_paths(&p).collect()),
        }
    }
}

/// Errors raised while computing an activation.
#[derive(thiserror::Error, Debug)]
pub enum ActivationError {
    /// Reading the prefix failed.
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    /// A variable file is not valid JSON.
    #[error("failed to parse {1:?}: {0}")]
    InvalidEnvVarFileJson(serde_json::Error, PathBuf),

    /// A file in `etc/conda/env_vars.d` is valid JSON but not an object.
    #[error("{} must contain a JSON object", .file.display())]
    InvalidEnvVarFileJsonNoObject {
        /// The offending file.
        file: PathBuf,
    },

    /// `conda-meta/state` has no `env_vars` object.
    #[error("{} does not contain an `env_vars` object", .file.display())]
    InvalidEnvVarFileStateFile {
        /// The offending file.
        file: PathBuf,
    },

    /// A `PATH` entry contains the platform path separator.
    #[error("cannot build PATH: {0}")]
    InvalidPath(#[from] std::env::JoinPathsError),
}

/// Holds the values needed to activate a conda prefix: the directories to put
/// on `PATH` and the variables the installed packages ask for.
#[derive(Debug, Clone)]
pub struct Activator {
    /// The path to the root of the conda environment
    pub target_prefix: PathBuf,

    /// The directory layout of the prefix
    pub layout: PrefixLayout,

    /// Paths that need to be added to the PATH environment variable
    pub paths: Vec<PathBuf>,

    /// Environment variables set by the packages of the environment
    pub env_vars: IndexMap<String, String>,
}

/// The result of [`Activator::activation`]: the complete `PATH`, the variables
/// to set and the variables to remove.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivationResult {
    /// The new value of `PATH`, activated entries first.
    pub path: Vec<PathBuf>,

    /// Variables to set, in order.
    pub set_vars: IndexMap<String, String>,

    /// Variables to remove.
    pub unset_vars: Vec<String>,
}

impl ActivationResult {
    /// Returns the names of every variable this activation touches,
    /// including `PATH`.
    pub fn touched_vars(&self) -> impl Iterator<Item = &str> + '_ {
        std::iter::once("PATH")
            .chain(self.set_vars.keys().map(String::as_str))
            .chain(self.unset_vars.iter().map(String::as_str))
    }
}

/// Reads the variables packages of `prefix` ask to have set.
///
/// `etc/conda/env_vars.d/*.json` files are applied in file name order, then
/// the `env_vars` table of `conda-meta/state` (the variables a user set with
/// `conda env config vars`). Later sources win; keys from the state file are
/// upper-cased.
fn collect_env_vars(prefix: &Path) -> Result<IndexMap<String, String>, ActivationError> {
    let mut env_vars = IndexMap::new();
    read_env_var_dir(&prefix.join("etc/conda/env_vars.d"), &mut env_vars)?;
    read_state_file(&prefix.join("conda-meta/state"), &mut env_vars)?;
    Ok(env_vars)
}

fn read_env_var_dir(
    dir: &Path,
    env_vars: &mut IndexMap<String, String>,
) -> Result<(), ActivationError> {
    if !dir.is_dir() {
        return Ok(());
    }

    let mut files = fs_err::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect::<Vec<_>>();
    files.sort();

    for file in files {
        let json: serde_json::Value = serde_json::from_str(&fs_err::read_to_string(&file)?)
            .map_err(|err| ActivationError::InvalidEnvVarFileJson(err, file.clone()))?;
        let Some(object) = json.as_object() else {
            return Err(ActivationError::InvalidEnvVarFileJsonNoObject { file });
        };
        insert_string_values(object, &file, env_vars, |key| key.to_string());
    }
    Ok(())
}

fn read_state_file(
    file: &Path,
    env_vars: &mut IndexMap<String, String>,
) -> Result<(), ActivationError> {
    if !file.is_file() {
        return Ok(());
    }

    let json: serde_json::Value = serde_json::from_str(&fs_err::read_to_string(file)?)
        .map_err(|err| ActivationError::InvalidEnvVarFileJson(err, file.to_path_buf()))?;
    let Some(object) = json.get("env_vars").and_then(serde_json::Value::as_object) else {
        return Err(ActivationError::InvalidEnvVarFileStateFile {
            file: file.to_path_buf(),
        });
    };
    insert_string_values(object, file, env_vars, str::to_uppercase);
    Ok(())
}

fn insert_string_values(
    object: &serde_json::Map<String, serde_json::Value>,
    source: &Path,
    env_vars: &mut IndexMap<String, String>,
    key_fn: impl Fn(&str) -> String,
) {
    for (key, value) in object {
        match value.as_str() {
            Some(value) => {
                env_vars.insert(key_fn(key), value.to_string());
            }
            None => tracing::warn!(
                "ignoring {key} from {}, its value is not a string",
                source.display()
            ),
        }
    }
}

impl Activator {
    /// Create a new activator for the conda environment at `path`.
    ///
    /// A prefix that does not exist yields an activator without package
    /// variables, so a previously activated prefix that has since been
    /// deleted can still be deactivated.
    pub fn from_path(path: &Path, layout: PrefixLayout) -> Result<Activator, ActivationError> {
        let env_vars = collect_env_vars(path)?;
        let paths = layout.path_entries(path);

        Ok(Activator {
            target_prefix: path.to_path_buf(),
            layout,
            paths,
            env_vars,
        })
    }

    /// Computes the variables that activate this prefix given the current
    /// state. A prefix that is already active (`CONDA_PREFIX`) is deactivated
    /// first: its `PATH` entries are dropped and its variables removed.
    pub fn activation(
        &self,
        variables: ActivationVariables,
    ) -> Result<ActivationResult, ActivationError> {
        let mut path_elements = variables.path.unwrap_or_default();
        let mut unset_vars = Vec::new();

        if let Some(conda_prefix) = variables.conda_prefix {
            let deactivate = Activator::from_path(&conda_prefix, self.layout)?;
            unset_vars.extend(deactivate.env_vars.into_keys());
            path_elements.retain(|x| !deactivate.paths.contains(x));
        }

        // prepend new paths
        let path = [self.paths.clone(), path_elements].concat();

        let mut set_vars = IndexMap::new();
        set_vars.insert(
            "CONDA_PREFIX".to_string(),
            self.target_prefix.to_string_lossy().into_owned(),
        );
        set_vars.extend(self.env_vars.clone());

        unset_vars.extend(ISOLATION_UNSET_VARS.iter().map(|var| var.to_string()));
        unset_vars.retain(|var| !set_vars.contains_key(var));
        unset_vars.dedup();

        Ok(ActivationResult {
            path,
            set_vars,
            unset_vars,
        })
    }
}
