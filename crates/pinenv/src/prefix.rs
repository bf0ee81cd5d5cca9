use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use pinenv_types::PrefixLayout;

/// Returns the location of the python interpreter of the environment at
/// `prefix`. The file is not required to exist.
pub fn python_executable(prefix: &Path, layout: PrefixLayout) -> PathBuf {
    prefix.join(layout.python_path())
}

/// Removes whatever exists at `path`: a directory tree, a file or a symlink.
/// A missing path is not an error.
pub fn remove_path(path: &Path) -> std::io::Result<()> {
    match fs_err::symlink_metadata(path) {
        Ok(metadata) if metadata.is_dir() => fs_err::remove_dir_all(path),
        Ok(_) => fs_err::remove_file(path),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err),
    }
}

/// A conda environment on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentPrefix {
    path: PathBuf,
    layout: PrefixLayout,
}

impl EnvironmentPrefix {
    /// Refers to the environment at `path` without touching the filesystem.
    pub fn new(path: impl Into<PathBuf>, layout: PrefixLayout) -> Self {
        Self {
            path: path.into(),
            layout,
        }
    }

    /// Get a reference to the prefix path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The directory layout of the prefix.
    pub fn layout(&self) -> PrefixLayout {
        self.layout
    }

    /// Returns where the interpreter of this environment lives.
    pub fn python_executable(&self) -> PathBuf {
        python_executable(&self.path, self.layout)
    }

    /// Returns true if the interpreter exists.
    pub fn has_python(&self) -> bool {
        self.python_executable().is_file()
    }

    /// Returns true if the prefix looks like a conda environment.
    pub fn is_conda_environment(&self) -> bool {
        self.path.join("conda-meta").is_dir()
    }
}

impl std::ops::Deref for EnvironmentPrefix {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.path
    }
}

impl AsRef<Path> for EnvironmentPrefix {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_python_executable() {
        assert_eq!(
            python_executable(Path::new("/envs/a"), PrefixLayout::Unix),
            PathBuf::from("/envs/a/bin/python")
        );
        assert_eq!(
            python_executable(Path::new("/envs/a"), PrefixLayout::Windows),
            PathBuf::from("/envs/a/python.exe")
        );
    }

    #[test]
    fn test_remove_path() {
        let tdir = TempDir::new().unwrap();

        let dir = tdir.path().join("env");
        fs::create_dir_all(dir.join("lib/site-packages")).unwrap();
        fs::write(dir.join("lib/site-packages/mod.py"), "").unwrap();
        remove_path(&dir).unwrap();
        assert!(!dir.exists());

        let file = tdir.path().join("file");
        fs::write(&file, "not an environment").unwrap();
        remove_path(&file).unwrap();
        assert!(!file.exists());

        remove_path(&tdir.path().join("missing")).unwrap();
    }

    #[test]
    fn test_environment_prefix() {
        let tdir = TempDir::new().unwrap();
        let env = EnvironmentPrefix::new(tdir.path(), PrefixLayout::Unix);
        assert!(!env.has_python());
        assert!(!env.is_conda_environment());

        fs::create_dir_all(tdir.path().join("bin")).unwrap();
        fs::create_dir_all(tdir.path().join("conda-meta")).unwrap();
        fs::write(tdir.path().join("bin/python"), "").unwrap();
        assert!(env.has_python());
        assert!(env.is_conda_environment());
        assert_eq!(env.path(), tdir.path());
    }
}
