use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// The directory layout of a conda prefix. Windows prefixes keep the
/// interpreter at the root and executables in `Scripts`, every other platform
/// uses `bin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrefixLayout {
    /// `bin/python`, executables in `bin`.
    Unix,
    /// `python.exe`, executables in `Scripts` and `Library/bin`.
    Windows,
}

impl PrefixLayout {
    /// Returns the layout used by the platform this binary was compiled for.
    pub const fn current() -> Self {
        if cfg!(windows) {
            PrefixLayout::Windows
        } else {
            PrefixLayout::Unix
        }
    }

    /// Returns true for [`PrefixLayout::Windows`].
    pub fn is_windows(self) -> bool {
        matches!(self, PrefixLayout::Windows)
    }

    /// The location of the python interpreter relative to the prefix.
    pub fn python_path(self) -> &'static Path {
        match self {
            PrefixLayout::Unix => Path::new("bin/python"),
            PrefixLayout::Windows => Path::new("python.exe"),
        }
    }

    /// The directories of a prefix that should be on `PATH` when the prefix
    /// is activated, in the order they should appear.
    pub fn path_entries(self, prefix: &Path) -> Vec<PathBuf> {
        match self {
            PrefixLayout::Windows => vec![
                prefix.to_path_buf(),
                prefix.join("Library/mingw-w64/bin"),
                prefix.join("Library/usr/bin"),
                prefix.join("Library/bin"),
                prefix.join("Scripts"),
                prefix.join("bin"),
            ],
            PrefixLayout::Unix => vec![prefix.join("bin")],
        }
    }

    /// Given the path of an executable that lives inside a prefix (e.g.
    /// `<prefix>/bin/conda` or `<prefix>/condabin/conda.bat`) return the prefix.
    /// Returns `None` when the executable is not inside one of the executable
    /// directories of a prefix.
    pub fn prefix_of_executable(self, executable: &Path) -> Option<PathBuf> {
        let parent = executable.parent()?;
        let dir_name = parent.file_name()?.to_str()?;
        if self.is_windows() && parent.ends_with("Library/bin") {
            return parent.parent()?.parent().map(Path::to_path_buf);
        }
        let in_bin_dir = match self {
            PrefixLayout::Unix => matches!(dir_name, "bin" | "condabin"),
            PrefixLayout::Windows => matches!(dir_name, "Scripts" | "condabin" | "bin"),
        };
        if in_bin_dir {
            parent.parent().map(Path::to_path_buf)
        } else {
            None
        }
    }
}

impl Default for PrefixLayout {
    fn default() -> Self {
        Self::current()
    }
}
