use std::borrow::Cow;
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Rewrites the pip-style `==` equality operator into the single `=` that
/// conda expects. Any run of two or more `=` collapses into one, which makes
/// the function idempotent.
///
/// ```
/// use pinenv_types::normalize_spec;
///
/// assert_eq!(normalize_spec("pandas==1.4.3"), "pandas=1.4.3");
/// assert_eq!(normalize_spec("pandas=1.4.3"), "pandas=1.4.3");
/// ```
pub fn normalize_spec(spec: &str) -> Cow<'_, str> {
    lazy_regex::regex!(r"={2,}").replace_all(spec, "=")
}

/// Characters that terminate the name part of a specifier.
const NAME_TERMINATORS: &[char] = &['=', '<', '>', '!', '~', ' ', ';', '['];

fn name_part(spec: &str) -> &str {
    spec.find(NAME_TERMINATORS)
        .map_or(spec, |idx| &spec[..idx])
        .trim()
}

/// A conda package specifier such as `pandas=1.4.3`.
///
/// The specifier is normalized on construction (see [`normalize_spec`]), so
/// `pandas==1.4.3` and `pandas=1.4.3` compare equal. Construction never fails:
/// whether a specifier carries a proper version pin is decided by a
/// [`crate::VersionGate`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PackageSpec(String);

impl PackageSpec {
    /// Constructs a new normalized specifier.
    pub fn new(spec: impl AsRef<str>) -> Self {
        Self(normalize_spec(spec.as_ref()).into_owned())
    }

    /// Returns the normalized specifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the package name, i.e. everything before the first operator.
    pub fn name(&self) -> &str {
        name_part(&self.0)
    }

    /// Returns the exact version when the name is directly followed by `=`.
    /// Range operators such as `>=` yield `None`.
    pub fn version(&self) -> Option<&str> {
        let rest = self.0.trim_start().strip_prefix(self.name())?;
        rest.trim_start()
            .strip_prefix('=')
            .map(str::trim)
            .filter(|version| !version.is_empty())
    }

    /// Returns true if this specifier refers to the python interpreter itself.
    pub fn is_python(&self) -> bool {
        self.name() == "python"
    }
}

impl From<String> for PackageSpec {
    fn from(value: String) -> Self {
        if value.contains("==") {
            Self::new(value)
        } else {
            Self(value)
        }
    }
}

impl From<&str> for PackageSpec {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<PackageSpec> for String {
    fn from(value: PackageSpec) -> Self {
        value.0
    }
}

impl FromStr for PackageSpec {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl AsRef<str> for PackageSpec {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for PackageSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns the version of the first specifier that pins python exactly.
///
/// ```
/// use pinenv_types::{python_version, PackageSpec};
///
/// let specs = [PackageSpec::new("python=3.8"), PackageSpec::new("numpy=1.2")];
/// assert_eq!(python_version(&specs), Some("3.8"));
/// assert_eq!(python_version(&specs[1..]), None);
/// ```
pub fn python_version(specs: &[PackageSpec]) -> Option<&str> {
    specs
        .iter()
        .filter(|spec| spec.is_python())
        .find_map(PackageSpec::version)
}

/// A specifier that is handed verbatim to `pip install`, e.g. `requests==2.31.0`.
///
/// Unlike [`PackageSpec`] no normalization takes place: pip uses `==` for
/// exact pins.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PipSpec(String);

impl PipSpec {
    /// Constructs a new pip specifier.
    pub fn new(spec: impl Into<String>) -> Self {
        Self(spec.into())
    }

    /// Returns the specifier as passed to pip.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for PipSpec {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for PipSpec {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl FromStr for PipSpec {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl AsRef<str> for PipSpec {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for PipSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
