use itertools::Itertools;
use regex::Regex;
use thiserror::Error;

/// Raised when one or more specifiers do not carry an explicit version pin.
///
/// The message lists every offending specifier, quoted and comma separated,
/// in the order they were checked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "version numbers must be explicitly specified for: {}",
    .specs.iter().map(|spec| format!("'{spec}'")).join(", ")
)]
pub struct VersionGateError {
    /// The specifiers that failed the check.
    pub specs: Vec<String>,
}

/// Checks that a list of specifiers pins exact versions.
///
/// A gate pairs a pattern with an on/off switch. When the gate is disabled
/// [`VersionGate::check`] always succeeds, which is meant for development
/// sessions where unpinned packages are acceptable.
///
/// ```
/// use pinenv_types::VersionGate;
///
/// let gate = VersionGate::conda();
/// assert!(gate.check(["pandas=1.4.3"]).is_ok());
/// assert!(gate.check(["pandas"]).is_err());
/// assert!(gate.enabled(false).check(["pandas"]).is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct VersionGate {
    pattern: Regex,
    enabled: bool,
}

impl VersionGate {
    /// Constructs an enabled gate that requires every specifier to contain a
    /// match of `pattern`.
    pub fn new(pattern: Regex) -> Self {
        Self {
            pattern,
            enabled: true,
        }
    }

    /// A gate for conda specifiers: a name character, a single `=` and a digit.
    /// Range operators such as `>=`, `<=`, `!=` or `~=` do not count as a pin.
    pub fn conda() -> Self {
        Self::new(Regex::clone(lazy_regex::regex!(r"[^=<>~!]=[0-9]")))
    }

    /// A gate for pip specifiers: a name character, `==` and a digit.
    pub fn pip() -> Self {
        Self::new(Regex::clone(lazy_regex::regex!(r"[^=<>~!]==[0-9]")))
    }

    /// Switches the gate on or off.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Returns whether the gate is enforced.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Checks all `specs`, reporting every one that does not match.
    pub fn check<I, S>(&self, specs: I) -> Result<(), VersionGateError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if !self.enabled {
            return Ok(());
        }

        let failed = specs
            .into_iter()
            .filter(|spec| !self.pattern.is_match(spec.as_ref()))
            .map(|spec| spec.as_ref().to_string())
            .collect::<Vec<_>>();

        if failed.is_empty() {
            Ok(())
        } else {
            Err(VersionGateError { specs: failed })
        }
    }
}
