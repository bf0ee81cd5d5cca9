//! Applies an activation to the current process and undoes it again.
//!
//! Activation mutates process wide state. Callers that provision
//! environments concurrently from multiple threads must serialize the
//! activation scope themselves.

use std::ffi::OsString;
use std::path::Path;

use indexmap::IndexMap;
use pinenv_types::PrefixLayout;

use crate::activation::{ActivationError, ActivationVariables, Activator};

/// The values of every variable an activation touched, captured before the
/// activation was applied. `None` means the variable was not set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviousState {
    vars: IndexMap<String, Option<OsString>>,
}

impl PreviousState {
    /// Returns the captured value of `key`, `Some(None)` if it was unset and
    /// `None` if the activation did not touch it.
    pub fn get(&self, key: &str) -> Option<Option<&OsString>> {
        self.vars.get(key).map(Option::as_ref)
    }
}

/// Activates `activator` in the current process and returns the state needed
/// to undo it with [`deactivate`].
pub fn activate(
    activator: &Activator,
    variables: ActivationVariables,
) -> Result<PreviousState, ActivationError> {
    let result = activator.activation(variables)?;
    let path = std::env::join_paths(&result.path)?;

    let vars = result
        .touched_vars()
        .map(|key| (key.to_string(), std::env::var_os(key)))
        .collect();

    tracing::debug!("activating {}", activator.target_prefix.display());
    std::env::set_var("PATH", path);
    for (key, value) in &result.set_vars {
        std::env::set_var(key, value);
    }
    for key in &result.unset_vars {
        std::env::remove_var(key);
    }

    Ok(PreviousState { vars })
}

/// Restores the variables captured by [`activate`].
pub fn deactivate(previous: PreviousState) {
    for (key, value) in previous.vars {
        match value {
            Some(value) => std::env::set_var(&key, value),
            None => std::env::remove_var(&key),
        }
    }
}

/// Keeps a prefix activated for as long as the guard is alive. Dropping the
/// guard restores the previous state, including when the scope is left by
/// an error or a panic.
#[derive(Debug)]
#[must_use = "the prefix is deactivated as soon as the guard is dropped"]
pub struct ActivationGuard {
    previous: Option<PreviousState>,
}

impl ActivationGuard {
    /// Activates `activator` using the current process environment as the
    /// starting point.
    pub fn enter(activator: &Activator) -> Result<Self, ActivationError> {
        Ok(Self {
            previous: Some(activate(activator, ActivationVariables::from_env())?),
        })
    }

    /// Shorthand for building an [`Activator`] for `prefix` and entering it.
    pub fn enter_prefix(prefix: &Path, layout: PrefixLayout) -> Result<Self, ActivationError> {
        Self::enter(&Activator::from_path(prefix, layout)?)
    }

    /// The state that will be restored when the guard is dropped.
    pub fn previous_state(&self) -> Option<&PreviousState> {
        self.previous.as_ref()
    }
}

impl Drop for ActivationGuard {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            deactivate(previous);
        }
    }
}
