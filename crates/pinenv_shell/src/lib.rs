//! This crate provides helpers to activate a conda prefix for the duration of
//! a scope and to restore the previous process environment afterwards.
#![deny(missing_docs)]

pub mod activation;
pub mod guard;

pub use activation::{ActivationError, ActivationResult, ActivationVariables, Activator};
pub use guard::{activate, deactivate, ActivationGuard, PreviousState};
