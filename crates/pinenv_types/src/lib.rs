#![deny(missing_docs)]
//! `pinenv_types` contains the small data types shared by the pinenv crates:
//! package specifiers with pinned versions, the checks that enforce those pins
//! and the on-disk layout of an environment prefix.

mod layout;
mod package_spec;
mod version_gate;

pub use layout::PrefixLayout;
pub use package_spec::{normalize_spec, python_version, PackageSpec, PipSpec};
pub use version_gate::{VersionGate, VersionGateError};
