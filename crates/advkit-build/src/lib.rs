//! Script compilation and execution against the packaging tool.
//!
//! Turns user-supplied, macro-laden build parameters into a validated,
//! ordered command script, writes it to a transient file in the tool's
//! required encoding, runs the provisioned binary and reports the
//! captured outcome. Also home to the local `HostExecutor` adapter.

pub mod aip;
pub mod compiler;
pub mod executor;
pub mod host;

pub use aip::AipReader;
pub use compiler::{compile, resolve};
pub use executor::ScriptExecutor;
pub use host::LocalHost;
