//! Build and serve a Rust crate compiled to WebAssembly.
//!
//! [`Rig::build`] compiles the crate for the wasm target and runs the
//! bindings generator; [`Rig::serve`] does that when the output directory is
//! missing and then runs a static file server over the result. Helper tools
//! are installed on first use.

pub mod cli;
pub mod config;
pub mod errors;
mod orchestrator;
pub mod project;
pub mod runner;
pub mod tools;

#[cfg(test)]
mod test_utils;

pub use config::Config;
pub use errors::RigError;
pub use orchestrator::Rig;
