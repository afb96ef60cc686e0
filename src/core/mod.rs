//! Core building blocks shared by all commands
//!
//! - **config**: affected.toml parsing and validation
//! - **context**: project context built once per invocation
//! - **error**: error types with contextual help messages and exit codes
//! - **manifest**: go.mod module declaration lookup
//! - **vcs**: changed files from git (SystemGit)

pub mod config;
pub mod context;
pub mod error;
pub mod manifest;
pub mod vcs;
