//! # mmaictl
//!
//! Command-line client for the MMAI platform-management API.
//!
//! ```text
//! argv ──► cli ──► dispatch ──► resource (descriptor → RequestSpec) ──► api ──► output
//! ```
//!
//! Every subcommand is a thin instantiation of one resource descriptor; see
//! [`resource`] for the table and [`dispatch`] for how an invocation runs.

pub mod api;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod output;
pub mod resource;

pub use cli::{Cli, Invocation};
pub use config::{Config, Session};
pub use error::CliError;
pub use output::OutputMode;

/// Version injected at compile time via MMAICTL_VERSION env var (set by CI/CD),
/// or the package version for local builds.
pub const VERSION: &str = match option_env!("MMAICTL_VERSION") {
    Some(v) => v,
    None => env!("CARGO_PKG_VERSION"),
};
