//! Layered configuration for the command-line front end.
//!
//! Values are resolved from lowest to highest precedence: built-in defaults, the TOML file given
//! with `--config`, `--set KEY=VALUE` overrides, then dedicated command-line flags.

pub mod builder;
pub mod defaults;
pub mod file;
pub mod models;
