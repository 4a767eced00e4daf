//! cdr-cli
//!
//! Configuration and logging setup for the `cdr` binary.

pub mod config;
pub mod logging;
