//! # Tierhue CLI Library
//!
//! Command line front end over a JSON-file-backed Tierhue store.
//!
//! ## Modules
//!
//! - [`commands`] - Argument definitions and command execution
//! - [`config`] - Configuration loading and validation
//! - [`logger`] - Logging setup
//!
//! This library interface enables integration testing of the commands.

pub mod commands;
pub mod config;
pub mod logger;
