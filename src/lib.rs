//! Courseup - reproducible course environment provisioning
//!
//! This library brings a bare machine to a working course setup: a project
//! checkout, an isolated Python runtime with pinned packages, and editor
//! tooling. Every stage is idempotent, so the tool is safe to re-run after
//! partial failures or to pick up upstream updates.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Pipeline orchestration and release selection logic
//! - [`infra`] - Infrastructure layer (network, filesystem, subprocesses)
//! - [`config`] - Configuration and constants
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;
