//! Infrastructure layer
//!
//! Handles all I/O operations: network, filesystem, and external processes.
//! This module is the only place where side effects occur.

pub mod clock;
pub mod editor;
pub mod extract;
pub mod git;
pub mod http_cache;
pub mod process;
pub mod venv;
