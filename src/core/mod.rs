//! Core logic
//!
//! Pipeline orchestration, release selection, and the typed configuration
//! models. Subprocess and network side effects live in [`crate::infra`];
//! this module decides what to run and how failures are classified.

pub mod context;
pub mod doctor;
pub mod editor;
pub mod pipeline;
pub mod release;
