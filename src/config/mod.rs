//! Configuration constants and URL construction

pub mod defaults;
pub mod urls;
