//! Per-run context
//!
//! One [`SetupContext`] is constructed per invocation and passed explicitly
//! to every component. Nothing reads ambient global state.

use std::path::PathBuf;

use crate::config::defaults;

/// Observational progress reporting for a long-running stage
///
/// Implementations render however they like (terminal bar, nothing at all);
/// correctness never depends on these callbacks.
pub trait ProgressSink: Send + Sync {
    /// Start a new progress task with a known number of steps
    fn start(&self, message: &str, total: u64) -> Box<dyn ProgressHandle>;
}

/// Handle for a single in-flight progress task
pub trait ProgressHandle {
    /// Set the current position (steps completed)
    fn set(&self, position: u64);

    /// Finish and clear the task
    fn finish(&self);
}

/// Progress sink that renders nothing
///
/// Used by tests and non-interactive runs.
pub struct NullSink;

struct NullHandle;

impl ProgressSink for NullSink {
    fn start(&self, _message: &str, _total: u64) -> Box<dyn ProgressHandle> {
        Box::new(NullHandle)
    }
}

impl ProgressHandle for NullHandle {
    fn set(&self, _position: u64) {}
    fn finish(&self) {}
}

/// Explicit per-run context: cache location, verbosity, and output sink
pub struct SetupContext {
    /// Process-wide download cache directory
    pub cache_dir: PathBuf,
    /// Show subprocess output instead of suppressing it
    pub verbose: bool,
    /// Progress rendering
    pub progress: Box<dyn ProgressSink>,
}

impl SetupContext {
    /// Create a context with the default cache directory
    pub fn new(verbose: bool, progress: Box<dyn ProgressSink>) -> Self {
        Self {
            cache_dir: defaults::cache_dir(),
            verbose,
            progress,
        }
    }

    /// Create a context rooted at a specific cache directory
    pub fn with_cache_dir(cache_dir: PathBuf, verbose: bool, progress: Box<dyn ProgressSink>) -> Self {
        Self {
            cache_dir,
            verbose,
            progress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_sink_is_inert() {
        let sink = NullSink;
        let handle = sink.start("anything", 10);
        handle.set(5);
        handle.finish();
    }

    #[test]
    fn test_context_with_cache_dir() {
        let ctx = SetupContext::with_cache_dir(PathBuf::from("/tmp/x"), true, Box::new(NullSink));
        assert_eq!(ctx.cache_dir, PathBuf::from("/tmp/x"));
        assert!(ctx.verbose);
    }
}
