//! Error types for courseup
//!
//! Domain-specific error types using thiserror. Leaf components raise these
//! with enough context (URL, path, command) for the orchestrator to classify
//! them as fatal or soft.

use std::path::PathBuf;
use thiserror::Error;

/// Conditional download and cache errors
#[derive(Error, Debug)]
pub enum DownloadError {
    /// Network error
    #[error("Network error downloading '{url}': {error}")]
    Network { url: String, error: String },

    /// Unexpected HTTP status
    #[error("Download failed for '{url}': HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// IO error on the cache directory
    #[error("IO error for '{path}': {error}")]
    Io { path: PathBuf, error: String },

    /// Cache metadata could not be serialized or parsed
    #[error("Invalid cache metadata at '{path}': {error}")]
    Metadata { path: PathBuf, error: String },
}

/// Archive extraction errors
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Archive could not be opened or parsed
    #[error("Failed to open archive '{path}': {error}")]
    Open { path: PathBuf, error: String },

    /// Archive has no members
    #[error("Archive '{path}' is empty")]
    Empty { path: PathBuf },

    /// A member could not be read
    #[error("Failed to read archive member '{name}': {error}")]
    Member { name: String, error: String },

    /// IO error writing extracted content
    #[error("IO error for '{path}': {error}")]
    Io { path: PathBuf, error: String },
}

/// Git operation errors
#[derive(Error, Debug)]
pub enum GitError {
    /// Clone never succeeded within the time budget
    #[error("Failed to clone '{url}' within {timeout_secs}s")]
    CloneTimedOut { url: String, timeout_secs: u64 },

    /// A git command failed
    #[error("git {command} failed: {error}")]
    CommandFailed { command: String, error: String },

    /// Stash pop produced merge conflicts
    #[error(
        "Merge conflict while re-applying stashed changes. \
         Your local changes are still stashed; resolve conflicts manually"
    )]
    StashConflict,

    /// Path is not a git repository
    #[error("Not a git repository: {path}")]
    NotARepository { path: PathBuf },
}

/// Runtime environment provisioning errors
#[derive(Error, Debug)]
pub enum ProvisionError {
    /// No suitable interpreter on the system
    #[error("Python {required} required, but no matching interpreter was found")]
    InterpreterNotFound { required: String },

    /// Interpreter found but wrong version
    #[error("Python {required} required, found {found}")]
    InterpreterVersion { required: String, found: String },

    /// Environment creation failed
    #[error("Failed to create virtual environment at '{path}': {error}")]
    CreateFailed { path: PathBuf, error: String },

    /// A package install failed
    #[error("Failed to install package '{package}': {error}")]
    InstallFailed { package: String, error: String },

    /// Post-install hook failed
    #[error("Post-install script '{script}' failed: {error}")]
    HookFailed { script: PathBuf, error: String },

    /// IO error
    #[error("IO error for '{path}': {error}")]
    Io { path: PathBuf, error: String },
}

/// Release selection and fetch errors
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// Releases API request failed
    #[error("Failed to query releases API '{url}': {error}")]
    Api { url: String, error: String },

    /// No release passed the filters
    #[error("No matching release found")]
    NoMatch,

    /// User-supplied label regex is invalid
    #[error("Invalid label pattern '{pattern}': {error}")]
    InvalidPattern { pattern: String, error: String },

    /// Asset download or unpack failed
    #[error("Failed to fetch asset '{name}': {error}")]
    Asset { name: String, error: String },
}

/// Top-level courseup error type
///
/// The pipeline orchestrator wraps leaf errors into this; `main` prints one
/// message per fatal error and exits non-zero.
#[derive(Error, Debug)]
pub enum SetupError {
    /// Target base directory does not exist
    #[error("Target folder '{path}' does not exist")]
    BaseMissing { path: PathBuf },

    /// Clone requested but git is unavailable
    #[error("git command not found, cannot clone project")]
    GitRequired,

    /// Clone destination exists and is not a repository
    #[error("Cannot clone: '{path}' exists and is not a git repository")]
    CloneDestinationBlocked { path: PathBuf },

    /// Download error
    #[error("Download error: {0}")]
    Download(#[from] DownloadError),

    /// Extraction error
    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    /// Git error
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    /// Provisioning error
    #[error("Provisioning error: {0}")]
    Provision(#[from] ProvisionError),

    /// Release error
    #[error("Release error: {0}")]
    Release(#[from] ReleaseError),

    /// IO error
    #[error("IO error for '{path}': {error}")]
    Io { path: PathBuf, error: String },
}
