//! Default configuration values

use std::path::PathBuf;

/// Required Python interpreter version (major.minor is what matters)
pub const PYTHON_VERSION: &str = "3.12";

/// Virtual environment directory name inside the checkout
pub const VENV_DIR: &str = "venv";

/// Overall time budget for the clone retry loop (in seconds)
pub const CLONE_TIMEOUT_SECS: u64 = 15;

/// Sleep between clone attempts (in seconds)
pub const CLONE_RETRY_INTERVAL_SECS: u64 = 1;

/// Stash message used by the updater so operators can recognize it
pub const AUTOSTASH_MESSAGE: &str = "autostash before update";

/// Optional hook script run with the provisioned interpreter after setup
pub const POST_INSTALL_SCRIPT: &str = "update.py";

/// Files always refreshed during extraction, regardless of overwrite policy
pub const FORCE_OVERWRITE_FILES: &[&str] = &["update.py"];

/// Pause between editor extension operations (the editor CLI misbehaves
/// when invoked back to back)
pub const EXTENSION_SETTLE_MS: u64 = 500;

/// Packages installed into the virtual environment, in order
pub const PACKAGES: &[&str] = &[
    "ipykernel",
    "ipywidgets",
    "jupyterlab-latex",
    "matplotlib",
    "plotly",
    "numpy",
    "pandas",
    "scikit-learn",
    "func_timeout",
    "bpython",
    "mypy",
    "nbformat",
    "pooch",
    "tqdm",
    "pandas-stubs",
    "scipy-stubs",
    "ipympl",
];

/// Editor extensions to install (pinned versions are known to work together)
pub const EXTENSIONS_INSTALL: &[&str] = &[
    "ms-python.python@2025.12.0",
    "ms-python.black-formatter@2025.2.0",
    "ms-python.mypy-type-checker@2025.2.0",
    "ms-toolsai.jupyter@2025.7.0",
    "matangover.mypy@0.4.2",
    "jock.svg@1.5.4",
];

/// Editor extensions to remove
pub const EXTENSIONS_UNINSTALL: &[&str] = &["formulahendry.code-runner"];

/// Environment variable overriding the cache directory
pub const ENV_CACHE_DIR: &str = "COURSEUP_CACHE_DIR";

/// Environment variable overriding the target base directory
pub const ENV_BASE_DIR: &str = "COURSEUP_DIR";

/// Default base directory where the course folder is created
pub fn default_base() -> PathBuf {
    if let Ok(dir) = std::env::var(ENV_BASE_DIR) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Desktop")
        .join("myfiles")
}

/// Process-wide download cache directory
///
/// Lifecycle spans runs; only `courseup cache clean` removes it.
pub fn cache_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(ENV_CACHE_DIR) {
        return PathBuf::from(dir);
    }
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("courseup")
}
