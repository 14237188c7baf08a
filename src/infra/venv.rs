//! Runtime environment provisioning
//!
//! Creates an isolated Python environment under the checkout and installs
//! the pinned package set into it. Everything is idempotent: re-creating an
//! existing environment upgrades its package manager instead of failing.

use std::path::{Path, PathBuf};

use crate::config::defaults;
use crate::core::context::ProgressSink;
use crate::error::ProvisionError;
use crate::infra::process;

/// Provisions the isolated interpreter environment for a checkout
#[derive(Debug)]
pub struct RuntimeProvisioner {
    /// Interpreter used to create the environment
    python: PathBuf,
    /// Show subprocess output
    verbose: bool,
}

impl RuntimeProvisioner {
    /// Create a provisioner around a verified interpreter
    pub fn new(python: PathBuf, verbose: bool) -> Self {
        Self { python, verbose }
    }

    /// Interpreter the provisioner was built with
    pub fn python(&self) -> &Path {
        &self.python
    }

    /// Create (or refresh) the virtual environment under the checkout
    ///
    /// Returns the environment root. Idempotent; an existing environment is
    /// reused with its package manager upgraded.
    pub fn provision(&self, checkout: &Path) -> Result<PathBuf, ProvisionError> {
        let venv_path = checkout.join(defaults::VENV_DIR);

        // Some distributions resolve lib64 oddly unless it exists up front
        std::fs::create_dir_all(venv_path.join("lib64")).map_err(|e| ProvisionError::Io {
            path: venv_path.join("lib64"),
            error: e.to_string(),
        })?;

        tracing::info!(path = %venv_path.display(), "Creating venv");
        let venv_str = venv_path.to_string_lossy();
        process::run(
            &self.python.to_string_lossy(),
            vec!["-m", "venv", "--upgrade-deps", venv_str.as_ref()],
            None,
            self.verbose,
        )
        .map_err(|e| ProvisionError::CreateFailed {
            path: venv_path.clone(),
            error: e.to_string(),
        })?;

        Ok(venv_path)
    }

    /// Install the package list into the environment, in order
    ///
    /// Each install runs strictly inside the environment
    /// (`--require-virtualenv`); the first failure aborts and propagates.
    pub fn install(
        &self,
        venv_path: &Path,
        packages: &[&str],
        progress: &dyn ProgressSink,
    ) -> Result<(), ProvisionError> {
        let pip = venv_bin(venv_path).join("pip");
        let pip_str = pip.to_string_lossy();

        tracing::info!("Installing Python packages to venv");
        let handle = progress.start("Installing packages", packages.len() as u64);
        for (index, package) in packages.iter().enumerate() {
            process::run(
                pip_str.as_ref(),
                vec!["install", "--require-virtualenv", "--no-input", package],
                None,
                self.verbose,
            )
            .map_err(|e| ProvisionError::InstallFailed {
                package: (*package).to_string(),
                error: e.to_string(),
            })?;
            handle.set(index as u64 + 1);
        }
        handle.finish();
        Ok(())
    }

    /// Run a script inside the checkout with the environment's interpreter
    pub fn run_script(&self, venv_path: &Path, script: &Path) -> Result<(), ProvisionError> {
        let python = venv_python(venv_path);
        let script_str = script.to_string_lossy();
        process::run(
            &python.to_string_lossy(),
            vec![script_str.as_ref()],
            script.parent(),
            self.verbose,
        )
        .map_err(|e| ProvisionError::HookFailed {
            script: script.to_path_buf(),
            error: e.to_string(),
        })
    }
}

/// Binary directory of a virtual environment
pub fn venv_bin(venv_path: &Path) -> PathBuf {
    if cfg!(windows) {
        venv_path.join("Scripts")
    } else {
        venv_path.join("bin")
    }
}

/// Interpreter inside a virtual environment
pub fn venv_python(venv_path: &Path) -> PathBuf {
    if cfg!(windows) {
        venv_bin(venv_path).join("python.exe")
    } else {
        venv_bin(venv_path).join("python3")
    }
}

/// Locate an interpreter matching the required `major.minor` version
///
/// Tries a version-suffixed binary first, then the generic names, verifying
/// each candidate's reported version.
pub fn find_interpreter(required: &str) -> Result<PathBuf, ProvisionError> {
    let (req_major, req_minor) =
        parse_major_minor(required).ok_or_else(|| ProvisionError::InterpreterNotFound {
            required: required.to_string(),
        })?;

    let suffixed = format!("python{req_major}.{req_minor}");
    let mut last_found: Option<String> = None;

    for candidate in [suffixed.as_str(), "python3", "python"] {
        let Ok(path) = which::which(candidate) else {
            continue;
        };
        let Some(version) = interpreter_version(&path) else {
            continue;
        };
        match parse_major_minor(&version) {
            Some((major, minor)) if (major, minor) == (req_major, req_minor) => {
                tracing::info!(%version, "Python OK");
                return Ok(path);
            }
            _ => last_found = Some(version),
        }
    }

    match last_found {
        Some(found) => Err(ProvisionError::InterpreterVersion {
            required: format!("{req_major}.{req_minor}"),
            found,
        }),
        None => Err(ProvisionError::InterpreterNotFound {
            required: required.to_string(),
        }),
    }
}

/// Version reported by an interpreter binary (`X.Y.Z`)
fn interpreter_version(python: &Path) -> Option<String> {
    let out = process::output(&python.to_string_lossy(), vec!["--version"], None).ok()?;
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr)
    );
    // "Python 3.12.2" -> "3.12.2"
    text.split_whitespace()
        .find(|token| token.chars().next().is_some_and(|c| c.is_ascii_digit()))
        .map(String::from)
}

fn parse_major_minor(version: &str) -> Option<(u32, u32)> {
    let mut parts = version.split('.');
    let major = parts.next()?.trim().parse().ok()?;
    let minor = parts.next()?.trim().parse().ok()?;
    Some((major, minor))
}
