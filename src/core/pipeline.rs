//! Setup pipeline orchestration
//!
//! Sequences the provisioning stages into one idempotent run: obtain the
//! checkout (clone, archive, or update), provision the runtime environment,
//! configure the editor, and run the post-install hook. The orchestrator is
//! the only place that decides whether a failure is fatal or soft.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::{defaults, urls};
use crate::core::context::SetupContext;
use crate::core::{doctor, editor};
use crate::error::{GitError, SetupError};
use crate::infra::clock::SystemClock;
use crate::infra::editor as editor_cli;
use crate::infra::extract::{self, ExtractOptions};
use crate::infra::git;
use crate::infra::http_cache::CachedClient;
use crate::infra::venv::{self, RuntimeProvisioner};

/// How the checkout should be obtained when absent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloneMode {
    /// Download and extract the source archive (default)
    Archive,
    /// Shallow clone, main branch only
    Shallow,
    /// Full clone, all branches and history
    Deep,
}

/// What is currently on disk at the checkout path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutState {
    /// Nothing there yet
    Absent,
    /// A git repository
    GitRepo,
    /// A plain tree from archive extraction
    PlainTree,
}

/// Probe the checkout path
///
/// State is determined by the repository marker alone; nothing else tracks
/// it across runs.
pub fn checkout_state(path: &Path) -> CheckoutState {
    if git::is_repository(path) {
        CheckoutState::GitRepo
    } else if path.exists() {
        CheckoutState::PlainTree
    } else {
        CheckoutState::Absent
    }
}

/// Options for one setup run
#[derive(Debug, Clone)]
pub struct SetupOptions {
    /// Directory in which the course folder is created
    pub base: PathBuf,
    /// Clone-vs-archive decision for a missing checkout
    pub mode: CloneMode,
    /// Overwrite existing files when extracting from archive
    pub force: bool,
}

/// Run the whole setup pipeline
///
/// Safe to re-run: every stage either skips work already done or redoes it
/// without duplicating state.
pub async fn run(ctx: &SetupContext, options: &SetupOptions) -> Result<(), SetupError> {
    if !options.base.exists() {
        return Err(SetupError::BaseMissing {
            path: options.base.clone(),
        });
    }
    tracing::info!(path = %options.base.display(), "Base folder OK");

    let python = venv::find_interpreter(defaults::PYTHON_VERSION)?;
    let has_git = doctor::detect_git().is_some();
    let has_editor = doctor::detect_editor().is_some();

    let checkout = options.base.join(urls::course_name());
    let project = urls::project_url();

    obtain_checkout(ctx, options, &checkout, &project, has_git).await?;

    // No environment, no continuing: provisioning failures are fatal
    let provisioner = RuntimeProvisioner::new(python, ctx.verbose);
    let venv_path = provisioner.provision(&checkout)?;
    provisioner.install(&venv_path, defaults::PACKAGES, ctx.progress.as_ref())?;

    editor::write_project_config(&checkout, &venv_path).map_err(|e| SetupError::Io {
        path: checkout.join(".vscode"),
        error: e.to_string(),
    })?;
    if let Some(user_dir) = editor::user_config_dir() {
        editor::write_user_keybindings(&user_dir).map_err(|e| SetupError::Io {
            path: user_dir,
            error: e.to_string(),
        })?;
    }

    if has_editor {
        tracing::info!("Managing editor extensions (user level)");
        let report = editor_cli::reconcile(
            &editor::ExtensionSet::course_default(),
            ctx.verbose,
            ctx.progress.as_ref(),
        );
        for name in &report.failed_installs {
            tracing::warn!("Could not install editor extension '{name}'");
        }
        for name in &report.failed_uninstalls {
            tracing::warn!("Could not uninstall extension '{name}' (maybe not installed)");
        }
    }

    let hook = checkout.join(defaults::POST_INSTALL_SCRIPT);
    if hook.exists() {
        tracing::info!("Running post-install update");
        provisioner.run_script(&venv_path, &hook)?;
    }

    if has_editor {
        tracing::info!("Launching editor");
        let checkout_str = checkout.to_string_lossy();
        if let Err(e) = crate::infra::process::run(
            editor_cli::EDITOR_COMMAND,
            vec![checkout_str.as_ref()],
            None,
            ctx.verbose,
        ) {
            tracing::warn!("Could not launch editor: {e}");
        }
    }

    tracing::info!("Project setup complete");
    Ok(())
}

/// Bring the checkout into existence, or advance it
///
/// Decision rule: an existing repository is updated (failures there are
/// soft, the stash survives); a requested clone needs git and an
/// unobstructed destination; anything else goes through the archive
/// download and extraction.
async fn obtain_checkout(
    ctx: &SetupContext,
    options: &SetupOptions,
    checkout: &Path,
    project: &str,
    has_git: bool,
) -> Result<(), SetupError> {
    match checkout_state(checkout) {
        CheckoutState::GitRepo => {
            if has_git {
                tracing::info!(path = %checkout.display(), "Updating project");
                match git::update(checkout, ctx.verbose) {
                    Ok(()) => {}
                    // The conflict case is a warning state, not a crash:
                    // the stash is preserved for manual resolution
                    Err(e @ GitError::StashConflict) => {
                        tracing::error!("Update failed: {e}");
                        tracing::error!(
                            "Your local changes are still stashed. Resolve conflicts manually."
                        );
                    }
                    Err(e) => {
                        tracing::error!("Update failed: {e}");
                        tracing::error!(
                            "Your local changes may still be stashed. Resolve conflicts manually if needed."
                        );
                    }
                }
            } else {
                tracing::warn!("Git command not found, cannot update existing git project");
            }
        }
        state if options.mode != CloneMode::Archive => {
            if !has_git {
                return Err(SetupError::GitRequired);
            }
            if state == CheckoutState::PlainTree {
                return Err(SetupError::CloneDestinationBlocked {
                    path: checkout.to_path_buf(),
                });
            }
            tracing::info!(url = %project, "Cloning project");
            git::clone_with_retry(
                &urls::clone_url(project),
                checkout,
                Duration::from_secs(defaults::CLONE_TIMEOUT_SECS),
                options.mode == CloneMode::Deep,
                &SystemClock,
                ctx.verbose,
                ctx.progress.as_ref(),
            )?;
        }
        CheckoutState::Absent | CheckoutState::PlainTree => {
            let archive_url = urls::archive_url(project);
            tracing::info!(url = %archive_url, "Download archive");
            let client = CachedClient::new(ctx.cache_dir.clone());
            let archive = client.fetch(&archive_url).await?;

            tracing::info!(path = %checkout.display(), "Extract class materials");
            if checkout.exists() {
                if options.force {
                    tracing::warn!("Overwriting existing files");
                } else {
                    tracing::warn!("Existing files are not updated (use --force)");
                }
            }
            extract::extract(
                &archive,
                checkout,
                &ExtractOptions::new(options.force),
                ctx.progress.as_ref(),
            )?;
        }
    }
    Ok(())
}
