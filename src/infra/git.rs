//! Git operations
//!
//! Clones and updates the checkout through the external git client. The
//! updater is built around a stash/reset/pop sequence so that upstream
//! state wins over local history without ever discarding uncommitted edits.

use std::path::Path;
use std::time::Duration;

use crate::config::defaults;
use crate::core::context::ProgressSink;
use crate::error::GitError;
use crate::infra::clock::Clock;
use crate::infra::process;

/// Marker directory probed to decide whether a checkout is a git repository
pub const REPO_MARKER: &str = ".git";

/// True if the path contains a git repository marker
pub fn is_repository(path: &Path) -> bool {
    path.join(REPO_MARKER).is_dir()
}

fn command_failed(command: &str, error: impl ToString) -> GitError {
    GitError::CommandFailed {
        command: command.to_string(),
        error: error.to_string(),
    }
}

/// Clone a repository with bounded-time retry
///
/// Attempts a clone (shallow, single-branch, depth 1 unless `deep`) and on
/// failure sleeps a fixed interval and retries until `timeout` elapses.
/// Transient network flakiness on first-time setup is absorbed here; the
/// hard ceiling guarantees failures surface instead of hanging forever.
pub fn clone_with_retry(
    url: &str,
    dest: &Path,
    timeout: Duration,
    deep: bool,
    clock: &dyn Clock,
    verbose: bool,
    progress: &dyn ProgressSink,
) -> Result<(), GitError> {
    let handle = progress.start("Cloning", timeout.as_secs());
    let start = clock.now();
    let mut attempt: u64 = 0;
    let dest_str = dest.to_string_lossy();

    while clock.now().duration_since(start) < timeout {
        let result = if deep {
            process::run("git", vec!["clone", url, dest_str.as_ref()], None, verbose)
        } else {
            process::run(
                "git",
                vec![
                    "clone",
                    "--depth",
                    "1",
                    "--single-branch",
                    url,
                    dest_str.as_ref(),
                ],
                None,
                verbose,
            )
        };

        match result {
            Ok(()) => {
                handle.finish();
                return Ok(());
            }
            Err(e) => {
                attempt += 1;
                tracing::debug!(url, attempt, error = %e, "Clone attempt failed");
                handle.set(attempt);
                clock.sleep(Duration::from_secs(defaults::CLONE_RETRY_INTERVAL_SECS));
            }
        }
    }
    handle.finish();

    // A partially-created destination from a failed attempt is left for the
    // caller; only a completely absent destination is fatal here
    if dest.exists() {
        Ok(())
    } else {
        Err(GitError::CloneTimedOut {
            url: url.to_string(),
            timeout_secs: timeout.as_secs(),
        })
    }
}

/// Advance an existing checkout to the remote tip of its current branch
///
/// Safe to run with uncommitted local changes: they are stashed first and
/// re-applied after the reset. A conflicting re-apply raises
/// [`GitError::StashConflict`] and leaves the stash in place.
pub fn update(checkout: &Path, verbose: bool) -> Result<(), GitError> {
    if !is_repository(checkout) {
        return Err(GitError::NotARepository {
            path: checkout.to_path_buf(),
        });
    }
    let cwd = Some(checkout);

    // 1. Stash local changes if any
    process::run(
        "git",
        vec!["stash", "push", "-m", defaults::AUTOSTASH_MESSAGE],
        cwd,
        verbose,
    )
    .map_err(|e| command_failed("stash push", e))?;

    // 2. Fetch tags (moved tags are not updated)
    process::run("git", vec!["fetch", "--tags"], cwd, verbose)
        .map_err(|e| command_failed("fetch --tags", e))?;

    // 3. Fetch latest from origin
    process::run("git", vec!["fetch", "origin"], cwd, verbose)
        .map_err(|e| command_failed("fetch origin", e))?;

    // 4. Reset current branch to match remote (remote wins)
    let branch = current_branch(checkout)?;
    let remote_ref = format!("origin/{branch}");
    process::run(
        "git",
        vec!["reset", "--hard", remote_ref.as_str()],
        cwd,
        verbose,
    )
    .map_err(|e| command_failed("reset --hard", e))?;

    // 5. Re-apply stashed changes if possible; a non-zero exit is inspected
    //    rather than treated as failure outright
    let pop = process::output_unchecked("git", vec!["stash", "pop"], cwd)
        .map_err(|e| command_failed("stash pop", e))?;

    let stdout = String::from_utf8_lossy(&pop.stdout).to_lowercase();
    let stderr = String::from_utf8_lossy(&pop.stderr).to_lowercase();
    if stdout.contains("conflict") || stderr.contains("conflict") {
        return Err(GitError::StashConflict);
    }

    Ok(())
}

/// Name of the branch currently checked out
pub fn current_branch(checkout: &Path) -> Result<String, GitError> {
    let out = process::output(
        "git",
        vec!["rev-parse", "--abbrev-ref", "HEAD"],
        Some(checkout),
    )
    .map_err(|e| command_failed("rev-parse", e))?;
    Ok(String::from_utf8_lossy(&out.stdout).trim().to_string())
}
