//! Editor extension reconciliation
//!
//! Drives the editor's CLI to install and uninstall extensions. The
//! reconciliation is fire-and-forget per extension: failures are collected
//! and summarized after the batch, never aborting it. The editor's actual
//! installed set is never read back.

use std::time::Duration;

use crate::config::defaults;
use crate::core::context::ProgressSink;
use crate::core::editor::ExtensionSet;
use crate::infra::process;

/// Editor CLI command name
pub const EDITOR_COMMAND: &str = "code";

/// Names that failed to install or uninstall during a reconcile pass
#[derive(Debug, Default)]
pub struct ReconcileReport {
    /// Extensions whose install failed
    pub failed_installs: Vec<String>,
    /// Extensions whose uninstall failed (includes "not installed")
    pub failed_uninstalls: Vec<String>,
}

impl ReconcileReport {
    /// True when every operation succeeded
    pub fn is_clean(&self) -> bool {
        self.failed_installs.is_empty() && self.failed_uninstalls.is_empty()
    }
}

/// Reconcile the desired extension state against the editor
///
/// Pinned entries request their exact version; unpinned entries force a
/// reinstall of the latest. The batch always runs to completion.
pub fn reconcile(
    set: &ExtensionSet,
    verbose: bool,
    progress: &dyn ProgressSink,
) -> ReconcileReport {
    let total = (set.install.len() + set.uninstall.len()) as u64;
    let handle = progress.start("Managing editor extensions", total);
    let mut report = ReconcileReport::default();
    let mut done: u64 = 0;

    for spec in &set.install {
        let result = match &spec.version {
            Some(version) => {
                let pinned = format!("{}@{}", spec.name, version);
                process::run(
                    EDITOR_COMMAND,
                    vec!["--install-extension", pinned.as_str()],
                    None,
                    verbose,
                )
            }
            None => process::run(
                EDITOR_COMMAND,
                vec!["--install-extension", spec.name.as_str(), "--force"],
                None,
                verbose,
            ),
        };
        if let Err(e) = result {
            tracing::debug!(extension = %spec.name, error = %e, "Install failed");
            report.failed_installs.push(spec.name.clone());
        }
        std::thread::sleep(Duration::from_millis(defaults::EXTENSION_SETTLE_MS));
        done += 1;
        handle.set(done);
    }

    for name in &set.uninstall {
        let result = process::run(
            EDITOR_COMMAND,
            vec!["--uninstall-extension", name.as_str()],
            None,
            verbose,
        );
        if let Err(e) = result {
            tracing::debug!(extension = %name, error = %e, "Uninstall failed");
            report.failed_uninstalls.push(name.clone());
        }
        std::thread::sleep(Duration::from_millis(defaults::EXTENSION_SETTLE_MS));
        done += 1;
        handle.set(done);
    }

    handle.finish();
    report
}
