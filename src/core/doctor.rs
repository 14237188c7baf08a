//! Optional-tool detection
//!
//! Probes for the external tools the pipeline can use but does not require.
//! A missing tool soft-skips its dependent stage; it is never fatal here.

use crate::infra::process;

/// Check whether a command is available and report its version
///
/// Returns the extracted version string when the tool responds to
/// `--version`, `None` otherwise.
pub fn check_command_available(command: &str) -> Option<String> {
    which::which(command).ok()?;
    let out = process::output(command, vec!["--version"], None).ok()?;
    let combined = format!(
        "{}{}",
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr)
    );
    extract_version(&combined)
}

/// Extract a version string from command output
fn extract_version(output: &str) -> Option<String> {
    let version_regex = regex::Regex::new(r"v?(\d+\.\d+(?:\.\d+)?(?:-\w+)?)").ok()?;
    version_regex
        .captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Detect the git client
pub fn detect_git() -> Option<String> {
    match check_command_available("git") {
        Some(version) => {
            tracing::info!(%version, "Git OK");
            Some(version)
        }
        None => {
            tracing::warn!("Git not found");
            None
        }
    }
}

/// Detect the editor CLI
pub fn detect_editor() -> Option<String> {
    match check_command_available(crate::infra::editor::EDITOR_COMMAND) {
        Some(version) => {
            tracing::info!(%version, "Editor OK");
            Some(version)
        }
        None => {
            tracing::warn!("Editor not found (skipping extension setup)");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_version_plain() {
        assert_eq!(
            extract_version("git version 2.43.0"),
            Some("2.43.0".to_string())
        );
    }

    #[test]
    fn test_extract_version_two_part() {
        assert_eq!(extract_version("tool 1.2"), Some("1.2".to_string()));
    }

    #[test]
    fn test_extract_version_prefixed() {
        assert_eq!(
            extract_version("something v7.0.1 else"),
            Some("7.0.1".to_string())
        );
    }

    #[test]
    fn test_extract_version_none() {
        assert_eq!(extract_version("no digits here"), None);
    }

    #[test]
    fn test_check_missing_command() {
        assert_eq!(check_command_available("no-such-tool-xyz-123"), None);
    }
}
