//! Archive extraction
//!
//! Unpacks source-code zip archives (GitHub style, single root folder) into
//! a target tree. The first top-level entry defines the root prefix, which
//! is stripped from every member. Existing files survive re-runs unless
//! overwrite is requested or the file is on the force-overwrite allowlist.

use std::collections::HashSet;
use std::fs::File;
use std::path::{Component, Path, PathBuf};

use crate::core::context::ProgressSink;
use crate::error::ExtractError;

/// Extraction policy
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Overwrite existing files
    pub overwrite: bool,
    /// Relative paths always refreshed regardless of `overwrite`
    pub force_overwrite: HashSet<String>,
}

impl ExtractOptions {
    /// Policy with the given overwrite flag and the default allowlist
    pub fn new(overwrite: bool) -> Self {
        Self {
            overwrite,
            force_overwrite: crate::config::defaults::FORCE_OVERWRITE_FILES
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

/// Counts of what an extraction did
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExtractStats {
    /// Files written
    pub written: usize,
    /// Existing files left untouched
    pub skipped: usize,
}

/// Extract an archive into `target`, stripping the root prefix
///
/// Directory entries are skipped; directories are created implicitly from
/// file paths. Progress is reported as a percentage of members processed
/// and has no effect on correctness.
pub fn extract(
    archive_path: &Path,
    target: &Path,
    options: &ExtractOptions,
    progress: &dyn ProgressSink,
) -> Result<ExtractStats, ExtractError> {
    let file = File::open(archive_path).map_err(|e| ExtractError::Open {
        path: archive_path.to_path_buf(),
        error: e.to_string(),
    })?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| ExtractError::Open {
        path: archive_path.to_path_buf(),
        error: e.to_string(),
    })?;

    if archive.is_empty() {
        return Err(ExtractError::Empty {
            path: archive_path.to_path_buf(),
        });
    }

    // Single-root-folder convention: the first entry names the prefix
    let root_prefix = {
        let first = archive.by_index(0).map_err(|e| ExtractError::Member {
            name: "<first>".to_string(),
            error: e.to_string(),
        })?;
        let top = first.name().split('/').next().unwrap_or("").to_string();
        format!("{top}/")
    };

    let total = archive.len() as u64;
    let handle = progress.start("Extracting", 100);
    let mut stats = ExtractStats::default();

    for index in 0..archive.len() {
        let mut member = archive.by_index(index).map_err(|e| ExtractError::Member {
            name: format!("#{index}"),
            error: e.to_string(),
        })?;

        if member.is_dir() {
            continue;
        }

        let name = member.name().to_string();
        let relative = name.strip_prefix(&root_prefix).unwrap_or(name.as_str());
        if relative.is_empty() {
            continue;
        }
        // Member paths must stay inside the target tree
        if escapes_target(relative) {
            return Err(ExtractError::Member {
                name,
                error: "path escapes the extraction target".to_string(),
            });
        }
        let target_path = target.join(relative);

        if options.overwrite
            || !target_path.exists()
            || options.force_overwrite.contains(relative)
        {
            write_member(&mut member, &target_path)?;
            stats.written += 1;
        } else {
            tracing::debug!(path = %target_path.display(), "Skipped existing file");
            stats.skipped += 1;
        }

        handle.set(100 * (index as u64 + 1) / total);
    }

    handle.finish();
    Ok(stats)
}

fn escapes_target(relative: &str) -> bool {
    let path = Path::new(relative);
    path.is_absolute()
        || path
            .components()
            .any(|component| !matches!(component, Component::Normal(_)))
}

fn write_member(member: &mut impl std::io::Read, target_path: &Path) -> Result<(), ExtractError> {
    if let Some(parent) = target_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ExtractError::Io {
            path: parent.to_path_buf(),
            error: e.to_string(),
        })?;
    }
    let mut out = File::create(target_path).map_err(|e| ExtractError::Io {
        path: target_path.to_path_buf(),
        error: e.to_string(),
    })?;
    std::io::copy(member, &mut out).map_err(|e| ExtractError::Io {
        path: target_path.to_path_buf(),
        error: e.to_string(),
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::NullSink;
    use assert_fs::prelude::*;
    use predicates::prelude::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    /// Build a zip with a single root folder, GitHub-archive style
    fn make_archive(dir: &Path, members: &[(&str, &str)]) -> PathBuf {
        let path = dir.join("archive.zip");
        let file = File::create(&path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = SimpleFileOptions::default();

        writer.add_directory("project-main/", options).unwrap();
        for (name, content) in members {
            writer
                .start_file(format!("project-main/{name}"), options)
                .unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
        path
    }

    #[test]
    fn test_extract_strips_root_prefix() {
        let temp = assert_fs::TempDir::new().unwrap();
        let archive = make_archive(temp.path(), &[("notes.md", "hello"), ("src/ex1.py", "pass")]);
        let target = temp.child("out");

        let stats = extract(
            &archive,
            target.path(),
            &ExtractOptions::new(false),
            &NullSink,
        )
        .unwrap();

        assert_eq!(stats.written, 2);
        target.child("notes.md").assert(predicate::path::exists());
        target.child("src/ex1.py").assert("pass");
        // The root folder itself must not appear in the target
        target
            .child("project-main")
            .assert(predicate::path::missing());
    }

    #[test]
    fn test_extract_preserves_existing_files_by_default() {
        let temp = assert_fs::TempDir::new().unwrap();
        let archive = make_archive(temp.path(), &[("notes.md", "upstream")]);
        let target = temp.child("out");
        target.child("notes.md").write_str("student edit").unwrap();

        let stats = extract(
            &archive,
            target.path(),
            &ExtractOptions::new(false),
            &NullSink,
        )
        .unwrap();

        assert_eq!(stats.skipped, 1);
        target.child("notes.md").assert("student edit");
    }

    #[test]
    fn test_extract_overwrite_replaces_existing_files() {
        let temp = assert_fs::TempDir::new().unwrap();
        let archive = make_archive(temp.path(), &[("notes.md", "upstream")]);
        let target = temp.child("out");
        target.child("notes.md").write_str("student edit").unwrap();

        extract(
            &archive,
            target.path(),
            &ExtractOptions::new(true),
            &NullSink,
        )
        .unwrap();

        target.child("notes.md").assert("upstream");
    }

    #[test]
    fn test_extract_force_overwrite_allowlist_always_refreshes() {
        let temp = assert_fs::TempDir::new().unwrap();
        let archive = make_archive(temp.path(), &[("update.py", "new hook"), ("kept.py", "new")]);
        let target = temp.child("out");
        target.child("update.py").write_str("old hook").unwrap();
        target.child("kept.py").write_str("student edit").unwrap();

        let stats = extract(
            &archive,
            target.path(),
            &ExtractOptions::new(false),
            &NullSink,
        )
        .unwrap();

        // update.py is on the allowlist, kept.py is not
        target.child("update.py").assert("new hook");
        target.child("kept.py").assert("student edit");
        assert_eq!(stats.written, 1);
        assert_eq!(stats.skipped, 1);
    }

    #[test]
    fn test_extract_is_idempotent() {
        let temp = assert_fs::TempDir::new().unwrap();
        let archive = make_archive(temp.path(), &[("a.py", "x"), ("b.py", "y")]);
        let target = temp.child("out");

        let first = extract(
            &archive,
            target.path(),
            &ExtractOptions::new(false),
            &NullSink,
        )
        .unwrap();
        let second = extract(
            &archive,
            target.path(),
            &ExtractOptions::new(false),
            &NullSink,
        )
        .unwrap();

        assert_eq!(first.written, 2);
        assert_eq!(second.written, 0);
        assert_eq!(second.skipped, 2);
    }

    #[test]
    fn test_extract_rejects_escaping_member_paths() {
        let temp = assert_fs::TempDir::new().unwrap();
        let path = temp.path().join("evil.zip");
        let file = File::create(&path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = SimpleFileOptions::default();
        writer.start_file("project-main/ok.txt", options).unwrap();
        writer.write_all(b"fine").unwrap();
        writer
            .start_file("project-main/../outside.txt", options)
            .unwrap();
        writer.write_all(b"escape").unwrap();
        writer.finish().unwrap();

        let target = temp.child("out");
        let result = extract(&path, target.path(), &ExtractOptions::new(false), &NullSink);

        assert!(matches!(result, Err(ExtractError::Member { .. })));
        // Nothing may land above the target directory
        temp.child("outside.txt").assert(predicate::path::missing());
    }

    #[test]
    fn test_extract_missing_archive_fails() {
        let temp = assert_fs::TempDir::new().unwrap();
        let result = extract(
            &temp.path().join("nope.zip"),
            temp.path(),
            &ExtractOptions::new(false),
            &NullSink,
        );
        assert!(matches!(result, Err(ExtractError::Open { .. })));
    }

    #[test]
    fn test_extract_empty_archive_fails() {
        let temp = assert_fs::TempDir::new().unwrap();
        let path = temp.path().join("empty.zip");
        let writer = zip::ZipWriter::new(File::create(&path).unwrap());
        writer.finish().unwrap();

        let result = extract(&path, temp.path(), &ExtractOptions::new(false), &NullSink);
        assert!(matches!(result, Err(ExtractError::Empty { .. })));
    }
}
