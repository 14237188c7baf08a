//! Editor configuration model
//!
//! Typed structures for the editor's project settings, task definitions,
//! user keybindings, and the desired extension set. Everything is validated
//! at construction and only serialized to the editor's JSON documents at
//! the filesystem boundary.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::defaults;
use crate::infra::venv;

/// One desired extension, optionally pinned to a version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionSpec {
    /// Extension identifier (`publisher.name`)
    pub name: String,
    /// Pinned version, or latest when `None`
    pub version: Option<String>,
}

impl ExtensionSpec {
    /// Parse a `name` or `name@version` entry
    pub fn parse(entry: &str) -> Self {
        match entry.split_once('@') {
            Some((name, version)) => Self {
                name: name.to_string(),
                version: Some(version.to_string()),
            },
            None => Self {
                name: entry.to_string(),
                version: None,
            },
        }
    }
}

/// Desired editor extension state
#[derive(Debug, Clone, Default)]
pub struct ExtensionSet {
    /// Extensions to install
    pub install: Vec<ExtensionSpec>,
    /// Extensions to remove
    pub uninstall: Vec<String>,
}

impl ExtensionSet {
    /// The course's standard extension set
    pub fn course_default() -> Self {
        Self {
            install: defaults::EXTENSIONS_INSTALL
                .iter()
                .map(|entry| ExtensionSpec::parse(entry))
                .collect(),
            uninstall: defaults::EXTENSIONS_UNINSTALL
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

/// Project-level editor settings document
#[derive(Debug, Clone, Serialize)]
pub struct EditorSettings {
    #[serde(rename = "workbench.editor.showTabs")]
    show_tabs: String,
    #[serde(rename = "workbench.tree.indent")]
    tree_indent: u32,
    #[serde(rename = "python.venvFolders")]
    venv_folders: Vec<String>,
    #[serde(rename = "python.defaultInterpreterPath")]
    default_interpreter: String,
    #[serde(rename = "python.experiments.enabled")]
    experiments_enabled: bool,
    #[serde(rename = "python.terminal.activateEnvironment")]
    activate_environment: bool,
    #[serde(rename = "python.terminal.activateEnvInCurrentTerminal")]
    activate_in_current_terminal: bool,
    #[serde(rename = "[python]")]
    python_overrides: LanguageOverrides,
    #[serde(rename = "mypy.checkNotebooks")]
    mypy_check_notebooks: bool,
    #[serde(rename = "mypy.mypyExecutable")]
    mypy_executable: String,
    #[serde(rename = "mypy.dmypyExecutable")]
    dmypy_executable: String,
    #[serde(rename = "files.exclude")]
    files_exclude: BTreeMap<String, bool>,
    #[serde(rename = "files.watcherExclude")]
    watcher_exclude: BTreeMap<String, bool>,
    #[serde(rename = "search.exclude")]
    search_exclude: BTreeMap<String, bool>,
}

/// Per-language editor overrides
#[derive(Debug, Clone, Serialize)]
pub struct LanguageOverrides {
    #[serde(rename = "editor.formatOnSave")]
    format_on_save: bool,
    #[serde(rename = "editor.defaultFormatter")]
    default_formatter: String,
}

impl EditorSettings {
    /// Settings for a checkout with its venv
    ///
    /// The venv path is written relative to the workspace folder when it
    /// lives inside the checkout.
    pub fn for_checkout(checkout: &Path, venv_path: &Path) -> Self {
        let venv_subpath = venv_path.strip_prefix(checkout).unwrap_or(venv_path);
        let bin = venv::venv_bin(venv_subpath);
        let workspace_bin = |tool: &str| {
            PathBuf::from("${workspaceFolder}")
                .join(&bin)
                .join(tool)
                .to_string_lossy()
                .into_owned()
        };

        let hidden: BTreeMap<String, bool> = [
            "**/.env",
            "**/.git",
            "**/.DS_Store",
            "**/venv",
            "**/.mypy_cache",
            "**/.ipynb_checkpoints",
            "**/.__pycache__",
            "**/*.pyc",
        ]
        .into_iter()
        .map(|glob| (glob.to_string(), true))
        .collect();

        Self {
            show_tabs: "multiple".to_string(),
            tree_indent: 20,
            venv_folders: vec![defaults::VENV_DIR.to_string()],
            default_interpreter: workspace_bin("python"),
            experiments_enabled: false,
            activate_environment: true,
            activate_in_current_terminal: false,
            python_overrides: LanguageOverrides {
                format_on_save: true,
                default_formatter: "ms-python.black-formatter".to_string(),
            },
            mypy_check_notebooks: true,
            mypy_executable: workspace_bin("mypy"),
            dmypy_executable: workspace_bin("dmypy"),
            files_exclude: hidden.clone(),
            watcher_exclude: hidden.clone(),
            search_exclude: hidden,
        }
    }
}

/// Tasks document (`tasks.json`)
#[derive(Debug, Clone, Serialize)]
pub struct TasksFile {
    version: String,
    tasks: Vec<TaskDefinition>,
}

/// One task definition
#[derive(Debug, Clone, Serialize)]
pub struct TaskDefinition {
    label: String,
    #[serde(rename = "type")]
    kind: String,
    command: String,
    #[serde(rename = "problemMatcher")]
    problem_matcher: Vec<String>,
    presentation: TaskPresentation,
}

/// Task panel presentation
#[derive(Debug, Clone, Serialize)]
pub struct TaskPresentation {
    focus: bool,
    #[serde(rename = "showReuseMessage")]
    show_reuse_message: bool,
    echo: bool,
    panel: String,
}

impl TasksFile {
    /// The course tasks: an interactive interpreter in a dedicated panel
    pub fn for_venv(venv_path: &Path, checkout: &Path) -> Self {
        let venv_subpath = venv_path.strip_prefix(checkout).unwrap_or(venv_path);
        let shell = if cfg!(windows) { "bpython.exe" } else { "bpython" };
        let command = venv::venv_bin(venv_subpath).join(shell);

        Self {
            version: "2.0.0".to_string(),
            tasks: vec![TaskDefinition {
                label: "bpython".to_string(),
                kind: "process".to_string(),
                command: command.to_string_lossy().into_owned(),
                problem_matcher: Vec::new(),
                presentation: TaskPresentation {
                    focus: true,
                    show_reuse_message: true,
                    echo: false,
                    panel: "dedicated".to_string(),
                },
            }],
        }
    }
}

/// One user-level keybinding
#[derive(Debug, Clone, Serialize)]
pub struct KeyBinding {
    key: String,
    command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    args: Option<String>,
}

/// The course's user-level keybindings
pub fn course_keybindings() -> Vec<KeyBinding> {
    vec![
        KeyBinding {
            key: "ctrl+j".to_string(),
            command: "-workbench.action.togglePanel".to_string(),
            args: None,
        },
        KeyBinding {
            key: "ctrl+i".to_string(),
            command: "workbench.action.tasks.runTask".to_string(),
            args: Some("bpython".to_string()),
        },
        KeyBinding {
            key: "ctrl+j".to_string(),
            command: "workbench.action.tasks.runTask".to_string(),
            args: Some("jupyter".to_string()),
        },
    ]
}

/// Write the project-level editor configuration under `<checkout>/.vscode`
pub fn write_project_config(checkout: &Path, venv_path: &Path) -> std::io::Result<()> {
    tracing::info!("Configuring editor for project");

    // Stray workspace files shadow folder settings
    for entry in std::fs::read_dir(checkout)?.flatten() {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "code-workspace") {
            std::fs::remove_file(&path)?;
        }
    }

    let vscode_dir = checkout.join(".vscode");
    std::fs::create_dir_all(&vscode_dir)?;

    let settings = EditorSettings::for_checkout(checkout, venv_path);
    std::fs::write(
        vscode_dir.join("settings.json"),
        serde_json::to_string_pretty(&settings)?,
    )?;

    let tasks = TasksFile::for_venv(venv_path, checkout);
    std::fs::write(
        vscode_dir.join("tasks.json"),
        serde_json::to_string_pretty(&tasks)?,
    )?;

    Ok(())
}

/// Write user-level keybindings, replacing any existing file
///
/// A missing user configuration directory means the editor is not set up
/// for this user; the write is skipped silently.
pub fn write_user_keybindings(user_config_dir: &Path) -> std::io::Result<()> {
    if !user_config_dir.is_dir() {
        return Ok(());
    }
    tracing::info!("Configuring editor key bindings (user level)");
    let path = user_config_dir.join("keybindings.json");
    std::fs::write(path, serde_json::to_string_pretty(&course_keybindings())?)?;
    Ok(())
}

/// Editor user configuration directory for this platform
pub fn user_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("Code").join("User"))
}
