use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{StorageError, TemplateError};
use crate::history::HistoryLog;
use crate::settings::Settings;

const DATA_DIR: &str = ".caseman";
const SETTINGS_FILE: &str = "settings.json";
const HISTORY_FILE: &str = "history.jsonl";
const TEMPLATES_DIR: &str = "templates";
const TEMPLATE_EXTENSION: &str = "json";

/// The on-disk home of settings, history and saved templates.
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    /// `.caseman` under the current working directory.
    pub fn current() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::at(cwd.join(DATA_DIR))
    }

    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.root.join(TEMPLATES_DIR)
    }

    pub fn history_log(&self) -> HistoryLog {
        HistoryLog::new(self.root.join(HISTORY_FILE))
    }

    pub fn load_settings(&self) -> Result<Settings, StorageError> {
        let file = self.root.join(SETTINGS_FILE);
        if !file.exists() {
            return Ok(Settings::default());
        }

        let raw = fs::read_to_string(&file).map_err(|e| StorageError::io(&file, e))?;
        serde_json::from_str(&raw).map_err(|source| StorageError::Parse { path: file, source })
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<(), StorageError> {
        self.ensure()?;
        let file = self.root.join(SETTINGS_FILE);
        let raw = serde_json::to_string_pretty(settings).map_err(|source| StorageError::Serialize {
            what: "settings",
            source,
        })?;
        fs::write(&file, raw).map_err(|e| StorageError::io(&file, e))?;
        debug!(path = %file.display(), "settings saved");
        Ok(())
    }

    /// Resolve a template argument: an existing file path wins, otherwise the
    /// name of a saved template.
    pub fn resolve_template(&self, reference: &str) -> Result<PathBuf, TemplateError> {
        let direct = Path::new(reference);
        if direct.is_file() {
            return Ok(direct.to_path_buf());
        }

        let saved = self.templates_dir().join(format!("{reference}.{TEMPLATE_EXTENSION}"));
        if saved.is_file() {
            return Ok(saved);
        }

        Err(TemplateError::NotFound(direct.to_path_buf()))
    }

    /// Names of saved templates, sorted.
    pub fn list_templates(&self) -> Result<Vec<String>, StorageError> {
        let dir = self.templates_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&dir).map_err(|e| StorageError::io(&dir, e))? {
            let path = entry.map_err(|e| StorageError::io(&dir, e))?.path();
            if path.extension().is_some_and(|ext| ext == TEMPLATE_EXTENSION) {
                if let Some(stem) = path.file_stem() {
                    names.push(stem.to_string_lossy().into_owned());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn ensure(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root).map_err(|e| StorageError::io(&self.root, e))
    }
}

/// Save rendered report text to a file.
pub fn save_report(path: &Path, rendered: &str) -> Result<(), StorageError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
    }
    fs::write(path, rendered).map_err(|e| StorageError::io(path, e))
}
