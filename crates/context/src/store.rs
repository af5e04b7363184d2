use crate::error::ContextError;
use configuration::Theme;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Load/store capability for the persisted theme preference.
pub trait ThemeStore {
    /// Returns the saved theme, or `None` if nothing has been saved yet.
    fn load(&self) -> Result<Option<Theme>, ContextError>;

    fn store(&self, theme: Theme) -> Result<(), ContextError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredPreferences {
    theme: Theme,
}

/// Persists the theme as `{"theme": "dark"}` in a JSON file.
#[derive(Debug, Clone)]
pub struct FileThemeStore {
    path: PathBuf,
}

impl FileThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> ContextError {
        ContextError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl ThemeStore for FileThemeStore {
    fn load(&self) -> Result<Option<Theme>, ContextError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };
        let stored: StoredPreferences =
            serde_json::from_str(&contents).map_err(|source| ContextError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        Ok(Some(stored.theme))
    }

    fn store(&self, theme: Theme) -> Result<(), ContextError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let json = serde_json::to_string_pretty(&StoredPreferences { theme })?;
        fs::write(&self.path, json).map_err(|e| self.io_error(e))?;
        tracing::debug!(path = %self.path.display(), ?theme, "Theme saved");
        Ok(())
    }
}

/// Keeps the theme for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct MemoryThemeStore {
    theme: Cell<Option<Theme>>,
}

impl MemoryThemeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_theme(theme: Theme) -> Self {
        Self {
            theme: Cell::new(Some(theme)),
        }
    }
}

impl ThemeStore for MemoryThemeStore {
    fn load(&self) -> Result<Option<Theme>, ContextError> {
        Ok(self.theme.get())
    }

    fn store(&self, theme: Theme) -> Result<(), ContextError> {
        self.theme.set(Some(theme));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_round_trips_and_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileThemeStore::new(dir.path().join("prefs").join("theme.json"));

        assert_eq!(store.load().unwrap(), None);
        store.store(Theme::Dark).unwrap();
        assert_eq!(store.load().unwrap(), Some(Theme::Dark));

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"dark\""));
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theme.json");
        fs::write(&path, "{ not json").unwrap();

        let err = FileThemeStore::new(&path).load().unwrap_err();
        assert!(matches!(err, ContextError::Corrupt { .. }));
    }

    #[test]
    fn memory_store_starts_empty() {
        let store = MemoryThemeStore::new();
        assert_eq!(store.load().unwrap(), None);
        store.store(Theme::Light).unwrap();
        assert_eq!(store.load().unwrap(), Some(Theme::Light));
    }
}
