use crate::error::ContextError;
use crate::store::{FileThemeStore, MemoryThemeStore, ThemeStore};
use configuration::{Config, DisplaySettings, OutputFormat, Theme};

/// Everything a render needs besides the result itself.
pub struct AppContext {
    theme: Theme,
    display: DisplaySettings,
    output_format: OutputFormat,
    store: Box<dyn ThemeStore>,
}

impl AppContext {
    /// Builds the context, preferring a previously stored theme over the configured default.
    pub fn new(config: &Config, store: Box<dyn ThemeStore>) -> Result<Self, ContextError> {
        let theme = store.load()?.unwrap_or(config.defaults.theme);
        Ok(Self {
            theme,
            display: config.display.clone(),
            output_format: config.defaults.output_format,
            store,
        })
    }

    /// Uses a file store when `context.theme_store` is configured, memory otherwise.
    pub fn from_config(config: &Config) -> Result<Self, ContextError> {
        let store: Box<dyn ThemeStore> = match &config.context.theme_store {
            Some(path) => Box::new(FileThemeStore::new(path)),
            None => Box::new(MemoryThemeStore::new()),
        };
        Self::new(config, store)
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn display(&self) -> &DisplaySettings {
        &self.display
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    /// Overrides the configured format for this run only.
    pub fn set_output_format(&mut self, format: OutputFormat) {
        self.output_format = format;
    }

    /// Switches between light and dark and persists the new theme.
    pub fn toggle_theme(&mut self) -> Result<Theme, ContextError> {
        let next = self.theme.toggled();
        self.store.store(next)?;
        tracing::info!(from = ?self.theme, to = ?next, "Theme toggled");
        self.theme = next;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    /// Shares one memory store between the context and the test.
    struct Shared(Rc<MemoryThemeStore>);

    impl ThemeStore for Shared {
        fn load(&self) -> Result<Option<Theme>, ContextError> {
            self.0.load()
        }

        fn store(&self, theme: Theme) -> Result<(), ContextError> {
            self.0.store(theme)
        }
    }

    #[test]
    fn falls_back_to_configured_theme() {
        let mut config = Config::default();
        config.defaults.theme = Theme::Dark;
        let ctx = AppContext::new(&config, Box::new(MemoryThemeStore::new())).unwrap();
        assert_eq!(ctx.theme(), Theme::Dark);
    }

    #[test]
    fn stored_theme_wins_over_config() {
        let config = Config::default();
        let ctx = AppContext::new(&config, Box::new(MemoryThemeStore::with_theme(Theme::Dark))).unwrap();
        assert_eq!(ctx.theme(), Theme::Dark);
    }

    #[test]
    fn toggle_persists_through_the_store() {
        let store = Rc::new(MemoryThemeStore::new());
        let mut ctx = AppContext::new(&Config::default(), Box::new(Shared(store.clone()))).unwrap();

        assert_eq!(ctx.toggle_theme().unwrap(), Theme::Dark);
        assert_eq!(store.load().unwrap(), Some(Theme::Dark));
        assert_eq!(ctx.toggle_theme().unwrap(), Theme::Light);
        assert_eq!(store.load().unwrap(), Some(Theme::Light));
    }

    #[test]
    fn file_backed_context_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.context.theme_store = Some(dir.path().join("theme.json"));

        let mut first = AppContext::from_config(&config).unwrap();
        first.toggle_theme().unwrap();

        let second = AppContext::from_config(&config).unwrap();
        assert_eq!(second.theme(), Theme::Dark);
    }
}
