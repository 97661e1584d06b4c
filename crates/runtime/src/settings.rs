//! Persisted parry options.
//!
//! [`SettingsStore`] owns the TOML file on disk. [`SharedSettings`] is the
//! live copy: a settings UI writes through it at any time and the runtime
//! takes one snapshot per frame, so a frame never observes a half-applied
//! change.
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use parry_core::ParryConfig;

use crate::error::SettingsError;

/// TOML-backed storage for [`ParryConfig`].
#[derive(Clone, Debug)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored options.
    ///
    /// A missing file yields the defaults. Missing keys take their default
    /// value and numeric options are clamped into range.
    pub fn load(&self) -> Result<ParryConfig, SettingsError> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no settings file; using defaults");
            return Ok(ParryConfig::default());
        }

        let content = std::fs::read_to_string(&self.path).map_err(|source| SettingsError::Read {
            path: self.path.clone(),
            source,
        })?;
        let config: ParryConfig =
            toml::from_str(&content).map_err(|e| SettingsError::Parse {
                path: self.path.clone(),
                message: e.to_string(),
            })?;

        tracing::debug!(path = %self.path.display(), "loaded parry settings");
        Ok(config.clamped())
    }

    /// Loads the stored options, falling back to defaults on any error.
    pub fn load_or_default(&self) -> ParryConfig {
        self.load().unwrap_or_else(|error| {
            tracing::warn!(%error, "failed to load parry settings; using defaults");
            ParryConfig::default()
        })
    }

    /// Writes `config` (clamped), creating parent directories as needed.
    pub fn save(&self, config: &ParryConfig) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| SettingsError::Write {
                path: self.path.clone(),
                source,
            })?;
        }

        let encoded = toml::to_string_pretty(&config.clamped())
            .map_err(|e| SettingsError::Encode(e.to_string()))?;
        std::fs::write(&self.path, encoded).map_err(|source| SettingsError::Write {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!(path = %self.path.display(), "saved parry settings");
        Ok(())
    }
}

/// Live option set shared between the settings surface and the runtime.
#[derive(Clone, Debug, Default)]
pub struct SharedSettings {
    inner: Arc<RwLock<ParryConfig>>,
}

impl SharedSettings {
    pub fn new(config: ParryConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Copy of the current options for one frame.
    pub fn snapshot(&self) -> ParryConfig {
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Applies `change` atomically with respect to [`snapshot`](Self::snapshot).
    pub fn update<F>(&self, change: F) -> Result<(), SettingsError>
    where
        F: FnOnce(&mut ParryConfig),
    {
        let mut guard = self
            .inner
            .write()
            .map_err(|_| SettingsError::LockPoisoned)?;
        change(&mut guard);
        Ok(())
    }

    pub fn replace(&self, config: ParryConfig) -> Result<(), SettingsError> {
        self.update(|current| *current = config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parry_core::TimingMode;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::new(dir.path().join("parry.toml"));
        assert_eq!(store.load().unwrap(), ParryConfig::default());
    }

    #[test]
    fn save_then_load_keeps_options() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::new(dir.path().join("nested").join("parry.toml"));

        let mut config = ParryConfig::new().with_timing_mode(TimingMode::FixedWindow);
        config.window_seconds = 1.5;
        config.audio = false;
        store.save(&config).unwrap();

        assert_eq!(store.load().unwrap(), config);
    }

    #[test]
    fn partial_file_fills_defaults_and_clamps() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("parry.toml");
        std::fs::write(
            &path,
            "timing_mode = \"fixed_window\"\nwindow_seconds = 9.0\nlogging = false\n",
        )
        .unwrap();

        let config = SettingsStore::new(&path).load().unwrap();
        assert_eq!(config.timing_mode, TimingMode::FixedWindow);
        assert_eq!(config.window_seconds, 2.0);
        assert!(!config.logging);
        assert_eq!(
            config.lead_magic_seconds,
            ParryConfig::DEFAULT_LEAD_MAGIC_SECONDS
        );
    }

    #[test]
    fn malformed_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("parry.toml");
        std::fs::write(&path, "window_seconds = [").unwrap();

        let store = SettingsStore::new(&path);
        assert!(matches!(store.load(), Err(SettingsError::Parse { .. })));
        assert_eq!(store.load_or_default(), ParryConfig::default());
    }

    #[test]
    fn shared_updates_are_visible_to_snapshots() {
        let settings = SharedSettings::new(ParryConfig::default());
        let before = settings.snapshot();

        settings.update(|config| config.enabled = false).unwrap();
        assert!(before.enabled);
        assert!(!settings.snapshot().enabled);
    }
}
