//! Runtime paths and their environment overrides.
use std::env;
use std::path::PathBuf;

use crate::settings::SettingsStore;

/// Where the runtime keeps settings and timing telemetry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub settings_path: PathBuf,
    pub telemetry_dir: PathBuf,
    pub telemetry_file: String,
}

impl RuntimeConfig {
    pub const DEFAULT_SETTINGS_FILE: &'static str = "parry.toml";
    pub const DEFAULT_TELEMETRY_FILE: &'static str = "parry_timings.jsonl";

    /// Keeps settings and telemetry side by side under `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        Self {
            settings_path: base_dir.join(Self::DEFAULT_SETTINGS_FILE),
            telemetry_dir: base_dir,
            telemetry_file: Self::DEFAULT_TELEMETRY_FILE.to_string(),
        }
    }

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `PARRY_DATA_DIR` - Base directory (default: platform data directory)
    /// - `PARRY_SETTINGS_PATH` - Settings TOML file (default: `<base>/parry.toml`)
    /// - `PARRY_TELEMETRY_DIR` - Timing log directory (default: `<base>`)
    /// - `PARRY_TELEMETRY_FILE` - Timing log file name (default: `parry_timings.jsonl`)
    pub fn from_env() -> Self {
        let base_dir = read_env::<PathBuf>("PARRY_DATA_DIR").unwrap_or_else(default_data_dir);
        let mut config = Self::new(base_dir);

        if let Some(path) = read_env::<PathBuf>("PARRY_SETTINGS_PATH") {
            config.settings_path = path;
        }
        if let Some(dir) = read_env::<PathBuf>("PARRY_TELEMETRY_DIR") {
            config.telemetry_dir = dir;
        }
        if let Some(file) = env::var("PARRY_TELEMETRY_FILE")
            .ok()
            .filter(|name| !name.trim().is_empty())
        {
            config.telemetry_file = file;
        }

        config
    }

    pub fn telemetry_path(&self) -> PathBuf {
        self.telemetry_dir.join(&self.telemetry_file)
    }

    pub fn settings_store(&self) -> SettingsStore {
        SettingsStore::new(&self.settings_path)
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::new(default_data_dir())
    }
}

/// Platform data directory for parry files.
///
/// - macOS: `~/Library/Application Support/parry`
/// - Linux: `~/.local/share/parry` (or `$XDG_DATA_HOME/parry`)
/// - Windows: `%APPDATA%\parry`
/// - Fallback: `./parry_data`
pub fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "parry")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./parry_data"))
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_share_base_dir() {
        let config = RuntimeConfig::new("/tmp/parry-test");
        assert_eq!(config.settings_path, PathBuf::from("/tmp/parry-test/parry.toml"));
        assert_eq!(
            config.telemetry_path(),
            PathBuf::from("/tmp/parry-test/parry_timings.jsonl")
        );
    }
}
