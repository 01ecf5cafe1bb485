use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::{
    errors::ConfigError,
    notification::{queue::DEFAULT_DISPLAY_MS, queue::DEFAULT_EXIT_GRACE_MS, NotificationTiming},
};

const APP_DIR: &str = "cuenta_core";
const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default)]
    pub notifications: NotificationSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_year: Option<i32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "es-PE".into(),
            currency: "PEN".into(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            notifications: NotificationSettings::default(),
            default_year: None,
        }
    }
}

impl Config {
    pub fn default_ui_color_enabled() -> bool {
        true
    }
}

/// Timing of the notification lifecycle, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    pub display_ms: u64,
    /// Zero when no consumer animates the exit.
    pub exit_grace_ms: u64,
    pub tick_ms: u64,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            display_ms: DEFAULT_DISPLAY_MS,
            exit_grace_ms: DEFAULT_EXIT_GRACE_MS,
            tick_ms: 50,
        }
    }
}

impl NotificationSettings {
    pub fn timing(&self) -> NotificationTiming {
        NotificationTiming::from_millis(self.display_ms, self.exit_grace_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }

    /// Time until a notification shown now has left the queue, plus two ticks.
    pub fn drain_wait(&self) -> Duration {
        let millis = self
            .display_ms
            .saturating_add(self.exit_grace_ms)
            .saturating_add(self.tick_ms.saturating_mul(2));
        Duration::from_millis(millis)
    }
}

/// Loads and stores [`Config`] as JSON.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    /// Manager rooted at the platform configuration directory.
    pub fn new() -> Result<Self, ConfigError> {
        let base = dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR);
        Self::with_base_dir(base)
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        fs::create_dir_all(&base)?;
        Ok(Self::with_path(base.join(CONFIG_FILE)))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            serde_json::from_str(&data).map_err(|err| ConfigError::Serde(err.to_string()))
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| ConfigError::Serde(err.to_string()))?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
