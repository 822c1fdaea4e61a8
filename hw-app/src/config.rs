//! This module handles the config file for the app.

use bevy::prelude::Resource;
use hw_scene::TreeConfig;
use hw_snow::SnowConfig;
use hw_wish::WishServiceConfig;
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

/// The environment variable that can override the data directory.
const DATA_DIR_VAR: &str = "HOLIDAY_WISHES_DATA_DIR";

/// The directory for logs and config, from [`DATA_DIR_VAR`] or the current directory.
pub fn data_dir() -> PathBuf {
    env::var_os(DATA_DIR_VAR).map_or_else(|| PathBuf::from("."), PathBuf::from)
}

/// The config for the whole app.
#[derive(Clone, Debug, PartialEq, Resource, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// The title of the window.
    pub window_title: String,

    /// The falling snow.
    pub snow: SnowConfig,

    /// The shape of the tree.
    pub tree: TreeConfig,

    /// How to reach the wish service.
    pub wish_service: WishServiceConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_title: "Holiday Wishes".to_string(),
            snow: SnowConfig::default(),
            tree: TreeConfig::default(),
            wish_service: WishServiceConfig::default(),
        }
    }
}

impl AppConfig {
    /// The filename of the config inside the given data directory.
    pub fn config_filename(data_dir: &Path) -> PathBuf {
        data_dir.join("config").join("holiday_wishes.ron")
    }

    /// Load the config from the file, or use the default if the file is unavailable. Also save
    /// the default to the file for future editing.
    pub fn from_file(filename: &Path) -> Self {
        if let Some(parent) = filename.parent() {
            let _ = fs::DirBuilder::new().recursive(true).create(parent);
        }

        let write_and_return_default = || -> Self {
            let default = Self::default();
            default.save_to_file(filename);
            default
        };

        let Ok(text) = fs::read_to_string(filename) else {
            debug!(?filename, "No config file, writing default");
            return write_and_return_default();
        };

        ron::from_str(&text).unwrap_or_else(|error| {
            warn!(%error, ?filename, "Unable to parse config file, overwriting it with default");
            write_and_return_default()
        })
    }

    /// Save the config to the given file.
    pub fn save_to_file(&self, filename: &Path) {
        let text = match ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default().struct_names(true),
        ) {
            Ok(text) => text,
            Err(error) => {
                warn!(%error, "Unable to serialize config");
                return;
            }
        };

        if let Err(error) = fs::write(filename, text) {
            warn!(%error, ?filename, "Unable to save config file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A fresh directory inside the system temp directory.
    fn temp_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("holiday-wishes-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn from_file_writes_default_test() {
        let dir = temp_dir("default");
        let filename = AppConfig::config_filename(&dir);

        assert_eq!(AppConfig::from_file(&filename), AppConfig::default());
        assert!(filename.exists());
        assert_eq!(AppConfig::from_file(&filename), AppConfig::default());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn from_file_round_trip_test() {
        let dir = temp_dir("round-trip");
        let filename = AppConfig::config_filename(&dir);

        let mut config = AppConfig::default();
        config.snow.count = 42;
        config.wish_service.model = "some-other-model".to_string();

        fs::create_dir_all(filename.parent().unwrap()).unwrap();
        config.save_to_file(&filename);
        assert_eq!(AppConfig::from_file(&filename), config);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn from_file_partial_and_broken_test() {
        let dir = temp_dir("partial");
        let filename = AppConfig::config_filename(&dir);
        fs::create_dir_all(filename.parent().unwrap()).unwrap();

        fs::write(&filename, "(snow: (count: 7))").unwrap();
        let config = AppConfig::from_file(&filename);
        assert_eq!(config.snow.count, 7);
        assert_eq!(config.snow.ceiling, SnowConfig::default().ceiling);
        assert_eq!(config.wish_service, WishServiceConfig::default());

        fs::write(&filename, "this is not ron").unwrap();
        assert_eq!(AppConfig::from_file(&filename), AppConfig::default());

        let _ = fs::remove_dir_all(&dir);
    }
}
