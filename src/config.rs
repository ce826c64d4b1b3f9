/// Application configuration
///
/// Both windows read the same JSON file. The file is optional: when it is
/// missing every value falls back to the endpoints the apps were deployed
/// with. Partial files are fine, each field has its own default.
///
/// Location:
/// - `$HEARTH_CONFIG` when set
/// - otherwise `<config dir>/hearth/config.json`
///   (e.g. `~/.config/hearth/config.json` on Linux)
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ConfigError;

const CONFIG_ENV: &str = "HEARTH_CONFIG";

const DEFAULT_RECIPES_SCRIPT_URL: &str = "https://script.google.com/macros/s/AKfycbxaCVrdmnw0Np7dpZt_6rMxIBZogXszqC5dxUhMk6xT73UlbAZiekPmqDTtI3KpdYFL-w/exec";
const DEFAULT_GALLERY_SCRIPT_URL: &str = "https://script.google.com/macros/s/AKfycbyKTqJuXFLjZSdULXDcvthHsxOaL0ojwm-j2C2_StlR48M9cawyhJ71SlKQ5qTIRVs1Uw/exec";
const DEFAULT_CLOUD_NAME: &str = "daxothobr";
const DEFAULT_UPLOAD_PRESET: &str = "boda_preset";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub recipes: RecipesConfig,
    pub gallery: GalleryConfig,
}

/// Settings for the recipe book window
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RecipesConfig {
    /// Spreadsheet script endpoint holding the recipes sheet
    pub script_url: String,
    /// How long success/error banners stay visible
    pub banner_secs: u64,
    /// Delay before re-listing after a create or update
    pub reload_after_save_ms: u64,
    /// Delay before re-listing after a delete
    pub reload_after_delete_ms: u64,
}

impl Default for RecipesConfig {
    fn default() -> Self {
        Self {
            script_url: DEFAULT_RECIPES_SCRIPT_URL.to_string(),
            banner_secs: 3,
            reload_after_save_ms: 1500,
            reload_after_delete_ms: 1000,
        }
    }
}

impl RecipesConfig {
    pub fn banner_duration(&self) -> Duration {
        Duration::from_secs(self.banner_secs)
    }

    pub fn reload_after_save(&self) -> Duration {
        Duration::from_millis(self.reload_after_save_ms)
    }

    pub fn reload_after_delete(&self) -> Duration {
        Duration::from_millis(self.reload_after_delete_ms)
    }
}

/// Settings for the wedding album window
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GalleryConfig {
    /// Spreadsheet script endpoint holding the photo list
    pub script_url: String,
    /// Image host account name
    pub cloud_name: String,
    /// Unsigned upload preset configured on the image host
    pub upload_preset: String,
    /// Fixed polling interval for new photos
    pub poll_interval_secs: u64,
    /// Delay before the upload dialog closes itself after success
    pub close_after_upload_ms: u64,
    /// Width requested from the image host for grid thumbnails
    pub thumbnail_width: u32,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            script_url: DEFAULT_GALLERY_SCRIPT_URL.to_string(),
            cloud_name: DEFAULT_CLOUD_NAME.to_string(),
            upload_preset: DEFAULT_UPLOAD_PRESET.to_string(),
            poll_interval_secs: 5,
            close_after_upload_ms: 1500,
            thumbnail_width: 400,
        }
    }
}

impl GalleryConfig {
    pub fn poll_interval(&self) -> Duration {
        // A zero interval would spin the poll subscription
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn close_after_upload(&self) -> Duration {
        Duration::from_millis(self.close_after_upload_ms)
    }

    /// Upload endpoint of the image host
    pub fn upload_url(&self) -> String {
        format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            self.cloud_name
        )
    }
}

impl AppConfig {
    /// Load the configuration from its default location
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load the configuration from an explicit path
    ///
    /// A missing file is not an error, it yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config: AppConfig =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Get the path where the config file is expected
    pub fn config_path() -> PathBuf {
        if let Some(explicit) = std::env::var_os(CONFIG_ENV) {
            return PathBuf::from(explicit);
        }

        let mut path = dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| {
                warn!("could not determine config directory, using working directory");
                PathBuf::from(".")
            });

        path.push("hearth");
        path.push("config.json");
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.gallery.poll_interval(), Duration::from_secs(5));
        assert_eq!(config.recipes.reload_after_save(), Duration::from_millis(1500));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "gallery": {{ "cloud_name": "demo", "poll_interval_secs": 10 }} }}"#
        )
        .unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.gallery.cloud_name, "demo");
        assert_eq!(config.gallery.poll_interval(), Duration::from_secs(10));
        assert_eq!(config.gallery.upload_preset, DEFAULT_UPLOAD_PRESET);
        assert_eq!(config.recipes, RecipesConfig::default());
        assert_eq!(
            config.gallery.upload_url(),
            "https://api.cloudinary.com/v1_1/demo/image/upload"
        );
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = AppConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_zero_poll_interval_is_clamped() {
        let gallery = GalleryConfig {
            poll_interval_secs: 0,
            ..GalleryConfig::default()
        };
        assert_eq!(gallery.poll_interval(), Duration::from_secs(1));
    }
}
