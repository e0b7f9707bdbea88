//! Frame cache configuration.
//!
//! Settings are loaded from an INI file. Defaults are safe for startup, and
//! keys missing from the file keep their current values.
//!
//! # Configuration File Format
//!
//! ```ini
//! [atlas]
//! root = ./assets
//! texture_extension = png
//! derive_texture_from_source = false
//! ```

use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

const DEFAULT_ROOT: &str = "./assets";
const DEFAULT_TEXTURE_EXTENSION: &str = "png";
const DEFAULT_DERIVE_TEXTURE: bool = false;
const DEFAULT_CONFIG_PATH: &str = "./framecache.ini";

/// Frame cache configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    /// Directory descriptor source ids are resolved against.
    pub root: PathBuf,
    /// Extension used when deriving a texture name from a descriptor name.
    pub texture_extension: String,
    /// Fall back to `<descriptor>.<texture_extension>` when a descriptor
    /// declares no texture file.
    pub derive_texture_from_source: bool,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
            texture_extension: DEFAULT_TEXTURE_EXTENSION.to_string(),
            derive_texture_from_source: DEFAULT_DERIVE_TEXTURE,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        if let Some(root) = config.get("atlas", "root") {
            self.root = PathBuf::from(root);
        }
        if let Some(ext) = config.get("atlas", "texture_extension") {
            self.texture_extension = ext.trim_start_matches('.').to_string();
        }
        if let Some(derive) = config
            .getbool("atlas", "derive_texture_from_source")
            .ok()
            .flatten()
        {
            self.derive_texture_from_source = derive;
        }

        info!(
            "Loaded config: root={:?}, texture_extension={}, derive_texture_from_source={}",
            self.root, self.texture_extension, self.derive_texture_from_source
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        config.set("atlas", "root", Some(self.root.display().to_string()));
        config.set(
            "atlas",
            "texture_extension",
            Some(self.texture_extension.clone()),
        );
        config.set(
            "atlas",
            "derive_texture_from_source",
            Some(self.derive_texture_from_source.to_string()),
        );

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }
}
