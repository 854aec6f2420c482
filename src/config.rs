use std::path::{Path, PathBuf};
use serde::{Serialize, de::DeserializeOwned};

use crate::log;

// ----------------------------------------------
// Configs
// ----------------------------------------------

pub const CONFIGS_DIR_PATH: &str = "assets/configs";

pub fn config_file_path(config_file_name: &str) -> PathBuf {
    Path::new(CONFIGS_DIR_PATH)
        .join(config_file_name)
        .with_extension("json")
}

pub trait Configs {
    fn post_load(&mut self) {
    }

    // Saves current configs to file.
    fn save_file(&self, config_file_name: &str) -> bool
        where Self: Configs + Sized + Serialize
    {
        debug_assert!(!config_file_name.is_empty());
        self.save_file_at(&config_file_path(config_file_name))
    }

    fn save_file_at(&self, config_json_path: &Path) -> bool
        where Self: Configs + Sized + Serialize
    {
        // First make sure the save directory exists. Ignore any errors since
        // this function might fail if any element of the path already exists.
        if let Some(parent_dir) = config_json_path.parent() {
            let _ = std::fs::create_dir_all(parent_dir);
        }

        let json = match serde_json::to_string_pretty(self) {
            Ok(json) => json,
            Err(err) => {
                log::error!(log::channel!("config"), "Failed to serialize config file {config_json_path:?}: {err}");
                return false;
            }
        };

        if let Err(err) = std::fs::write(config_json_path, json) {
            log::error!(log::channel!("config"), "Failed to write config file {config_json_path:?}: {err}");
            return false;
        }

        true
    }

    // Either succeeds loading the config file or returns a default config.
    fn load_file<T>(config_file_name: &str) -> T
        where T: Configs + Sized + Default + DeserializeOwned
    {
        debug_assert!(!config_file_name.is_empty());
        Self::load_file_at(&config_file_path(config_file_name))
    }

    fn load_file_at<T>(config_json_path: &Path) -> T
        where T: Configs + Sized + Default + DeserializeOwned
    {
        let json = match std::fs::read_to_string(config_json_path) {
            Ok(json) => json,
            Err(err) => {
                log::error!(log::channel!("config"), "Failed to read config file from path {config_json_path:?}: {err}");
                return T::default();
            }
        };

        let mut configs = match serde_json::from_str::<T>(&json) {
            Ok(configs) => configs,
            Err(err) => {
                log::error!(log::channel!("config"), "Failed to deserialize config file from path {config_json_path:?}: {err}");
                return T::default();
            }
        };

        configs.post_load();
        configs
    }
}
