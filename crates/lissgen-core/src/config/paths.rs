//! Standard locations of LissGen files

use std::path::PathBuf;

const APP_DIR: &str = "lissgen";
const CONFIG_FILE: &str = "config.yaml";

/// Default folder for `.lsj` and `.lsjp` files: `~/Music/lissgen`
pub fn default_library_path() -> PathBuf {
    dirs::audio_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Music")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Player configuration file: `~/.config/lissgen/config.yaml` on Linux
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(CONFIG_FILE)
}
