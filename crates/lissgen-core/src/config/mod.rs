//! Configuration infrastructure
//!
//! - Generic YAML config loading/saving
//! - Default locations of the config file and the wave/playlist library
//!
//! ```ignore
//! use lissgen_core::config::{default_config_path, load_config, save_config};
//!
//! let config: PlayerConfig = load_config(&default_config_path());
//! save_config(&config, &default_config_path())?;
//! ```

mod io;
mod paths;

pub use io::{load_config, save_config};
pub use paths::{default_config_path, default_library_path};
