//! Configuration management for secure-files

mod settings;
mod storage;

pub use settings::Settings;
pub use storage::{get_exe_dir, get_settings_path, load_settings, save_settings};
