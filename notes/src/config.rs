//! Configuration for lanenotes persistence
//!
//! Handles data directory configuration with the following precedence:
//! 1. LANENOTES_DATA_DIR environment variable
//! 2. ~/.config/lanenotes/data (production default)
//! 3. ./data (fallback for development)

use std::path::PathBuf;

const DEFAULT_CONFIG_DIR: &str = ".config/lanenotes/data";
const DEV_DATA_DIR: &str = "./data";

/// Get the data directory for persistence.
///
/// Priority:
/// 1. LANENOTES_DATA_DIR env variable if set
/// 2. $HOME/.config/lanenotes/data if HOME is set
/// 3. ./data as fallback
pub fn get_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("LANENOTES_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(DEFAULT_CONFIG_DIR);
    }

    PathBuf::from(DEV_DATA_DIR)
}
