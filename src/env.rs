use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

pub const DEFAULT_CONFIG_FILE: &str = "config.json";
pub const DEFAULT_LOGS_DIR: &str = "logs";
const LOG_PREFIX: &str = "serverpack";

/// Log file for `day` inside `logs_dir`; one file per calendar day.
pub fn log_file_path(logs_dir: &Path, day: NaiveDate) -> PathBuf {
    logs_dir.join(format!("{LOG_PREFIX}_{}.log", day.format("%Y-%m-%d")))
}

/// Create the on-disk folders the updater writes into.
pub fn ensure_dirs(logs_dir: &Path, install_dir: &Path) -> std::io::Result<()> {
    for dir in [logs_dir, install_dir] {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}
