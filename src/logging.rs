use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use env_logger::{Env, Target};

use crate::env;

/// Route the `log` facade into today's file under `logs_dir`.
///
/// The filter comes from `RUST_LOG`, defaulting to `info`.
pub fn init(logs_dir: &Path) -> std::io::Result<PathBuf> {
    let path = env::log_file_path(logs_dir, Local::now().date_naive());
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}][{:<22}][{:<7}] : {}",
                Local::now().format("%d-%b-%y %H:%M:%S"),
                record.target(),
                record.level(),
                record.args()
            )
        })
        .init();
    Ok(path)
}
