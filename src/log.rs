// src/log.rs
//! Logging setup. Library code only emits `tracing` events; the binary
//! decides where they go by calling [`init`] once at startup.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::consts::LOG_FILE;

/// Install the global subscriber.
///
/// Honors `RUST_LOG`; defaults to `fragshop=info` (or `fragshop=debug` when
/// `verbose`). Events go to `<store_dir>/debug.log` when that file can be
/// opened, stderr otherwise. Calling it twice is a no-op.
pub fn init(verbose: bool, store_dir: &Path) {
    let default = if verbose { "fragshop=debug" } else { "fragshop=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    match open_log_file(store_dir) {
        Some(file) => {
            let _ = builder.with_ansi(false).with_writer(Mutex::new(file)).try_init();
        }
        None => {
            let _ = builder.with_writer(std::io::stderr).try_init();
        }
    }
}

fn open_log_file(dir: &Path) -> Option<std::fs::File> {
    if !dir.exists() {
        std::fs::create_dir_all(dir).ok()?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))
        .ok()
}
