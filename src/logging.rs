use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "SKYCLOCK_LOG";
const DEFAULT_FILTER: &str = "info";

/// `SKYCLOCK_LOG` if set and valid, otherwise `info`.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Sends tracing output to `path`, appending. The terminal is the display,
/// so nothing is ever logged to stdout or stderr. Returns `false` and leaves
/// logging disabled when the file cannot be opened.
pub fn init(path: Option<&Path>) -> bool {
    let Some(path) = path else {
        return false;
    };
    if let Some(dir) = path.parent() {
        let _ = fs::create_dir_all(dir);
    }
    let file = match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Warning: logging disabled, cannot open {}: {}", path.display(), e);
            return false;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .is_ok()
}
