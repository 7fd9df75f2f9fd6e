//! Diagnostic logging setup.
//!
//! The full-screen interface owns the terminal, so while it runs tracing
//! output goes to a file. TUI-less commands log warnings to stderr.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use tracing_subscriber::EnvFilter;

pub enum LogTarget {
    File(PathBuf),
    Stderr,
}

fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Install the global subscriber. A second call is ignored.
pub fn init_tracing(target: LogTarget) -> Result<(), Box<dyn std::error::Error>> {
    match target {
        LogTarget::File(path) => {
            let file = open_log_file(&path)?;
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter("info"))
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .try_init();
        }
        LogTarget::Stderr => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter("warn"))
                .with_target(false)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
    Ok(())
}

fn open_log_file(path: &Path) -> std::io::Result<fs::File> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
