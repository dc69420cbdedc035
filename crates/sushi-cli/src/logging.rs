use std::{
    fs::{self, File},
    path::Path,
    sync::Mutex,
};

use anyhow::Context as _;
use tracing_subscriber::{EnvFilter, fmt};

/// Where log output goes.
#[derive(Debug, Clone, Copy)]
pub enum LogTarget<'a> {
    /// Standard error; for headless commands.
    Stderr,
    /// A file; for the TUI, which owns the terminal. `None` disables logging.
    File(Option<&'a Path>),
}

/// Installs the global `tracing` subscriber.
///
/// The filter comes from `RUST_LOG` when set, otherwise `debug` with
/// `verbose` and `warn` without.
pub fn init(target: LogTarget<'_>, verbose: bool) -> anyhow::Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match target {
        LogTarget::Stderr => {
            fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
        LogTarget::File(None) => {}
        LogTarget::File(Some(path)) => {
            if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
                fs::create_dir_all(dir).with_context(|| {
                    format!("Failed to create log directory: {}", dir.display())
                })?;
            }
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file: {}", path.display()))?;
            fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
    }
    Ok(())
}
