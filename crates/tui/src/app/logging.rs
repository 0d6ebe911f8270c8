use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. The terminal belongs to the UI, so events
/// go to `log_file` when one is configured and are dropped otherwise.
pub fn init_tracing(filter: &str, log_file: Option<&Path>) -> io::Result<()> {
    let filter = EnvFilter::try_new(filter)
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error))?;
    match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::sink)
                .try_init();
        }
    }
    Ok(())
}
