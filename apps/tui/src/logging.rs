use crate::config::AppConfig;
use color_eyre::Result;
use std::fs::File;
use std::sync::Mutex;
use tracing::Level;

/// Installs the global subscriber.
///
/// The alternate screen owns stdout and stderr, so interactive sessions only
/// log when `--debug` is set, and then to a file.
pub fn init_logging(config: &AppConfig, interactive: bool) -> Result<()> {
    if config.debug {
        let file = File::create(&config.log_path)?;
        tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
        tracing::info!(path = %config.log_path.display(), "debug logging enabled");
    } else if !interactive {
        tracing_subscriber::fmt()
            .with_max_level(Level::WARN)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}
