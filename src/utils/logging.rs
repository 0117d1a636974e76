use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::{ConversionError, Result};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise the level is `info`, or `debug`
/// when `verbose` is set. With a `log_file` every event is also appended
/// to that file without ANSI colours. A subscriber installed earlier in the
/// process is left in place.
pub fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already installed, keeping it");
        return Ok(());
    }

    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let file_layer = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .with_writer(Arc::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .try_init()
        .or_else(|e| {
            // Lost a race with another initialiser
            if tracing::dispatcher::has_been_set() {
                Ok(())
            } else {
                Err(ConversionError::Config(format!(
                    "Failed to initialise logging: {}",
                    e
                )))
            }
        })
}
