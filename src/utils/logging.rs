//! Logging Module
//!
//! Provides structured logging setup using the `tracing` crate.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::utils::error::{Error, Result};

/// Initialize logging for a CLI run.
///
/// Honors `RUST_LOG` when set; otherwise defaults to `debug` in verbose
/// mode and `info` everywhere else.
pub fn init_logging(verbose: bool) -> Result<()> {
    let default_filter = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(fmt::layer().compact())
        .with(filter)
        .try_init()
        .map_err(|e| Error::Other(format!("Failed to initialize logging: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_idempotent() {
        // Only the first initialization in a process can win; a second
        // attempt must surface an error instead of panicking.
        let first = init_logging(false);
        let second = init_logging(true);
        assert!(first.is_ok() || second.is_err());
    }
}
