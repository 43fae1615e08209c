use std::{fs, io, path::Path};

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;

static INIT: OnceCell<()> = OnceCell::new();
static GUARD: OnceCell<tracing_appender::non_blocking::WorkerGuard> = OnceCell::new();

/// Console logging goes to stderr so stdout stays clean for JSON Lines.
/// A daily-rolling file is added when `logs_dir` is set. Safe to call more
/// than once; only the first call installs the subscriber.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    INIT.get_or_try_init::<_, anyhow::Error>(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&config.level))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let console_layer = fmt::layer()
            .with_writer(io::stderr)
            .with_target(true)
            .with_ansi(true);

        let file_layer = match config.logs_dir.as_deref() {
            Some(dir) => {
                let dir = Path::new(dir);
                fs::create_dir_all(dir)
                    .with_context(|| format!("failed to create log directory {}", dir.display()))?;
                let file_appender = tracing_appender::rolling::daily(dir, "content-triage.log");
                let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
                let _ = GUARD.set(guard);
                Some(
                    fmt::layer()
                        .with_writer(file_writer)
                        .with_target(true)
                        .with_ansi(false),
                )
            }
            None => None,
        };

        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .with(file_layer)
            .init();

        tracing::debug!(logs = ?config.logs_dir, "tracing initialized");
        Ok(())
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_log_directory_and_tolerates_repeat_calls() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("nested/logs");
        let config = LoggingConfig {
            level: "debug".into(),
            logs_dir: Some(logs.to_string_lossy().into_owned()),
        };

        init_tracing(&config).unwrap();
        init_tracing(&config).unwrap();
        assert!(logs.is_dir());
    }
}
