//! Tracing setup for applications embedding the session core.
//!
//! The library itself only emits `tracing` events; hosts that do not install
//! their own subscriber can call [`init_tracing`] to get a compact stdout
//! subscriber filtered by `RUST_LOG` (default `info`). File logging is
//! strictly opt-in: a non-blocking file layer is added only when
//! `DOCULENS_LOG_FILE` names a path the process can append to. Nothing is
//! created on disk otherwise.

use std::sync::OnceLock;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

// Keeps the non-blocking writer's worker alive for the process lifetime.
static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Install the default subscriber for hosts without their own tracing setup.
///
/// Idempotent: if a global subscriber is already installed (by an earlier
/// call or by the host application), this is a no-op rather than a panic.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer().with_target(false).compact();
    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer);

    match file_writer_from_env() {
        Some(writer) => {
            let file_layer = fmt::layer()
                .with_writer(writer)
                .with_target(true)
                .with_ansi(false)
                .compact();
            registry.with(file_layer).try_init().ok();
        }
        None => {
            registry.try_init().ok();
        }
    }
}

/// Build a non-blocking file writer when `DOCULENS_LOG_FILE` is set.
///
/// Returns `None` when the variable is absent, blank, or the target file
/// cannot be opened for append; a diagnostic goes to stderr in the failure
/// case so the host is not left guessing why the file stayed empty.
fn file_writer_from_env() -> Option<NonBlocking> {
    let path = std::env::var("DOCULENS_LOG_FILE")
        .ok()
        .filter(|value| !value.trim().is_empty())?;

    match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
    {
        Ok(file) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            let _ = LOG_GUARD.set(guard);
            Some(non_blocking)
        }
        Err(err) => {
            eprintln!("Failed to open log file {path}: {err}");
            None
        }
    }
}
