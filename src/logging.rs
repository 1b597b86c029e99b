//! Tracing initialization.
//!
//! Events go to stderr so the report on stdout stays clean. `RUST_LOG`, when
//! set, takes precedence over the verbosity flags.

use anyhow::{Context, Result};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt as tsfmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry;
use tracing_subscriber::util::SubscriberInitExt;

#[inline]
fn to_level_filter(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

#[inline]
fn env_filter_from_level(level_filter: LevelFilter) -> EnvFilter {
    let level_str = match level_filter {
        LevelFilter::ERROR => "error",
        LevelFilter::WARN => "warn",
        LevelFilter::INFO => "info",
        LevelFilter::DEBUG => "debug",
        LevelFilter::TRACE => "trace",
        _ => "warn",
    };
    EnvFilter::new(level_str)
}

/// Installs the global subscriber.
pub fn init_tracing(verbose: u8, quiet: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| env_filter_from_level(to_level_filter(verbose, quiet)));

    let stderr_layer = tsfmt::layer()
        .with_writer(std::io::stderr)
        .with_level(true)
        .with_target(false)
        .compact();

    registry()
        .with(env_filter)
        .with(stderr_layer)
        .try_init()
        .context("a global tracing subscriber is already installed")
}
