//! Logging for the portal CLI.
//!
//! Colored lines go to stderr so stdout carries only command output; the
//! same records, uncolored and with their source position, go to
//! `portal.log`. Only the first call to [`initialize`] does anything.

use crate::error::PortalAppError;

use common::ErrorLocation;

use std::io::stderr;
use std::panic::Location;
use std::path::Path;
use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;

use fern::Dispatch;
use fern::colors::Color::{Blue, Green, Magenta, Red, Yellow};
use fern::colors::ColoredLevelConfig;
use humantime::format_rfc3339_seconds;
use log::{LevelFilter, info, warn};

static INSTALL: Once = Once::new();

/// Set by the first caller, before the dispatch is built.
static ATTEMPTED: AtomicBool = AtomicBool::new(false);

pub const LOG_FILE_NAME: &str = "portal.log";

#[cfg(debug_assertions)]
const DEFAULT_LEVEL: LevelFilter = LevelFilter::Debug;

#[cfg(not(debug_assertions))]
const DEFAULT_LEVEL: LevelFilter = LevelFilter::Warn;

/// HTTP stack crates that log every connection at debug and below.
const QUIET_TARGETS: [&str; 3] = ["hyper_util", "reqwest", "rustls"];

/// Level used for a run, `--verbose` raising it to trace.
pub fn level_for(verbose: bool) -> LevelFilter {
    if verbose { LevelFilter::Trace } else { DEFAULT_LEVEL }
}

/// Install the stderr + file logger.
///
/// Repeated calls log a warning and return Ok, whatever the first call's
/// outcome was.
///
/// # Errors
///
/// The log file cannot be opened, or another logger is already installed.
pub fn initialize(log_dir: &Path, verbose: bool) -> Result<(), PortalAppError> {
    if ATTEMPTED.swap(true, Ordering::SeqCst) {
        warn!("Logger already initialized");
        return Ok(());
    }

    let level = level_for(verbose);
    let mut outcome = Ok(());

    INSTALL.call_once(|| {
        outcome = install(log_dir, level);
        if outcome.is_ok() {
            info!("Logging at {level:?} to {}", log_dir.join(LOG_FILE_NAME).display());
        }
    });

    outcome
}

#[track_caller]
fn install(log_dir: &Path, level: LevelFilter) -> Result<(), PortalAppError> {
    let colors = ColoredLevelConfig::new()
        .trace(Magenta)
        .debug(Blue)
        .info(Green)
        .warn(Yellow)
        .error(Red);

    let log_file = fern::log_file(log_dir.join(LOG_FILE_NAME)).map_err(|e| {
        PortalAppError::Portal {
            message: format!("Failed to open {LOG_FILE_NAME} in {}: {e}", log_dir.display()),
            location: ErrorLocation::from(Location::caller()),
        }
    })?;

    let terminal = Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{} {:<5} {message}",
                format_rfc3339_seconds(SystemTime::now()),
                colors.color(record.level()),
            ))
        })
        .chain(stderr());

    let file = Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} {:<5} {} {message} [{}:{}]",
                format_rfc3339_seconds(SystemTime::now()),
                record.level(),
                record.target(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
            ))
        })
        .chain(log_file);

    QUIET_TARGETS
        .iter()
        .fold(Dispatch::new().level(level), |dispatch, target| {
            dispatch.level_for(*target, LevelFilter::Warn)
        })
        .chain(terminal)
        .chain(file)
        .apply()
        .map_err(|e| PortalAppError::Portal {
            message: format!("Failed to install logger: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })
}
