// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A bridge to forward logs from the `log` crate to the default logger.

use crate::Level;
use crate::Record;
use crate::default_logger;

struct LogCrateLogger(());

impl log::Log for LogCrateLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        default_logger().is_some_and(|logger| logger.enabled(metadata.level().into()))
    }

    fn log(&self, record: &log::Record) {
        let Some(logger) = default_logger() else {
            return;
        };

        let level = Level::from(record.level());
        if !logger.enabled(level) {
            return;
        }

        let file = record.file_static().unwrap_or("<unknown>");
        let line = record.line().unwrap_or_default();
        let record = Record::with_location(level, *record.args(), file, line);
        if let Err(err) = logger.send_record(record) {
            eprintln!("rollog: failed to forward log crate record: {err}");
        }
    }

    fn flush(&self) {
        if let Some(logger) = default_logger() {
            if let Err(err) = logger.flush() {
                eprintln!("rollog: failed to flush: {err}");
            }
        }
    }
}

/// Set up the log crate global logger.
///
/// This function calls [`log::set_logger`] to set up a forwarder, and all logs from the log crate
/// are written by rollog's [default logger](crate::set_default_logger). `Trace` records are
/// written as `Debug`.
///
/// This function sets the log crate maximum level to `Trace`; filtering happens against the
/// default logger's level floor.
///
/// # Errors
///
/// Return an error if the log crate global logger has already been set.
///
/// # Examples
///
/// ```
/// if let Err(err) = rollog::bridge::try_setup_log_crate() {
///     eprintln!("failed to setup log crate: {err}");
/// }
/// ```
pub fn try_setup_log_crate() -> Result<(), log::SetLoggerError> {
    static LOGGER: LogCrateLogger = LogCrateLogger(());
    log::set_logger(&LOGGER)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

/// Set up the log crate global logger.
///
/// See [`try_setup_log_crate`].
///
/// # Panics
///
/// Panic if the log crate global logger has already been set.
pub fn setup_log_crate() {
    try_setup_log_crate().expect(
        "rollog::bridge::setup_log_crate must be called before the log crate global logger initialized",
    )
}
