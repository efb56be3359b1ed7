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

use std::fmt::Arguments;
use std::io::Write;
use std::sync::OnceLock;

use crate::Error;
use crate::Level;
use crate::Logger;

/// The conventional location of the process-wide log file.
pub const DEFAULT_LOG_PATH: &str = "log/service.log";

static DEFAULT_LOGGER: OnceLock<Logger> = OnceLock::new();

/// Install the process-wide default logger used by the macros without a `logger:` argument.
///
/// Call this once at start-up. Tear down with [`close_default_logger`] during shutdown, after the
/// application stopped emitting.
///
/// # Errors
///
/// Returns an error if a default logger has already been set.
///
/// # Examples
///
/// ```no_run
/// use rollog::DEFAULT_LOG_PATH;
/// use rollog::Logger;
///
/// let logger = Logger::builder(DEFAULT_LOG_PATH).build().unwrap();
/// rollog::set_default_logger(logger).unwrap();
///
/// rollog::info!("service started");
///
/// rollog::close_default_logger();
/// ```
pub fn set_default_logger(logger: Logger) -> Result<(), Error> {
    DEFAULT_LOGGER
        .set(logger)
        .map_err(|_| Error::new("default logger has been already set"))
}

/// Return the process-wide default logger, if set.
pub fn default_logger() -> Option<&'static Logger> {
    DEFAULT_LOGGER.get()
}

/// Close the process-wide default logger.
///
/// Emits through the default logger fail afterwards. Does nothing if no default logger is set.
pub fn close_default_logger() {
    if let Some(logger) = default_logger() {
        logger.close();
    }
}

#[doc(hidden)]
#[track_caller]
pub fn __emit_to(logger: &Logger, level: Level, args: Arguments) {
    if let Err(err) = logger.log(level, args) {
        handle_log_error(level, args, err);
    }
}

#[doc(hidden)]
#[track_caller]
pub fn __emit_default(level: Level, args: Arguments) {
    match default_logger() {
        Some(logger) => __emit_to(logger, level, args),
        None => {
            let err = Error::new("default logger is not initialized");
            handle_log_error(level, args, err);
        }
    }
}

fn handle_log_error(level: Level, args: Arguments, error: Error) {
    let Err(fallback_error) = write!(
        std::io::stderr(),
        r###"
Error perform logging.
    Attempted to log: {level} {args}
    Error: {error}
"###,
    ) else {
        return;
    };

    panic!(
        r###"
Error performing stderr logging after error occurred during regular logging.
    Attempted to log: {level} {args}
    Error: {error}
    Fallback error: {fallback_error}
"###,
    );
}
