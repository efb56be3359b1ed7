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

//! Leveled emit macros.
//!
//! Each macro accepts either `logger: <expr>,` followed by format arguments, writing through that
//! logger, or just format arguments, writing through the [default logger](crate::default_logger).
//! Failures (closed logger, stopped writer, no default logger) are reported on stderr.

/// Emit a [`Level::Debug`](crate::Level::Debug) message.
///
/// ```no_run
/// let logger = rollog::Logger::builder("log/service.log").build().unwrap();
/// rollog::debug!(logger: logger, "cache warmed with {} entries", 128);
/// rollog::debug!("through the default logger");
/// ```
#[macro_export]
macro_rules! debug {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::__emit_to(&$logger, $crate::Level::Debug, format_args!($($arg)+))
    };
    ($($arg:tt)+) => {
        $crate::__emit_default($crate::Level::Debug, format_args!($($arg)+))
    };
}

/// Emit a [`Level::Info`](crate::Level::Info) message.
#[macro_export]
macro_rules! info {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::__emit_to(&$logger, $crate::Level::Info, format_args!($($arg)+))
    };
    ($($arg:tt)+) => {
        $crate::__emit_default($crate::Level::Info, format_args!($($arg)+))
    };
}

/// Emit a [`Level::Warning`](crate::Level::Warning) message.
#[macro_export]
macro_rules! warning {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::__emit_to(&$logger, $crate::Level::Warning, format_args!($($arg)+))
    };
    ($($arg:tt)+) => {
        $crate::__emit_default($crate::Level::Warning, format_args!($($arg)+))
    };
}

/// Emit a [`Level::Error`](crate::Level::Error) message.
#[macro_export]
macro_rules! error {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::__emit_to(&$logger, $crate::Level::Error, format_args!($($arg)+))
    };
    ($($arg:tt)+) => {
        $crate::__emit_default($crate::Level::Error, format_args!($($arg)+))
    };
}

/// Emit a [`Level::Fatal`](crate::Level::Fatal) message.
///
/// The application keeps running until the writer has synced the message and invoked the
/// shutdown hook.
#[macro_export]
macro_rules! fatal {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::__emit_to(&$logger, $crate::Level::Fatal, format_args!($($arg)+))
    };
    ($($arg:tt)+) => {
        $crate::__emit_default($crate::Level::Fatal, format_args!($($arg)+))
    };
}
