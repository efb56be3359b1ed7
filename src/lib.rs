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

//! Rollog is an asynchronous leveled logger writing to a file that is rotated by size.
//!
//! # Overview
//!
//! Every [`Logger`] owns a bounded queue and a dedicated writer thread. Emitting a message
//! formats it with its level tag, drops it if it is below the logger's level floor, and otherwise
//! queues it, blocking only while the queue is full. The writer appends queued messages to the
//! file in order and checks every few minutes whether the file grew past the size threshold, in
//! which case it is renamed to `<path>.<n>` and a fresh file is started.
//!
//! A [`Level::Fatal`] message is escalated: after the writer syncs it to disk, it invokes the
//! logger's [`ShutdownHook`] so the application can shut down gracefully.
//!
//! # Examples
//!
//! An explicitly owned logger:
//!
//! ```no_run
//! use rollog::Flags;
//! use rollog::Level;
//! use rollog::Logger;
//!
//! let logger = Logger::builder("log/service.log")
//!     .flags(Flags::STD_FLAGS | Flags::MICROSECONDS)
//!     .on_fatal(|record: &rollog::Record| eprintln!("shutting down: {}", record.text()))
//!     .build()
//!     .unwrap();
//!
//! rollog::info!(logger: logger, "serving {} stories", 12);
//! logger.set_level(Level::Error);
//! rollog::info!(logger: logger, "filtered out");
//!
//! logger.close();
//! ```
//!
//! The process-wide default logger, set up once at start-up:
//!
//! ```no_run
//! use rollog::Logger;
//!
//! rollog::set_default_logger(Logger::builder(rollog::DEFAULT_LOG_PATH).build().unwrap()).unwrap();
//!
//! rollog::warning!("template {} missing, using fallback", "story.html");
//!
//! rollog::close_default_logger();
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

#[macro_use]
mod macros;

#[cfg(feature = "bridge-log")]
pub mod bridge;
pub mod layout;
pub mod trap;

mod error;
mod level;
mod logger;
mod record;
mod shutdown;
mod sink;
mod worker;

pub use self::error::Error;
pub use self::layout::Flags;
pub use self::level::Level;
pub use self::logger::*;
pub use self::record::Record;
pub use self::shutdown::ExitProcess;
pub use self::shutdown::ShutdownHook;
pub use self::sink::DEFAULT_MAX_FILE_SIZE;
pub use self::trap::Trap;
