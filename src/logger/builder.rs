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

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::bounded;

use crate::Error;
use crate::Level;
use crate::Logger;
use crate::layout::Flags;
use crate::layout::LineLayout;
use crate::shutdown::ExitProcess;
use crate::shutdown::ShutdownHook;
use crate::sink::DEFAULT_MAX_FILE_SIZE;
use crate::sink::RotatingFile;
use crate::trap::DefaultTrap;
use crate::trap::Trap;
use crate::worker::Worker;

/// How often the writer checks whether the log file must be rotated.
pub const DEFAULT_ROTATION_INTERVAL: Duration = Duration::from_secs(300);

/// How many accepted messages may wait for the writer before emitters block.
pub const DEFAULT_BUFFERED_LINES_LIMIT: usize = 10;

/// A builder to configure and create a [`Logger`].
///
/// # Examples
///
/// ```no_run
/// use rollog::Flags;
/// use rollog::Level;
/// use rollog::Logger;
///
/// let logger = Logger::builder("log/service.log")
///     .prefix("story: ")
///     .flags(Flags::STD_FLAGS | Flags::SHORT_FILE)
///     .level(Level::Info)
///     .build()
///     .unwrap();
///
/// logger.info(format_args!("listening on {}", 8080)).unwrap();
/// logger.close();
/// ```
#[must_use = "call `build` to create the logger"]
pub struct LoggerBuilder {
    path: PathBuf,
    prefix: String,
    flags: Flags,
    level: Level,
    max_file_size: u64,
    rotation_interval: Duration,
    buffered_lines_limit: usize,
    thread_name: String,
    trap: Box<dyn Trap>,
    on_fatal: Arc<dyn ShutdownHook>,
}

impl std::fmt::Debug for LoggerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggerBuilder")
            .field("path", &self.path)
            .field("prefix", &self.prefix)
            .field("flags", &self.flags)
            .field("level", &self.level)
            .field("max_file_size", &self.max_file_size)
            .field("rotation_interval", &self.rotation_interval)
            .field("buffered_lines_limit", &self.buffered_lines_limit)
            .field("thread_name", &self.thread_name)
            .field("trap", &self.trap)
            .finish_non_exhaustive()
    }
}

impl LoggerBuilder {
    /// Create a new builder writing to the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            prefix: String::new(),
            flags: Flags::STD_FLAGS,
            level: Level::Debug,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            rotation_interval: DEFAULT_ROTATION_INTERVAL,
            buffered_lines_limit: DEFAULT_BUFFERED_LINES_LIMIT,
            thread_name: "rollog-writer".to_string(),
            trap: Box::new(DefaultTrap::default()),
            on_fatal: Arc::new(ExitProcess::default()),
        }
    }

    /// Sets the prefix written on every line.
    ///
    /// Default to an empty prefix.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets the header flags of every line.
    ///
    /// Default to [`Flags::STD_FLAGS`].
    pub fn flags(mut self, flags: Flags) -> Self {
        self.flags = flags;
        self
    }

    /// Sets the initial level floor.
    ///
    /// Default to [`Level::Debug`], accepting everything.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets the size in bytes above which the log file is rotated.
    ///
    /// Default to 1,500,000 bytes.
    pub fn max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    /// Sets how often the writer checks the size of the log file.
    ///
    /// Default to 300 seconds.
    pub fn rotation_interval(mut self, rotation_interval: Duration) -> Self {
        self.rotation_interval = rotation_interval;
        self
    }

    /// Sets the capacity of the queue between emitters and the writer.
    ///
    /// Emitters block while the queue is full. Default to 10; zero is treated as 1.
    pub fn buffered_lines_limit(mut self, buffered_lines_limit: usize) -> Self {
        self.buffered_lines_limit = buffered_lines_limit;
        self
    }

    /// Sets the name of the writer thread.
    pub fn thread_name(mut self, thread_name: impl Into<String>) -> Self {
        self.thread_name = thread_name.into();
        self
    }

    /// Sets the trap handling failures of the log file.
    ///
    /// Default to [`DefaultTrap`], which exits the process.
    pub fn trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.trap = trap.into();
        self
    }

    /// Sets the hook invoked after a [`Level::Fatal`] record is written.
    ///
    /// Default to [`ExitProcess`].
    pub fn on_fatal(mut self, hook: impl ShutdownHook) -> Self {
        self.on_fatal = Arc::new(hook);
        self
    }

    /// Open the log file and start the writer thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the log file cannot be created or the thread cannot be spawned.
    pub fn build(self) -> Result<Logger, Error> {
        let LoggerBuilder {
            path,
            prefix,
            flags,
            level,
            max_file_size,
            rotation_interval,
            buffered_lines_limit,
            thread_name,
            trap,
            on_fatal,
        } = self;

        let sink = RotatingFile::open(path.clone(), max_file_size)?;
        let (sender, receiver) = bounded(buffered_lines_limit.max(1));
        let worker = Worker::new(
            sink,
            LineLayout::new(prefix, flags),
            receiver,
            rotation_interval,
            trap,
            on_fatal,
        );

        let handle = std::thread::Builder::new()
            .name(thread_name)
            .spawn(move || worker.run())
            .map_err(|err| Error::new("failed to spawn log writer thread").with_source(err))?;

        Ok(Logger::new(path, level, sender, handle))
    }
}
