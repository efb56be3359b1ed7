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

use std::fmt;
use std::fmt::Arguments;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicU8;
use std::sync::atomic::Ordering;
use std::thread::JoinHandle;

use arc_swap::ArcSwapOption;
use crossbeam_channel::Sender;

use crate::Error;
use crate::Level;
use crate::Record;
use crate::logger::LoggerBuilder;
use crate::worker::Task;

/// An asynchronous leveled logger writing to a size-rotated file.
///
/// Emitting formats the message, checks it against the level floor and hands it to a bounded
/// queue; a dedicated writer thread appends queued messages to the file in order. Emitters only
/// block while the queue is full, so no accepted message is ever dropped.
///
/// A [`Level::Fatal`] message does not stop anything by itself: once the writer has written and
/// synced it, the writer invokes the [shutdown hook](LoggerBuilder::on_fatal).
///
/// # Examples
///
/// ```no_run
/// use rollog::Level;
/// use rollog::Logger;
///
/// let logger = Logger::builder("log/service.log").build().unwrap();
/// logger.set_level(Level::Warning);
///
/// logger.info(format_args!("dropped: below the floor")).unwrap();
/// logger.error(format_args!("story {} not found", 42)).unwrap();
/// rollog::error!(logger: logger, "story {} not found", 43);
///
/// logger.close();
/// ```
pub struct Logger {
    path: PathBuf,
    level: AtomicU8,
    sender: ArcSwapOption<Sender<Task>>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("path", &self.path)
            .field("level", &self.level())
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Logger {
    /// Create a new [`LoggerBuilder`] writing to the file at `path`.
    pub fn builder(path: impl Into<PathBuf>) -> LoggerBuilder {
        LoggerBuilder::new(path)
    }

    pub(super) fn new(
        path: PathBuf,
        level: Level,
        sender: Sender<Task>,
        handle: JoinHandle<()>,
    ) -> Self {
        Self {
            path,
            level: AtomicU8::new(level.as_u8()),
            sender: ArcSwapOption::from(Some(Arc::new(sender))),
            handle: Mutex::new(Some(handle)),
        }
    }

    /// The path of the active log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The current level floor.
    pub fn level(&self) -> Level {
        Level::from_u8(self.level.load(Ordering::Relaxed))
    }

    /// Sets the level floor for messages emitted from now on.
    ///
    /// Messages already queued are written regardless.
    pub fn set_level(&self, level: Level) {
        self.level.store(level.as_u8(), Ordering::Relaxed);
    }

    /// Return true if a message at `level` passes the floor.
    pub fn enabled(&self, level: Level) -> bool {
        level >= self.level()
    }

    /// Return true once [`Logger::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.sender.load().is_none()
    }

    /// Emit a message at `level`.
    ///
    /// A message below the floor is dropped without any effect. Otherwise this blocks while the
    /// queue is full.
    ///
    /// # Errors
    ///
    /// Returns an error if the logger is closed or its writer thread stopped.
    #[track_caller]
    pub fn log(&self, level: Level, args: Arguments) -> Result<(), Error> {
        if !self.enabled(level) {
            return Ok(());
        }
        self.send_record(Record::new(level, args))
    }

    /// Emit a [`Level::Debug`] message.
    #[track_caller]
    pub fn debug(&self, args: Arguments) -> Result<(), Error> {
        self.log(Level::Debug, args)
    }

    /// Emit a [`Level::Info`] message.
    #[track_caller]
    pub fn info(&self, args: Arguments) -> Result<(), Error> {
        self.log(Level::Info, args)
    }

    /// Emit a [`Level::Warning`] message.
    #[track_caller]
    pub fn warning(&self, args: Arguments) -> Result<(), Error> {
        self.log(Level::Warning, args)
    }

    /// Emit a [`Level::Error`] message.
    #[track_caller]
    pub fn error(&self, args: Arguments) -> Result<(), Error> {
        self.log(Level::Error, args)
    }

    /// Emit a [`Level::Fatal`] message.
    ///
    /// This returns as soon as the message is queued. The shutdown hook runs later on the writer
    /// thread, after the message is synced to disk.
    #[track_caller]
    pub fn fatal(&self, args: Arguments) -> Result<(), Error> {
        self.log(Level::Fatal, args)
    }

    /// Block until every message accepted before this call is written and flushed.
    ///
    /// # Errors
    ///
    /// Returns an error if the logger is closed or the file cannot be flushed.
    pub fn flush(&self) -> Result<(), Error> {
        let (done, wait) = oneshot::channel();
        self.send(Task::Flush(done))?;
        wait.recv()
            .map_err(|_| Error::new("log writer stopped before flushing"))?
    }

    /// Run the rotation check now rather than at the next interval.
    ///
    /// The check runs after every message accepted before this call is written. Returns whether
    /// the file was rotated.
    ///
    /// # Errors
    ///
    /// Returns an error if the logger is closed or the file cannot be rotated.
    pub fn check_rotation(&self) -> Result<bool, Error> {
        let (done, wait) = oneshot::channel();
        self.send(Task::Rotate(done))?;
        wait.recv()
            .map_err(|_| Error::new("log writer stopped before checking rotation"))?
    }

    /// Close the logger and release the log file.
    ///
    /// Messages accepted before this call are still written; the call waits for the writer
    /// thread to finish them. Every emit after this call fails. Calling `close` more than once is
    /// a no-op. Called from the writer thread itself (e.g. inside a shutdown hook), it does not
    /// wait, and the writer exits once the hook returns.
    pub fn close(&self) {
        // Producers that loaded the sender before the swap keep the queue connected until their
        // send completes, so the writer drains them before seeing the disconnect.
        if self.sender.swap(None).is_none() {
            return;
        }

        let handle = match self.handle.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        let Some(handle) = handle else {
            return;
        };
        if handle.thread().id() == std::thread::current().id() {
            return;
        }
        if handle.join().is_err() {
            eprintln!("rollog: log writer thread panicked");
        }
    }

    pub(crate) fn send_record(&self, record: Record) -> Result<(), Error> {
        self.send(Task::Log(record))
    }

    fn send(&self, task: Task) -> Result<(), Error> {
        let Some(sender) = self.sender.load_full() else {
            return Err(Error::closed());
        };
        sender.send(task).map_err(|_| {
            Error::new("failed to send log message: writer thread stopped")
                .with_context("path", self.path.display())
        })
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.close();
    }
}
