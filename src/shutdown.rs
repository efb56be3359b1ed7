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

//! Escalation of `FATAL` records into application shutdown.

use crate::Record;

/// A hook invoked by the writer thread after a [`Level::Fatal`](crate::Level::Fatal) record has
/// been written, flushed and synced to disk.
///
/// The hosting application registers a hook to run its own graceful shutdown sequence. The hook
/// runs on the writer thread, so while it runs no further records are written. It may call
/// [`Logger::close`](crate::Logger::close); the writer thread does not wait for itself. It must
/// not call [`Logger::flush`](crate::Logger::flush) or emit more than the queue can hold, since
/// nobody else drains the queue while the hook runs.
///
/// Closures are hooks:
///
/// ```
/// use std::sync::mpsc;
///
/// let (tx, rx) = mpsc::sync_channel::<String>(1);
/// let hook = move |record: &rollog::Record| {
///     let _ = tx.try_send(record.text().to_string());
/// };
/// let _builder = rollog::Logger::builder("log/service.log").on_fatal(hook);
/// ```
pub trait ShutdownHook: Send + Sync + 'static {
    /// Begin shutting down the application because of `record`.
    fn shutdown(&self, record: &Record);
}

impl<F> ShutdownHook for F
where
    F: Fn(&Record) + Send + Sync + 'static,
{
    fn shutdown(&self, record: &Record) {
        self(record)
    }
}

/// The default hook: exit the process with status 1.
#[derive(Debug, Default, Clone, Copy)]
#[non_exhaustive]
pub struct ExitProcess {}

impl ShutdownHook for ExitProcess {
    fn shutdown(&self, _: &Record) {
        std::process::exit(1);
    }
}
