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

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Receiver;
use crossbeam_channel::select;

use crate::Error;
use crate::Level;
use crate::Record;
use crate::layout::LineLayout;
use crate::shutdown::ShutdownHook;
use crate::sink::RotatingFile;
use crate::trap::Trap;

/// Queue payload handed from the logger to its writer thread.
pub(crate) enum Task {
    Log(Record),
    Flush(oneshot::Sender<Result<(), Error>>),
    Rotate(oneshot::Sender<Result<bool, Error>>),
}

/// The single consumer of a logger's queue.
///
/// The worker owns the file exclusively. Writes and rotation checks are both events of the same
/// select loop, so a write never observes a handle in the middle of a swap.
pub(crate) struct Worker {
    sink: RotatingFile,
    layout: LineLayout,
    receiver: Receiver<Task>,
    rotation_interval: Duration,
    trap: Box<dyn Trap>,
    on_fatal: Arc<dyn ShutdownHook>,
}

impl Worker {
    pub(crate) fn new(
        sink: RotatingFile,
        layout: LineLayout,
        receiver: Receiver<Task>,
        rotation_interval: Duration,
        trap: Box<dyn Trap>,
        on_fatal: Arc<dyn ShutdownHook>,
    ) -> Self {
        Self {
            sink,
            layout,
            receiver,
            rotation_interval,
            trap,
            on_fatal,
        }
    }

    /// Drain the queue until every sender is gone or the sink fails.
    pub(crate) fn run(mut self) {
        let receiver = self.receiver.clone();
        let ticker = crossbeam_channel::tick(self.rotation_interval);

        if let Err(err) = self.sink.ensure_capacity() {
            self.trap.trap(&err);
            return;
        }

        loop {
            let result = select! {
                recv(receiver) -> task => match task {
                    Ok(task) => self.handle(task),
                    // all senders dropped: the logger is closed
                    Err(_) => break,
                },
                recv(ticker) -> _ => self.sink.ensure_capacity().map(|_| ()),
            };

            if let Err(err) = result {
                self.trap.trap(&err);
                return;
            }
        }

        if let Err(err) = self.sink.flush() {
            let err = Error::new("failed to flush log file")
                .with_context("path", self.sink.path().display())
                .with_source(err);
            self.trap.trap(&err);
        }
    }

    fn handle(&mut self, task: Task) -> Result<(), Error> {
        match task {
            Task::Log(record) => self.write(&record),
            Task::Flush(done) => {
                let result = self.sink.flush().map_err(|err| {
                    Error::new("failed to flush log file")
                        .with_context("path", self.sink.path().display())
                        .with_source(err)
                });
                reply(done, result)
            }
            Task::Rotate(done) => reply(done, self.sink.ensure_capacity()),
        }
    }

    fn write(&mut self, record: &Record) -> Result<(), Error> {
        let line = self.layout.format(record);
        self.sink.write_all(&line).map_err(|err| {
            Error::new("failed to write log file")
                .with_context("path", self.sink.path().display())
                .with_source(err)
        })?;

        if record.level() == Level::Fatal {
            self.sink.sync().map_err(|err| {
                Error::new("failed to sync log file")
                    .with_context("path", self.sink.path().display())
                    .with_source(err)
            })?;
            self.on_fatal.shutdown(record);
        }

        Ok(())
    }
}

/// Answer a request and pass a failure on to the trap.
fn reply<T>(done: oneshot::Sender<Result<T, Error>>, result: Result<T, Error>) -> Result<(), Error> {
    match result {
        Ok(value) => {
            let _ = done.send(Ok(value));
            Ok(())
        }
        Err(err) => {
            let _ = done.send(Err(Error::new(err.to_string())));
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Mutex;

    use crossbeam_channel::bounded;
    use tempfile::TempDir;

    use super::*;
    use crate::layout::Flags;

    #[derive(Debug, Default)]
    struct RecordingTrap(Arc<Mutex<Vec<String>>>);

    impl Trap for RecordingTrap {
        fn trap(&self, err: &Error) {
            self.0.lock().unwrap().push(err.to_string());
        }
    }

    fn spawn(
        temp_dir: &TempDir,
        max_size: u64,
        on_fatal: Arc<dyn ShutdownHook>,
    ) -> (
        crossbeam_channel::Sender<Task>,
        std::thread::JoinHandle<()>,
        Arc<Mutex<Vec<String>>>,
    ) {
        let sink = RotatingFile::open(temp_dir.path().join("worker.log"), max_size).unwrap();
        let (sender, receiver) = bounded(4);
        let trapped = Arc::new(Mutex::new(vec![]));
        let worker = Worker::new(
            sink,
            LineLayout::new("", Flags::NONE),
            receiver,
            Duration::from_secs(300),
            Box::new(RecordingTrap(trapped.clone())),
            on_fatal,
        );
        let handle = std::thread::spawn(move || worker.run());
        (sender, handle, trapped)
    }

    #[test]
    fn test_writes_in_order_and_stops_on_disconnect() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let (sender, handle, trapped) = spawn(&temp_dir, u64::MAX, Arc::new(|_: &Record| {}));

        for i in 0..20 {
            let record = Record::new(Level::Info, format_args!("line {i}"));
            sender.send(Task::Log(record)).unwrap();
        }
        drop(sender);
        handle.join().unwrap();

        let content = fs::read_to_string(temp_dir.path().join("worker.log")).unwrap();
        let expected = (0..20).map(|i| format!("[INFO] line {i}\n")).collect::<String>();
        assert_eq!(content, expected);
        assert!(trapped.lock().unwrap().is_empty());
    }

    #[test]
    fn test_rotate_task_reports_rotation() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let (sender, handle, _) = spawn(&temp_dir, 10, Arc::new(|_: &Record| {}));

        let (tx, rx) = oneshot::channel();
        sender.send(Task::Rotate(tx)).unwrap();
        assert!(!rx.recv().unwrap().unwrap());

        let record = Record::new(Level::Error, format_args!("more than ten bytes"));
        sender.send(Task::Log(record)).unwrap();
        let (tx, rx) = oneshot::channel();
        sender.send(Task::Rotate(tx)).unwrap();
        assert!(rx.recv().unwrap().unwrap());

        drop(sender);
        handle.join().unwrap();
        let rotated = fs::read_to_string(temp_dir.path().join("worker.log.1")).unwrap();
        assert_eq!(rotated, "[ERROR] more than ten bytes\n");
    }

    #[test]
    fn test_fatal_hook_runs_after_write() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let path = temp_dir.path().join("worker.log");
        let seen = Arc::new(Mutex::new(None));
        let hook = {
            let seen = seen.clone();
            let path = path.clone();
            move |record: &Record| {
                let content = fs::read_to_string(&path).unwrap();
                *seen.lock().unwrap() = Some((record.text().to_string(), content));
            }
        };
        let (sender, handle, _) = spawn(&temp_dir, u64::MAX, Arc::new(hook));

        let record = Record::new(Level::Fatal, format_args!("out of memory"));
        sender.send(Task::Log(record)).unwrap();
        drop(sender);
        handle.join().unwrap();

        let (text, content) = seen.lock().unwrap().take().unwrap();
        assert_eq!(text, "[FATAL] out of memory");
        assert_eq!(content, "[FATAL] out of memory\n");
    }
}
