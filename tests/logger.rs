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

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Barrier;
use std::sync::Mutex;
use std::sync::OnceLock;
use std::sync::Weak;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use std::time::Instant;

use rollog::Error;
use rollog::Flags;
use rollog::Level;
use rollog::Logger;
use rollog::LoggerBuilder;
use rollog::Record;
use rollog::Trap;
use tempfile::TempDir;

#[derive(Debug, Clone, Default)]
struct RecordingTrap(Arc<Mutex<Vec<String>>>);

impl Trap for RecordingTrap {
    fn trap(&self, err: &Error) {
        self.0.lock().unwrap().push(err.to_string());
    }
}

fn builder(temp_dir: &TempDir) -> LoggerBuilder {
    Logger::builder(temp_dir.path().join("service.log"))
        .flags(Flags::NONE)
        .trap(RecordingTrap::default())
        .on_fatal(|_: &Record| {})
}

fn read(path: impl AsRef<Path>) -> String {
    fs::read_to_string(path).unwrap()
}

fn wait_until(mut condition: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while !condition() {
        assert!(Instant::now() < deadline, "condition not met in time");
        thread::sleep(Duration::from_millis(10));
    }
}

#[test]
fn test_messages_below_floor_are_dropped() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let logger = builder(&temp_dir).level(Level::Warning).build().unwrap();

    logger.debug(format_args!("debug")).unwrap();
    logger.info(format_args!("info")).unwrap();
    logger.flush().unwrap();
    assert_eq!(read(logger.path()), "");

    logger.warning(format_args!("warning")).unwrap();
    logger.error(format_args!("error")).unwrap();
    logger.flush().unwrap();
    assert_eq!(read(logger.path()), "[WARNING] warning\n[ERROR] error\n");
}

#[test]
fn test_set_level_applies_to_later_messages() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let logger = builder(&temp_dir).build().unwrap();
    assert_eq!(logger.level(), Level::Debug);

    logger.set_level(Level::Error);
    rollog::info!(logger: logger, "story {} loaded", 7);
    rollog::error!(logger: logger, "story {} missing", 8);
    logger.flush().unwrap();

    assert_eq!(read(logger.path()), "[ERROR] story 8 missing\n");
}

#[test]
fn test_single_producer_order() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let logger = builder(&temp_dir).build().unwrap();

    for i in 0..500 {
        logger.info(format_args!("message {i}")).unwrap();
    }
    logger.flush().unwrap();

    let content = read(logger.path());
    let lines = content.lines().collect::<Vec<_>>();
    let expected = (0..500).map(|i| format!("[INFO] message {i}")).collect::<Vec<_>>();
    assert_eq!(lines, expected);
}

#[test]
fn test_multiple_producers_deliver_exactly_once() {
    const PRODUCERS: usize = 8;
    const MESSAGES: usize = 200;

    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let logger = Arc::new(builder(&temp_dir).build().unwrap());

    let handles = (0..PRODUCERS)
        .map(|p| {
            let logger = logger.clone();
            thread::spawn(move || {
                for i in 0..MESSAGES {
                    rollog::warning!(logger: logger, "producer {p} message {i}");
                }
            })
        })
        .collect::<Vec<_>>();
    for handle in handles {
        handle.join().unwrap();
    }
    logger.flush().unwrap();

    let content = read(logger.path());
    let lines = content.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), PRODUCERS * MESSAGES);

    let mut next = [0usize; PRODUCERS];
    for line in lines {
        let rest = line.strip_prefix("[WARNING] producer ").unwrap();
        let (p, i) = rest.split_once(" message ").unwrap();
        let p = p.parse::<usize>().unwrap();
        let i = i.parse::<usize>().unwrap();
        // each producer's messages appear once and in emit order
        assert_eq!(i, next[p], "out of order: {line}");
        next[p] += 1;
    }
    assert!(next.iter().all(|&n| n == MESSAGES));
}

#[test]
fn test_rotation_on_demand() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let logger = builder(&temp_dir).max_file_size(256).build().unwrap();
    let rotated = |n: usize| -> PathBuf { temp_dir.path().join(format!("service.log.{n}")) };

    assert!(!logger.check_rotation().unwrap());

    let mut first = String::new();
    for i in 0..10 {
        logger.info(format_args!("first generation line {i:02}")).unwrap();
        first.push_str(&format!("[INFO] first generation line {i:02}\n"));
    }
    assert!(first.len() > 256);
    assert!(logger.check_rotation().unwrap());
    assert_eq!(read(rotated(1)), first);
    assert_eq!(read(logger.path()), "");

    let mut second = String::new();
    for i in 0..10 {
        logger.error(format_args!("second generation line {i:02}")).unwrap();
        second.push_str(&format!("[ERROR] second generation line {i:02}\n"));
    }
    logger.flush().unwrap();
    assert_eq!(read(logger.path()), second);

    assert!(logger.check_rotation().unwrap());
    assert_eq!(read(rotated(1)), first);
    assert_eq!(read(rotated(2)), second);
    assert_eq!(read(logger.path()), "");
    assert!(!rotated(3).exists());
}

#[test]
fn test_rotation_on_interval() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let logger = builder(&temp_dir)
        .max_file_size(64)
        .rotation_interval(Duration::from_millis(20))
        .build()
        .unwrap();

    for i in 0..8 {
        logger.debug(format_args!("quiet period message {i}")).unwrap();
    }
    logger.flush().unwrap();

    let rotated = temp_dir.path().join("service.log.1");
    wait_until(|| rotated.exists());
    assert!(read(&rotated).starts_with("[DEBUG] quiet period message 0\n"));
}

#[test]
fn test_full_queue_blocks_without_dropping() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let entered = Arc::new(Barrier::new(2));
    let release = Arc::new(Barrier::new(2));

    let hook = {
        let entered = entered.clone();
        let release = release.clone();
        move |_: &Record| {
            entered.wait();
            release.wait();
        }
    };
    let logger = Arc::new(
        builder(&temp_dir)
            .buffered_lines_limit(2)
            .on_fatal(hook)
            .build()
            .unwrap(),
    );

    // stall the writer inside the shutdown hook
    logger.fatal(format_args!("stall")).unwrap();
    entered.wait();

    logger.info(format_args!("queued 1")).unwrap();
    logger.info(format_args!("queued 2")).unwrap();

    let blocked = {
        let logger = logger.clone();
        thread::spawn(move || logger.info(format_args!("blocked 3")))
    };
    thread::sleep(Duration::from_millis(200));
    assert!(!blocked.is_finished(), "emit must block while the queue is full");

    release.wait();
    blocked.join().unwrap().unwrap();
    logger.flush().unwrap();

    assert_eq!(
        read(logger.path()),
        "[FATAL] stall\n[INFO] queued 1\n[INFO] queued 2\n[INFO] blocked 3\n"
    );
}

#[test]
fn test_fatal_is_written_before_hook_runs() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let path = temp_dir.path().join("service.log");
    let (tx, rx) = mpsc::channel();

    let hook = {
        let path = path.clone();
        let tx = Mutex::new(tx);
        move |record: &Record| {
            let content = fs::read_to_string(&path).unwrap();
            let _ = tx.lock().unwrap().send((record.text().to_string(), content));
        }
    };
    let logger = builder(&temp_dir).on_fatal(hook).build().unwrap();

    logger.info(format_args!("loading index")).unwrap();
    let before = Instant::now();
    logger.fatal(format_args!("index {} is corrupt", "stories.json")).unwrap();
    // the emit itself does not wait for the hook
    assert!(before.elapsed() < Duration::from_secs(5));

    let (text, content) = rx.recv_timeout(Duration::from_secs(10)).unwrap();
    assert_eq!(text, "[FATAL] index stories.json is corrupt");
    assert_eq!(
        content,
        "[INFO] loading index\n[FATAL] index stories.json is corrupt\n"
    );
}

#[test]
fn test_hook_can_close_its_logger() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let slot: Arc<OnceLock<Weak<Logger>>> = Arc::new(OnceLock::new());

    let hook = {
        let slot = slot.clone();
        move |_: &Record| {
            if let Some(logger) = slot.get().and_then(Weak::upgrade) {
                logger.close();
            }
        }
    };
    let logger = Arc::new(builder(&temp_dir).on_fatal(hook).build().unwrap());
    slot.set(Arc::downgrade(&logger)).unwrap();

    logger.info(format_args!("a")).unwrap();
    logger.fatal(format_args!("b")).unwrap();

    wait_until(|| logger.is_closed());
    assert_eq!(read(logger.path()), "[INFO] a\n[FATAL] b\n");

    let err = logger.info(format_args!("c")).unwrap_err();
    assert_eq!(err.to_string(), "logger is closed");

    logger.close();
    assert_eq!(read(logger.path()), "[INFO] a\n[FATAL] b\n");
}

#[test]
fn test_emit_after_close_fails() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let logger = builder(&temp_dir).build().unwrap();

    for i in 0..5 {
        logger.info(format_args!("before close {i}")).unwrap();
    }
    logger.close();
    assert!(logger.is_closed());

    // accepted messages are drained before the file is released
    assert_eq!(read(logger.path()).lines().count(), 5);

    let err = logger.info(format_args!("after close")).unwrap_err();
    assert_eq!(err.to_string(), "logger is closed");
    assert!(logger.flush().is_err());
    assert!(logger.check_rotation().is_err());

    // filtered messages never reach the queue, closed or not
    logger.set_level(Level::Fatal);
    logger.info(format_args!("filtered")).unwrap();

    logger.close();
    assert_eq!(read(logger.path()).lines().count(), 5);
}

#[test]
fn test_rotation_failure_is_trapped() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let trap = RecordingTrap::default();
    let logger = builder(&temp_dir)
        .max_file_size(8)
        .trap(trap.clone())
        .build()
        .unwrap();

    // a directory in the way makes the rename fail
    let blocker = temp_dir.path().join("service.log.1");
    fs::create_dir(&blocker).unwrap();
    fs::write(blocker.join("keep"), "x").unwrap();

    logger.error(format_args!("more than eight bytes")).unwrap();
    let err = logger.check_rotation().unwrap_err();
    assert!(err.to_string().contains("failed to rename log file"), "{err}");

    wait_until(|| !trap.0.lock().unwrap().is_empty());
    let trapped = trap.0.lock().unwrap().clone();
    assert_eq!(trapped.len(), 1);
    assert!(trapped[0].contains("failed to rename log file"));

    // the writer stopped, so emits fail instead of silently going nowhere
    wait_until(|| logger.info(format_args!("lost")).is_err());
    logger.close();
}

#[test]
fn test_build_fails_when_file_cannot_be_created() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let not_a_dir = temp_dir.path().join("plain-file");
    fs::write(&not_a_dir, "x").unwrap();

    let err = Logger::builder(not_a_dir.join("service.log"))
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("failed to create log directory"), "{err}");
}

#[test]
fn test_prefix_and_flags_survive_rotation() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let logger = builder(&temp_dir)
        .prefix("story: ")
        .flags(Flags::SHORT_FILE)
        .max_file_size(16)
        .build()
        .unwrap();

    logger.info(format_args!("before")).unwrap();
    assert!(logger.check_rotation().unwrap());
    logger.info(format_args!("after")).unwrap();
    logger.flush().unwrap();

    let before = read(temp_dir.path().join("service.log.1"));
    let after = read(logger.path());
    assert!(before.starts_with("story: logger.rs:"), "{before}");
    assert!(before.ends_with(": [INFO] before\n"), "{before}");
    assert!(after.starts_with("story: logger.rs:"), "{after}");
    assert!(after.ends_with(": [INFO] after\n"), "{after}");
}
