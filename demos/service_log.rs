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

//! A service that logs through the default logger and shuts down on a fatal record.

use std::sync::Mutex;
use std::sync::mpsc;
use std::time::Duration;

use rollog::Flags;
use rollog::Level;
use rollog::Logger;
use rollog::Record;

fn main() {
    let (shutdown_tx, shutdown_rx) = mpsc::channel::<String>();
    let shutdown_tx = Mutex::new(shutdown_tx);

    let logger = Logger::builder(rollog::DEFAULT_LOG_PATH)
        .flags(Flags::STD_FLAGS | Flags::MICROSECONDS | Flags::SHORT_FILE)
        .level(Level::Info)
        .on_fatal(move |record: &Record| {
            let _ = shutdown_tx.lock().unwrap().send(record.text().to_string());
        })
        .build()
        .expect("failed to open the service log");
    rollog::set_default_logger(logger).expect("default logger is set once");
    rollog::bridge::setup_log_crate();

    rollog::debug!("not written: below the info floor");
    rollog::info!("loaded {} stories", 3);
    log::warn!("template {} missing, using fallback", "story.html");
    rollog::fatal!("story index is corrupt");

    match shutdown_rx.recv_timeout(Duration::from_secs(5)) {
        Ok(reason) => eprintln!("graceful shutdown: {reason}"),
        Err(err) => eprintln!("no fatal record seen: {err}"),
    }

    rollog::close_default_logger();
}
