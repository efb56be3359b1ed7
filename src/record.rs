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
use std::fmt::Write;
use std::panic::Location;

use jiff::Timestamp;

use crate::Level;

/// A log message waiting in the queue of a [`Logger`](crate::Logger).
///
/// The text is resolved when the message is emitted, so a record never borrows from the caller.
#[derive(Clone, Debug)]
pub struct Record {
    level: Level,
    text: String,
    file: &'static str,
    line: u32,
    timestamp: Timestamp,
}

impl Record {
    /// Create a record with the level tag prepended to the formatted arguments.
    #[track_caller]
    pub fn new(level: Level, args: Arguments) -> Self {
        let location = Location::caller();
        Self::with_location(level, args, location.file(), location.line())
    }

    pub(crate) fn with_location(
        level: Level,
        args: Arguments,
        file: &'static str,
        line: u32,
    ) -> Self {
        let mut text = String::from(level.tag());
        match args.as_str() {
            Some(s) => text.push_str(s),
            None => {
                // writing into a String never fails
                let _ = text.write_fmt(args);
            }
        }

        Self {
            level,
            text,
            file,
            line,
            timestamp: Timestamp::now(),
        }
    }

    /// The severity of this record.
    pub fn level(&self) -> Level {
        self.level
    }

    /// The tagged message, e.g. `[INFO] server started`.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The source file that emitted this record.
    pub fn file(&self) -> &'static str {
        self.file
    }

    /// The source line that emitted this record.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// The moment this record was emitted.
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}
