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

//! Formatting of records into log lines.

use std::fmt;
use std::ops::BitOr;
use std::ops::BitOrAssign;

use jiff::tz::TimeZone;

use crate::Record;

/// Header flags controlling what precedes each message in the log file.
///
/// Flags combine with `|`:
///
/// ```
/// use rollog::Flags;
///
/// let flags = Flags::DATE | Flags::TIME | Flags::SHORT_FILE;
/// assert!(flags.contains(Flags::TIME));
/// assert!(!flags.contains(Flags::UTC));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Flags(u8);

impl Flags {
    /// No header at all, only the prefix and the message.
    pub const NONE: Flags = Flags(0);
    /// The date in the local time zone: `2024/08/23`.
    pub const DATE: Flags = Flags(1);
    /// The time in the local time zone: `01:23:23`.
    pub const TIME: Flags = Flags(1 << 1);
    /// Microsecond resolution: `01:23:23.123123`. Implies [`Flags::TIME`].
    pub const MICROSECONDS: Flags = Flags(1 << 2);
    /// Full file name and line number: `/a/b/c/main.rs:23`.
    pub const LONG_FILE: Flags = Flags(1 << 3);
    /// Final file name element and line number: `main.rs:23`. Overrides [`Flags::LONG_FILE`].
    pub const SHORT_FILE: Flags = Flags(1 << 4);
    /// Use UTC rather than the local time zone for date and time.
    pub const UTC: Flags = Flags(1 << 5);
    /// Move the prefix from the beginning of the line to just before the message.
    pub const MSG_PREFIX: Flags = Flags(1 << 6);
    /// Initial values for a new logger: date and time.
    pub const STD_FLAGS: Flags = Flags(Self::DATE.0 | Self::TIME.0);

    /// Return true if all flags in `other` are set.
    pub const fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    const fn intersects(self, other: Flags) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flags) -> Flags {
        Flags(self.0 | rhs.0)
    }
}

impl BitOrAssign for Flags {
    fn bitor_assign(&mut self, rhs: Flags) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(Flags, &str); 7] = [
            (Flags::DATE, "DATE"),
            (Flags::TIME, "TIME"),
            (Flags::MICROSECONDS, "MICROSECONDS"),
            (Flags::LONG_FILE, "LONG_FILE"),
            (Flags::SHORT_FILE, "SHORT_FILE"),
            (Flags::UTC, "UTC"),
            (Flags::MSG_PREFIX, "MSG_PREFIX"),
        ];

        let names = NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect::<Vec<_>>();
        if names.is_empty() {
            f.write_str("NONE")
        } else {
            f.write_str(&names.join(" | "))
        }
    }
}

/// A layout that formats a record as one line of text.
///
/// Output format, with [`Flags::STD_FLAGS`] and an empty prefix:
///
/// ```text
/// 2024/08/11 22:44:57 [ERROR] Hello error!
/// 2024/08/11 22:44:57 [INFO] Hello info!
/// ```
#[derive(Debug, Clone)]
pub(crate) struct LineLayout {
    prefix: String,
    flags: Flags,
}

impl LineLayout {
    /// Create a layout with the given prefix and header flags.
    pub fn new(prefix: impl Into<String>, flags: Flags) -> Self {
        Self {
            prefix: prefix.into(),
            flags,
        }
    }

    /// Format the record as a newline terminated line.
    pub fn format(&self, record: &Record) -> Vec<u8> {
        let text = record.text();
        let mut line = String::with_capacity(self.prefix.len() + text.len() + 48);
        let flags = self.flags;

        if !flags.contains(Flags::MSG_PREFIX) {
            line.push_str(&self.prefix);
        }

        if flags.intersects(Flags::DATE | Flags::TIME | Flags::MICROSECONDS) {
            let tz = if flags.contains(Flags::UTC) {
                TimeZone::UTC
            } else {
                TimeZone::system()
            };
            let now = record.timestamp().to_zoned(tz);
            if flags.contains(Flags::DATE) {
                line.push_str(&now.strftime("%Y/%m/%d ").to_string());
            }
            if flags.intersects(Flags::TIME | Flags::MICROSECONDS) {
                if flags.contains(Flags::MICROSECONDS) {
                    line.push_str(&now.strftime("%H:%M:%S.%6f ").to_string());
                } else {
                    line.push_str(&now.strftime("%H:%M:%S ").to_string());
                }
            }
        }

        if flags.intersects(Flags::SHORT_FILE | Flags::LONG_FILE) {
            let file = record.file();
            let file = if flags.contains(Flags::SHORT_FILE) {
                file.rsplit(['/', '\\']).next().unwrap_or(file)
            } else {
                file
            };
            line.push_str(file);
            line.push(':');
            line.push_str(&record.line().to_string());
            line.push_str(": ");
        }

        if flags.contains(Flags::MSG_PREFIX) {
            line.push_str(&self.prefix);
        }

        line.push_str(text);
        if !text.ends_with('\n') {
            line.push('\n');
        }

        line.into_bytes()
    }
}
