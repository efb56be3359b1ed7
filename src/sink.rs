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
use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use crate::Error;

/// Files larger than this many bytes are rotated at the next check.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1_500_000;

/// A log file that is rotated by size.
///
/// The active file always lives at the configured path. A rotation renames it to
/// `<path>.<sequence>` and opens a fresh, empty file at the path. Sequence numbers start at 1 and
/// are never reused, so the oldest rotated file has the smallest suffix. Rotated files are never
/// deleted.
#[derive(Debug)]
pub(crate) struct RotatingFile {
    path: PathBuf,
    file: File,
    sequence: usize,
    max_size: u64,
    // renamed away but no fresh file opened yet
    reopen_pending: bool,
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl RotatingFile {
    /// Open the log file at `path`, truncating any previous content.
    ///
    /// The parent directory is created when missing.
    pub fn open(path: impl Into<PathBuf>, max_size: u64) -> Result<Self, Error> {
        let path = path.into();
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|err| {
                Error::new("failed to create log directory")
                    .with_context("dir", dir.display())
                    .with_source(err)
            })?;
        }

        let file = create_truncated(&path)?;
        Ok(Self {
            path,
            file,
            sequence: 1,
            max_size,
            reopen_pending: false,
        })
    }

    /// The path of the active log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The suffix the next rotated file will get.
    #[cfg(test)]
    pub fn sequence(&self) -> usize {
        self.sequence
    }

    /// Flush the file and make sure its content reached the disk.
    pub fn sync(&mut self) -> io::Result<()> {
        self.file.flush()?;
        self.file.sync_data()
    }

    /// Rotate the file if it grew beyond the size threshold.
    ///
    /// Returns whether a rotation happened. Failing to stat, rename or reopen the file is an
    /// error. If the rename fails the current handle is kept. If only the reopen fails, the
    /// sequence has already advanced and writes keep going to the rotated file until a later
    /// check manages to open a fresh one.
    pub fn ensure_capacity(&mut self) -> Result<bool, Error> {
        self.rotate_with(create_truncated)
    }

    fn rotate_with(
        &mut self,
        reopen: impl FnOnce(&Path) -> Result<File, Error>,
    ) -> Result<bool, Error> {
        if self.reopen_pending {
            self.file = reopen(&self.path)?;
            self.reopen_pending = false;
            return Ok(true);
        }

        let size = self
            .file
            .metadata()
            .map_err(|err| {
                Error::new("failed to read log file metadata")
                    .with_context("path", self.path.display())
                    .with_source(err)
            })?
            .len();

        if size <= self.max_size {
            return Ok(false);
        }

        self.file.flush().map_err(|err| {
            Error::new("failed to flush log file")
                .with_context("path", self.path.display())
                .with_source(err)
        })?;

        let rotated = self.rotated_path(self.sequence);
        fs::rename(&self.path, &rotated).map_err(|err| {
            Error::new("failed to rename log file")
                .with_context("from", self.path.display())
                .with_context("to", rotated.display())
                .with_source(err)
        })?;
        self.sequence += 1;
        self.reopen_pending = true;

        // the previous handle is closed when replaced
        self.file = reopen(&self.path)?;
        self.reopen_pending = false;
        Ok(true)
    }

    fn rotated_path(&self, sequence: usize) -> PathBuf {
        let mut path = self.path.clone().into_os_string();
        path.push(format!(".{sequence}"));
        PathBuf::from(path)
    }
}

fn create_truncated(path: &Path) -> Result<File, Error> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|err| {
            Error::new("failed to open log file")
                .with_context("path", path.display())
                .with_source(err)
        })
}
