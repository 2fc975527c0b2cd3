// Colonist
// Copyright (C) 2025 Synerthink

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Directory-backed containers

use std::fs;
use std::path::PathBuf;

use walkdir::WalkDir;

use super::{EntryKind, FileSink, FileSource, entry_kind_for};
use crate::error::CoreResult;

/// Reads entries from a directory tree. Enumeration is sorted by file name
/// so the entry order is stable across platforms.
pub struct DirectoryFileSource {
    root: PathBuf,
}

impl DirectoryFileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FileSource for DirectoryFileSource {
    fn entries(&self) -> CoreResult<Vec<(String, EntryKind)>> {
        let mut entries = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(std::io::Error::from)?;
            let relative = entry.path().strip_prefix(&self.root).unwrap_or(entry.path());
            let path = relative.to_string_lossy().replace('\\', "/");
            let kind = if entry.file_type().is_dir() {
                EntryKind::Directory
            } else {
                entry_kind_for(&path)
            };
            entries.push((path, kind));
        }
        Ok(entries)
    }

    fn read_entry(&self, path: &str) -> CoreResult<Vec<u8>> {
        Ok(fs::read(self.root.join(path))?)
    }
}

/// Writes entries into a directory tree; entries are independent, so
/// concurrent writes need no coordination
pub struct DirectoryFileSink {
    root: PathBuf,
}

impl DirectoryFileSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FileSink for DirectoryFileSink {
    fn write_entry(&self, path: &str, data: &[u8]) -> CoreResult<()> {
        let target = self.root.join(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(target, data)?;
        Ok(())
    }

    fn create_directory(&self, path: &str) -> CoreResult<()> {
        fs::create_dir_all(self.root.join(path))?;
        Ok(())
    }

    fn flush(&self) -> CoreResult<()> {
        Ok(())
    }
}
