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

//! Container sources and sinks
//!
//! A container is either a plain directory of class files or a single-file
//! compressed archive. Sinks mirror the kind of their corresponding input so
//! an archive input produces an archive output.

pub mod archive;
pub mod directory;

pub use archive::{ArchiveFileSink, ArchiveFileSource};
pub use directory::{DirectoryFileSink, DirectoryFileSource};

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CoreResult;

/// Extension of single-file class archives
pub const ARCHIVE_EXTENSION: &str = "car";

/// Kind of a container entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    Class,
    File,
    Directory,
}

/// Read access to an ordered set of container entries
pub trait FileSource: Send + Sync {
    /// Entries in container order: `(relative path, kind)`
    fn entries(&self) -> CoreResult<Vec<(String, EntryKind)>>;

    fn read_entry(&self, path: &str) -> CoreResult<Vec<u8>>;
}

/// Write access to a container under construction.
///
/// Directory sinks accept concurrent writes; archive sinks serialize all
/// mutation internally. Nothing is guaranteed to be on disk until `flush`.
pub trait FileSink: Send + Sync {
    fn write_entry(&self, path: &str, data: &[u8]) -> CoreResult<()>;

    fn create_directory(&self, path: &str) -> CoreResult<()>;

    fn flush(&self) -> CoreResult<()>;
}

/// Opens a source for a directory or archive container
pub fn open_source(path: &Path) -> CoreResult<Box<dyn FileSource>> {
    if is_archive(path) {
        Ok(Box::new(ArchiveFileSource::open(path)?))
    } else {
        Ok(Box::new(DirectoryFileSource::new(path)))
    }
}

/// Opens a sink whose kind follows the corresponding input container
pub fn open_sink(input: &Path, output: &Path) -> CoreResult<Box<dyn FileSink>> {
    if is_archive(input) {
        Ok(Box::new(ArchiveFileSink::create(output)))
    } else {
        Ok(Box::new(DirectoryFileSink::new(output)))
    }
}

fn is_archive(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| extension.eq_ignore_ascii_case(ARCHIVE_EXTENSION))
}

pub(crate) fn entry_kind_for(path: &str) -> EntryKind {
    if path.ends_with(".class") {
        EntryKind::Class
    } else {
        EntryKind::File
    }
}
