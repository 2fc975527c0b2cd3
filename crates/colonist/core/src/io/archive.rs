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

//! Single-file archive containers
//!
//! An archive is a flate2-compressed bincode entry table. Archive sinks keep
//! the table in memory behind a mutex (one writer at a time) and write the
//! file atomically on flush via a sibling temp file.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::{EntryKind, FileSink, FileSource, entry_kind_for};
use crate::error::{CoreError, CoreResult};

#[derive(Serialize, Deserialize)]
struct ArchiveEntry {
    path: String,
    kind: EntryKind,
    data: Vec<u8>,
}

/// Reads entries from an archive file loaded eagerly into memory
pub struct ArchiveFileSource {
    entries: IndexMap<String, (EntryKind, Vec<u8>)>,
}

impl ArchiveFileSource {
    pub fn open(path: &Path) -> CoreResult<Self> {
        let compressed = fs::read(path)?;
        let mut decoder = GzDecoder::new(compressed.as_slice());
        let mut payload = Vec::new();
        decoder.read_to_end(&mut payload)?;
        let (table, _): (Vec<ArchiveEntry>, usize) =
            bincode::serde::decode_from_slice(&payload, bincode::config::standard())?;
        let entries = table.into_iter().map(|entry| (entry.path, (entry.kind, entry.data))).collect();
        Ok(Self { entries })
    }
}

impl FileSource for ArchiveFileSource {
    fn entries(&self) -> CoreResult<Vec<(String, EntryKind)>> {
        Ok(self.entries.iter().map(|(path, (kind, _))| (path.clone(), *kind)).collect())
    }

    fn read_entry(&self, path: &str) -> CoreResult<Vec<u8>> {
        self.entries
            .get(path)
            .map(|(_, data)| data.clone())
            .ok_or_else(|| CoreError::EntryNotFound { path: path.to_string() })
    }
}

/// Accumulates entries in memory and writes the archive on flush
pub struct ArchiveFileSink {
    path: PathBuf,
    entries: Mutex<IndexMap<String, (EntryKind, Vec<u8>)>>,
}

impl ArchiveFileSink {
    pub fn create(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Mutex::new(IndexMap::new()),
        }
    }
}

impl FileSink for ArchiveFileSink {
    fn write_entry(&self, path: &str, data: &[u8]) -> CoreResult<()> {
        let kind = entry_kind_for(path);
        self.entries.lock().insert(path.to_string(), (kind, data.to_vec()));
        Ok(())
    }

    fn create_directory(&self, path: &str) -> CoreResult<()> {
        self.entries.lock().insert(path.to_string(), (EntryKind::Directory, Vec::new()));
        Ok(())
    }

    fn flush(&self) -> CoreResult<()> {
        let table: Vec<ArchiveEntry> = self
            .entries
            .lock()
            .iter()
            .map(|(path, (kind, data))| ArchiveEntry {
                path: path.clone(),
                kind: *kind,
                data: data.clone(),
            })
            .collect();
        let payload = bincode::serde::encode_to_vec(&table, bincode::config::standard())?;

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&payload)?;
        let compressed = encoder.finish()?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let staging = self.path.with_extension(format!("{}.tmp", super::ARCHIVE_EXTENSION));
        fs::write(&staging, compressed)?;
        fs::rename(&staging, &self.path)?;
        Ok(())
    }
}
