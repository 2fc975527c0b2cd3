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

//! Emission of generated classes into the generation sink

use colonist_core::classfile;
use colonist_core::io::FileSink;
use colonist_core::mirrors::ClassMirror;
use tracing::debug;

use crate::error::{ErrorReporter, ProcessingError};

/// Writes generated classes, reporting failures instead of raising them so
/// sibling writes proceed and the run fails at the next checkpoint
pub struct ClassProducer<'a> {
    sink: &'a dyn FileSink,
    error_reporter: &'a ErrorReporter,
}

impl<'a> ClassProducer<'a> {
    pub fn new(sink: &'a dyn FileSink, error_reporter: &'a ErrorReporter) -> Self {
        Self { sink, error_reporter }
    }

    pub fn produce_class(&self, mirror: &ClassMirror) {
        debug!("Producing class {}", mirror.type_ref);
        let path = classfile::entry_path(&mirror.type_ref);
        let bytes = match classfile::write_class(mirror) {
            Ok(bytes) => bytes,
            Err(source) => {
                self.error_reporter.report(ProcessingError::Io {
                    message: format!("Failed to encode class {path}"),
                    source,
                });
                return;
            }
        };
        if let Err(source) = self.sink.write_entry(&path, &bytes) {
            self.error_reporter.report(ProcessingError::Io {
                message: format!("Failed to produce class with {} bytes: {path}", bytes.len()),
                source,
            });
        }
    }
}
