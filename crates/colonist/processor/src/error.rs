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

//! Error taxonomy, the shared error collector and the aggregated failure

use colonist_core::error::CoreError;
use parking_lot::Mutex;
use thiserror::Error;

/// One collected processing problem.
///
/// Configuration and unsupported-feature failures are fatal at the point
/// they are raised; the other variants accumulate in the [`ErrorReporter`]
/// so one run surfaces as many independent problems as it can.
#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("{0}")]
    Configuration(String),

    #[error("{0}")]
    Model(String),

    #[error("{0}")]
    Unsupported(String),

    #[error("{message}")]
    Io {
        message: String,
        #[source]
        source: CoreError,
    },

    #[error("{0}")]
    Consistency(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Collects non-fatal errors from any worker thread
#[derive(Default)]
pub struct ErrorReporter {
    errors: Mutex<Vec<ProcessingError>>,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&self, error: ProcessingError) {
        self.errors.lock().push(error);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.lock().is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.lock().len()
    }

    /// The newline-joined text of every collected error, in report order
    pub fn compose_message(&self) -> String {
        self.errors.lock().iter().map(|error| error.to_string()).collect::<Vec<_>>().join("\n")
    }
}

/// The single aggregated failure a run raises
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ProcessingException {
    pub message: String,
}

impl ProcessingException {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    pub fn from_reporter(reporter: &ErrorReporter) -> Self {
        Self::new(reporter.compose_message())
    }
}

impl From<CoreError> for ProcessingException {
    fn from(error: CoreError) -> Self {
        Self::new(error.to_string())
    }
}
