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

//! Build-time colony/settler discovery and class patching
//!
//! The processor scans a closed set of compiled classes for the
//! colony/settler pattern, validates its usage and rewrites class files so
//! a colony can enumerate its settlers at runtime without reflection: the
//! colony class gains a dispatcher method, and a generated delegate class
//! per colony carries the actual settler-wiring logic.

pub mod analysis;
pub mod error;
pub mod generation;
pub mod model;
pub mod parameters;
pub mod processor;
pub mod watermark;

pub use error::{ErrorReporter, ProcessingError, ProcessingException};
pub use parameters::ColonistParameters;
pub use processor::ColonistProcessor;
