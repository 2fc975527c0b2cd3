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

//! Error types for the class-container library

use thiserror::Error;

/// Errors that can occur while reading, resolving or emitting class containers
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Type {type_name} was not found on the classpath")]
    TypeNotFound { type_name: String },

    #[error("Malformed class file: {details}")]
    MalformedClass { details: String },

    #[error("Unsupported class file version {version} (expected {expected})")]
    UnsupportedVersion { version: u16, expected: u16 },

    #[error("Entry {path} was not found in the container")]
    EntryNotFound { path: String },

    #[error("Stack underflow at instruction {position}")]
    StackUnderflow { position: usize },

    #[error("Unresolved label {label}")]
    UnresolvedLabel { label: u32 },

    #[error("Duplicate label {label}")]
    DuplicateLabel { label: u32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Encoding error: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("Decoding error: {0}")]
    Decode(#[from] bincode::error::DecodeError),
}

/// Result type for class-container operations
pub type CoreResult<T> = Result<T, CoreError>;
