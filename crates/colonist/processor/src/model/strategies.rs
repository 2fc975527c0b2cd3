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

//! Selection, production and acceptance strategies

use std::fmt;

use colonist_core::types::TypeRef;

/// How settler candidates are found
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SettlerSelector {
    /// Types carrying the given annotation
    Annotation(TypeRef),
    /// Transitive subtypes of the given type
    SuperType(TypeRef),
    /// Recognized but unimplemented; reaching it fails loudly
    Registered,
}

impl SettlerSelector {
    /// Human-readable form used in error messages
    pub fn describe(&self) -> String {
        match self {
            SettlerSelector::Annotation(annotation_type) => format!("@{annotation_type}"),
            SettlerSelector::SuperType(super_type) => super_type.to_string(),
            SettlerSelector::Registered => "registered selector".to_string(),
        }
    }
}

impl fmt::Display for SettlerSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// How a settler type is turned into a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettlerProducer {
    /// Public no-argument constructor, or the instance field of a
    /// singleton-style settler
    Constructor,
    /// The colony's producer callback receives the settler class and returns
    /// the instance
    Callback,
    /// The settler class literal itself is the produced value
    Class,
}

/// How a produced settler value is consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettlerAcceptor {
    /// The produced value is discarded
    None,
    /// The colony's acceptor callback consumes the produced value
    Callback,
}
