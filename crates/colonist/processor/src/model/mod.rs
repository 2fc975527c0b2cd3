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

//! The colony/settler model
//!
//! Every entity here is an immutable value object computed once per
//! processing run: markers during marker discovery, colonies during colony
//! discovery, settlers during settler discovery. Nothing is mutated after
//! construction and nothing survives the run.

mod colony;
mod settler;
mod strategies;

pub use colony::{CallbackMethod, Colony};
pub use settler::Settler;
pub use strategies::{SettlerAcceptor, SettlerProducer, SettlerSelector};

use colonist_core::types::TypeRef;

/// A reusable annotation contract bundling one selector, one producer and
/// one acceptor strategy. Identity is the annotation type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColonyMarker {
    pub annotation_type: TypeRef,
    pub selector: SettlerSelector,
    pub producer: SettlerProducer,
    pub acceptor: SettlerAcceptor,
}

impl ColonyMarker {
    pub fn new(annotation_type: TypeRef, selector: SettlerSelector, producer: SettlerProducer, acceptor: SettlerAcceptor) -> Self {
        Self {
            annotation_type,
            selector,
            producer,
            acceptor,
        }
    }
}
