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

use colonist_core::types::TypeRef;

use super::{ColonyMarker, SettlerAcceptor, SettlerProducer};

/// A discovered settler candidate. A settler class may override the
/// colony-level producer/acceptor with annotations of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settler {
    pub settler_type: TypeRef,
    pub is_singleton: bool,
    pub overridden_producer: Option<SettlerProducer>,
    pub overridden_acceptor: Option<SettlerAcceptor>,
}

impl Settler {
    pub fn new(settler_type: TypeRef, is_singleton: bool) -> Self {
        Self {
            settler_type,
            is_singleton,
            overridden_producer: None,
            overridden_acceptor: None,
        }
    }

    /// The producer in effect for this settler under the given marker
    pub fn producer_for(&self, marker: &ColonyMarker) -> SettlerProducer {
        self.overridden_producer.unwrap_or(marker.producer)
    }

    /// The acceptor in effect for this settler under the given marker
    pub fn acceptor_for(&self, marker: &ColonyMarker) -> SettlerAcceptor {
        self.overridden_acceptor.unwrap_or(marker.acceptor)
    }
}
