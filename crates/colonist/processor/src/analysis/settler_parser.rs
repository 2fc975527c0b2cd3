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

//! Parsing of discovered settler types

use colonist_core::registry::TypeRegistry;
use colonist_core::types::TypeRef;

use super::strategy_parsers::{parse_settler_acceptor, parse_settler_producer};
use crate::error::ProcessingError;
use crate::model::Settler;

/// Reads per-settler overrides and the singleton property off a settler class
pub struct SettlerParser<'a> {
    registry: &'a TypeRegistry,
}

impl<'a> SettlerParser<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self { registry }
    }

    pub fn parse_settler(&self, settler_type: &TypeRef) -> Result<Settler, ProcessingError> {
        let mirror = self.registry.get_class_mirror(settler_type)?;

        let mut settler = Settler::new(settler_type.clone(), mirror.access.is_singleton());
        for annotation in &mirror.annotations {
            if settler.overridden_producer.is_none() {
                settler.overridden_producer = parse_settler_producer(annotation)?;
            }
            if settler.overridden_acceptor.is_none() {
                settler.overridden_acceptor = parse_settler_acceptor(annotation)?;
            }
        }
        Ok(settler)
    }
}
