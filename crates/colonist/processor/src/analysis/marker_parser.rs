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

//! Parsing of colony marker annotation definitions

use colonist_core::registry::TypeRegistry;
use colonist_core::types::{TypeRef, well_known};

use super::strategy_parsers::{parse_settler_acceptor, parse_settler_producer, parse_settler_selector};
use crate::error::ProcessingError;
use crate::model::ColonyMarker;

/// Parses annotation definitions carrying the colony meta-annotation into
/// structured markers
pub struct ColonyMarkerParser<'a> {
    registry: &'a TypeRegistry,
}

impl<'a> ColonyMarkerParser<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self { registry }
    }

    /// A marker must carry `@colonist.Colony` plus exactly one selector, one
    /// producer and one acceptor annotation
    pub fn parse_colony_marker(&self, annotation_type: &TypeRef) -> Result<ColonyMarker, ProcessingError> {
        let mirror = self.registry.get_class_mirror(annotation_type)?;
        if mirror.annotation(&well_known::colony()).is_none() {
            return Err(ProcessingError::Model(format!(
                "{annotation_type} must be annotated with @{}",
                well_known::colony()
            )));
        }

        let mut selectors = Vec::new();
        let mut producers = Vec::new();
        let mut acceptors = Vec::new();
        for annotation in &mirror.annotations {
            if let Some(selector) = parse_settler_selector(annotation)? {
                selectors.push((annotation.annotation_type.clone(), selector));
            }
            if let Some(producer) = parse_settler_producer(annotation)? {
                producers.push((annotation.annotation_type.clone(), producer));
            }
            if let Some(acceptor) = parse_settler_acceptor(annotation)? {
                acceptors.push((annotation.annotation_type.clone(), acceptor));
            }
        }

        let selector = exactly_one(annotation_type, "settler selector", selectors)?;
        let producer = exactly_one(annotation_type, "settler producer", producers)?;
        let acceptor = exactly_one(annotation_type, "settler acceptor", acceptors)?;
        Ok(ColonyMarker::new(annotation_type.clone(), selector, producer, acceptor))
    }
}

fn exactly_one<T>(marker_type: &TypeRef, kind: &str, mut found: Vec<(TypeRef, T)>) -> Result<T, ProcessingError> {
    match found.len() {
        0 => Err(ProcessingError::Model(format!(
            "Colony marker {marker_type} must be annotated with a {kind} annotation"
        ))),
        1 => Ok(found.remove(0).1),
        _ => {
            let names = found.iter().map(|(annotation_type, _)| format!("@{annotation_type}")).collect::<Vec<_>>().join(", ");
            Err(ProcessingError::Model(format!(
                "Colony marker {marker_type} has multiple {kind} annotations: {names}"
            )))
        }
    }
}
