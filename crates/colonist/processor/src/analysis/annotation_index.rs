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

//! One-time index from annotation type to annotated types

use std::collections::HashMap;
use std::path::PathBuf;

use colonist_core::registry::TypeRegistry;
use colonist_core::types::TypeRef;
use indexmap::IndexSet;

/// Eagerly built mapping from annotation type to the set of types carrying
/// it, in discovery order. Rebuilt wholesale per run; no incremental update.
pub struct AnnotationIndex {
    index: HashMap<TypeRef, IndexSet<TypeRef>>,
    empty: IndexSet<TypeRef>,
}

impl AnnotationIndex {
    /// Scans every class the given containers declare
    pub fn build(registry: &TypeRegistry, scope: &[PathBuf]) -> Self {
        let mut builder = AnnotationIndexBuilder::new();
        for mirror in registry.classes_in(scope) {
            for annotation in &mirror.annotations {
                builder.add_annotated_type(mirror.type_ref.clone(), annotation.annotation_type.clone());
            }
        }
        builder.build()
    }

    /// Types annotated with the given annotation, insertion order preserved
    pub fn types_annotated_with(&self, annotation_type: &TypeRef) -> &IndexSet<TypeRef> {
        self.index.get(annotation_type).unwrap_or(&self.empty)
    }
}

/// Incremental construction of an [`AnnotationIndex`]
pub struct AnnotationIndexBuilder {
    index: HashMap<TypeRef, IndexSet<TypeRef>>,
}

impl AnnotationIndexBuilder {
    pub fn new() -> Self {
        Self { index: HashMap::new() }
    }

    pub fn add_annotated_type(&mut self, annotated_type: TypeRef, annotation_type: TypeRef) -> &mut Self {
        self.index.entry(annotation_type).or_default().insert(annotated_type);
        self
    }

    pub fn build(self) -> AnnotationIndex {
        AnnotationIndex {
            index: self.index,
            empty: IndexSet::new(),
        }
    }
}

impl Default for AnnotationIndexBuilder {
    fn default() -> Self {
        Self::new()
    }
}
