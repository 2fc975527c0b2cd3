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

//! Per-run registry of decoded class metadata
//!
//! The registry is built once from an ordered list of container paths and
//! discarded at the end of a run. Containers are decoded in parallel; the
//! merge preserves path order, and per path the container's own entry order,
//! so every downstream query sees a deterministic type sequence.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::debug;

use crate::classfile;
use crate::error::{CoreError, CoreResult};
use crate::io::{self, EntryKind, FileSource};
use crate::mirrors::ClassMirror;
use crate::types::TypeRef;

/// Queryable mapping from type identifiers to structural metadata
pub struct TypeRegistry {
    classes: HashMap<TypeRef, Arc<ClassMirror>>,
    types_by_path: IndexMap<PathBuf, Vec<TypeRef>>,
}

impl TypeRegistry {
    /// Loads every class entry of every container, in parallel across
    /// containers. Missing auxiliary paths are tolerated and contribute no
    /// types; a malformed class entry fails the load.
    pub fn load(paths: &[PathBuf]) -> CoreResult<TypeRegistry> {
        let loaded: Vec<(PathBuf, Vec<ClassMirror>)> = paths
            .par_iter()
            .map(|path| -> CoreResult<(PathBuf, Vec<ClassMirror>)> {
                if !path.exists() {
                    debug!("Skipping missing container {}", path.display());
                    return Ok((path.clone(), Vec::new()));
                }
                let source = io::open_source(path)?;
                let mut mirrors = Vec::new();
                for (entry, kind) in source.entries()? {
                    if kind == EntryKind::Class {
                        let bytes = source.read_entry(&entry)?;
                        mirrors.push(classfile::read_class(&bytes)?);
                    }
                }
                Ok((path.clone(), mirrors))
            })
            .collect::<CoreResult<Vec<_>>>()?;

        let mut builder = TypeRegistryBuilder::new();
        for (path, mirrors) in loaded {
            for mirror in mirrors {
                builder.add_class(&path, mirror);
            }
        }
        Ok(builder.build())
    }

    pub fn get_class_mirror(&self, type_ref: &TypeRef) -> CoreResult<Arc<ClassMirror>> {
        self.classes.get(type_ref).cloned().ok_or_else(|| CoreError::TypeNotFound {
            type_name: type_ref.to_string(),
        })
    }

    pub fn contains(&self, type_ref: &TypeRef) -> bool {
        self.classes.contains_key(type_ref)
    }

    /// Types declared by the given containers, in container order
    pub fn types_in<'a>(&self, paths: impl IntoIterator<Item = &'a PathBuf>) -> Vec<TypeRef> {
        let mut types = Vec::new();
        for path in paths {
            if let Some(declared) = self.types_by_path.get(path) {
                types.extend(declared.iter().cloned());
            }
        }
        types
    }

    /// Mirrors declared by the given containers, in container order
    pub fn classes_in<'a>(&self, paths: impl IntoIterator<Item = &'a PathBuf>) -> Vec<Arc<ClassMirror>> {
        self.types_in(paths)
            .iter()
            .filter_map(|type_ref| self.classes.get(type_ref).cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Incremental construction of a [`TypeRegistry`]
pub struct TypeRegistryBuilder {
    classes: HashMap<TypeRef, Arc<ClassMirror>>,
    types_by_path: IndexMap<PathBuf, Vec<TypeRef>>,
}

impl TypeRegistryBuilder {
    pub fn new() -> Self {
        Self {
            classes: HashMap::new(),
            types_by_path: IndexMap::new(),
        }
    }

    /// Registers a class under a container path. When two containers declare
    /// the same type, the first on the path list wins.
    pub fn add_class(&mut self, path: &Path, mirror: ClassMirror) -> &mut Self {
        let type_ref = mirror.type_ref.clone();
        if self.classes.contains_key(&type_ref) {
            debug!("Type {} already registered, keeping the first definition", type_ref);
            return self;
        }
        self.classes.insert(type_ref.clone(), Arc::new(mirror));
        self.types_by_path.entry(path.to_path_buf()).or_default().push(type_ref);
        self
    }

    pub fn build(self) -> TypeRegistry {
        TypeRegistry {
            classes: self.classes,
            types_by_path: self.types_by_path,
        }
    }
}

impl Default for TypeRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
