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

//! Memoized subtype resolution against a fixed base type

use std::cell::RefCell;
use std::collections::HashMap;

use colonist_core::error::CoreResult;
use colonist_core::mirrors::ClassMirror;
use colonist_core::registry::TypeRegistry;
use colonist_core::types::{TypeRef, well_known};

#[derive(Clone, Copy)]
enum Memo {
    /// The type is currently on the resolution path; reaching it again means
    /// a hierarchy cycle, which must terminate rather than recurse
    InProgress,
    Done(bool),
}

/// Answers whether arbitrary types are transitive subtypes of one base type.
///
/// Results are memoized per resolver instance, so diamond hierarchies are
/// walked once per type. A type missing from the registry during traversal
/// is a hard lookup failure, never a silent `false`.
pub struct SubtypeResolver<'a> {
    registry: &'a TypeRegistry,
    base_type: TypeRef,
    base_is_interface: bool,
    cache: RefCell<HashMap<TypeRef, Memo>>,
}

impl<'a> SubtypeResolver<'a> {
    pub fn new(registry: &'a TypeRegistry, base_type: TypeRef) -> CoreResult<Self> {
        let base_is_interface = if base_type == well_known::object() {
            false
        } else {
            registry.get_class_mirror(&base_type)?.access.is_interface()
        };
        let mut cache = HashMap::new();
        cache.insert(base_type.clone(), Memo::Done(true));
        Ok(Self {
            registry,
            base_type,
            base_is_interface,
            cache: RefCell::new(cache),
        })
    }

    pub fn is_subtype(&self, mirror: &ClassMirror) -> CoreResult<bool> {
        if self.base_type == well_known::object() {
            return Ok(true);
        }
        if self.base_is_interface {
            self.is_subtype_of_interface(&mirror.type_ref)
        } else if !mirror.access.is_interface() {
            self.is_subtype_of_class(&mirror.type_ref)
        } else {
            Ok(false)
        }
    }

    fn is_subtype_of_class(&self, type_ref: &TypeRef) -> CoreResult<bool> {
        if let Some(memo) = self.cache.borrow().get(type_ref) {
            return Ok(match memo {
                Memo::InProgress => false,
                Memo::Done(result) => *result,
            });
        }
        self.cache.borrow_mut().insert(type_ref.clone(), Memo::InProgress);

        let mirror = self.registry.get_class_mirror(type_ref)?;
        let result = match &mirror.super_type {
            Some(super_type) => self.is_subtype_of_class(super_type)?,
            None => false,
        };

        self.cache.borrow_mut().insert(type_ref.clone(), Memo::Done(result));
        Ok(result)
    }

    fn is_subtype_of_interface(&self, type_ref: &TypeRef) -> CoreResult<bool> {
        if let Some(memo) = self.cache.borrow().get(type_ref) {
            return Ok(match memo {
                Memo::InProgress => false,
                Memo::Done(result) => *result,
            });
        }
        self.cache.borrow_mut().insert(type_ref.clone(), Memo::InProgress);

        let mirror = self.registry.get_class_mirror(type_ref)?;
        let mut result = false;
        for interface in &mirror.interfaces {
            if self.is_subtype_of_interface(interface)? {
                result = true;
                break;
            }
        }
        if !result {
            if let Some(super_type) = &mirror.super_type {
                result = self.is_subtype_of_interface(super_type)?;
            }
        }

        self.cache.borrow_mut().insert(type_ref.clone(), Memo::Done(result));
        Ok(result)
    }
}
