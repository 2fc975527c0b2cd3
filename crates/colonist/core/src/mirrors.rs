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

//! Structural metadata mirrors of compiled classes
//!
//! Mirrors are immutable value objects decoded from class files. They carry
//! everything the processor needs to reason about a type without loading it
//! into a runtime: flags, hierarchy, annotations, members and custom binary
//! attributes.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::code::MethodBody;
use crate::flags::Access;
use crate::types::{MethodDescriptor, MethodSignature, TypeRef};

/// A single annotation argument value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnnotationValue {
    Type(TypeRef),
    Text(String),
    Int(i64),
    Bool(bool),
}

/// An annotation instance attached to a class, field or method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationMirror {
    pub annotation_type: TypeRef,
    pub values: IndexMap<String, AnnotationValue>,
}

impl AnnotationMirror {
    pub fn new(annotation_type: TypeRef) -> Self {
        Self {
            annotation_type,
            values: IndexMap::new(),
        }
    }

    pub fn with_value(mut self, name: impl Into<String>, value: AnnotationValue) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    /// The value of `name` if it is present and holds a type
    pub fn type_value(&self, name: &str) -> Option<&TypeRef> {
        match self.values.get(name) {
            Some(AnnotationValue::Type(type_ref)) => Some(type_ref),
            _ => None,
        }
    }
}

/// A field of a class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMirror {
    pub access: Access,
    pub name: String,
    pub field_type: TypeRef,
    pub annotations: Vec<AnnotationMirror>,
}

impl FieldMirror {
    pub fn new(access: Access, name: impl Into<String>, field_type: TypeRef) -> Self {
        Self {
            access,
            name: name.into(),
            field_type,
            annotations: Vec::new(),
        }
    }
}

/// A method of a class, optionally carrying its body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodMirror {
    pub access: Access,
    pub name: String,
    pub signature: MethodSignature,
    pub annotations: Vec<AnnotationMirror>,
    pub body: Option<MethodBody>,
}

impl MethodMirror {
    pub fn new(access: Access, name: impl Into<String>, signature: MethodSignature) -> Self {
        Self {
            access,
            name: name.into(),
            signature,
            annotations: Vec::new(),
            body: None,
        }
    }

    pub fn with_annotation(mut self, annotation: AnnotationMirror) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_body(mut self, body: MethodBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn descriptor(&self) -> MethodDescriptor {
        MethodDescriptor {
            name: self.name.clone(),
            signature: self.signature.clone(),
        }
    }

    /// The first annotation of the given type, if any
    pub fn annotation(&self, annotation_type: &TypeRef) -> Option<&AnnotationMirror> {
        self.annotations.iter().find(|annotation| &annotation.annotation_type == annotation_type)
    }
}

/// A named custom binary attribute of a class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassAttribute {
    pub name: String,
    pub data: Vec<u8>,
}

/// Structural metadata of one compiled class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMirror {
    pub version: u16,
    pub access: Access,
    pub type_ref: TypeRef,
    pub super_type: Option<TypeRef>,
    pub interfaces: Vec<TypeRef>,
    pub annotations: Vec<AnnotationMirror>,
    pub fields: Vec<FieldMirror>,
    pub methods: Vec<MethodMirror>,
    pub attributes: Vec<ClassAttribute>,
}

impl ClassMirror {
    /// A class with the current format version, no members and `lang.Object`
    /// as its superclass
    pub fn new(type_ref: TypeRef) -> Self {
        Self {
            version: crate::classfile::CLASS_FILE_VERSION,
            access: Access::empty(),
            type_ref,
            super_type: Some(crate::types::well_known::object()),
            interfaces: Vec::new(),
            annotations: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            attributes: Vec::new(),
        }
    }

    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    pub fn with_super_type(mut self, super_type: Option<TypeRef>) -> Self {
        self.super_type = super_type;
        self
    }

    pub fn with_interface(mut self, interface: TypeRef) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn with_annotation(mut self, annotation: AnnotationMirror) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_field(mut self, field: FieldMirror) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_method(mut self, method: MethodMirror) -> Self {
        self.methods.push(method);
        self
    }

    /// The first annotation of the given type, if any
    pub fn annotation(&self, annotation_type: &TypeRef) -> Option<&AnnotationMirror> {
        self.annotations.iter().find(|annotation| &annotation.annotation_type == annotation_type)
    }

    pub fn has_annotations(&self) -> bool {
        !self.annotations.is_empty()
    }

    pub fn field(&self, name: &str) -> Option<&FieldMirror> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn attribute(&self, name: &str) -> Option<&ClassAttribute> {
        self.attributes.iter().find(|attribute| attribute.name == name)
    }

    pub fn implements(&self, interface: &TypeRef) -> bool {
        self.interfaces.contains(interface)
    }

    /// Whether the class declares a public zero-argument constructor
    pub fn has_public_default_constructor(&self) -> bool {
        self.methods.iter().any(|method| {
            method.name == crate::types::CONSTRUCTOR_NAME && method.signature.parameters.is_empty() && method.access.is_public()
        })
    }
}
