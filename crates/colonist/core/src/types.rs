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

//! Type identifiers and method descriptors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the constructor method in a class file
pub const CONSTRUCTOR_NAME: &str = "<init>";

/// Field conventionally exposing the instance of a singleton-style class
pub const INSTANCE_FIELD: &str = "INSTANCE";

/// A fully qualified, dot-separated type name such as `demo.plugins.Registry`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeRef(String);

impl TypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The dotted class name
    pub fn class_name(&self) -> &str {
        &self.0
    }

    /// Container entry path for this type, without the `.class` suffix
    pub fn path_name(&self) -> String {
        self.0.replace('.', "/")
    }

    /// Name usable as a fragment of a synthesized class identifier
    pub fn sanitized_name(&self) -> String {
        self.0
            .chars()
            .map(|c| if c == '.' || c == '$' { '_' } else { c })
            .collect()
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parameter and return types of a method; a `None` return type means void
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodSignature {
    pub parameters: Vec<TypeRef>,
    pub return_type: Option<TypeRef>,
}

impl MethodSignature {
    pub fn new(parameters: Vec<TypeRef>, return_type: Option<TypeRef>) -> Self {
        Self { parameters, return_type }
    }
}

/// A method name together with its signature
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub name: String,
    pub signature: MethodSignature,
}

impl MethodDescriptor {
    pub fn new(name: impl Into<String>, parameters: Vec<TypeRef>, return_type: Option<TypeRef>) -> Self {
        Self {
            name: name.into(),
            signature: MethodSignature::new(parameters, return_type),
        }
    }

    /// Descriptor of the public zero-argument constructor
    pub fn for_default_constructor() -> Self {
        Self::new(CONSTRUCTOR_NAME, Vec::new(), None)
    }

    pub fn is_constructor(&self) -> bool {
        self.name == CONSTRUCTOR_NAME
    }
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (index, parameter) in self.signature.parameters.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{parameter}")?;
        }
        write!(f, ")")
    }
}

/// Types the runtime and the processor agree on by name
pub mod well_known {
    use super::TypeRef;

    pub fn object() -> TypeRef {
        TypeRef::new("lang.Object")
    }

    pub fn class() -> TypeRef {
        TypeRef::new("lang.Class")
    }

    pub fn string() -> TypeRef {
        TypeRef::new("lang.String")
    }

    pub fn no_class_def_found_error() -> TypeRef {
        TypeRef::new("lang.NoClassDefFoundError")
    }

    pub fn colony() -> TypeRef {
        TypeRef::new("colonist.Colony")
    }

    pub fn colony_founder() -> TypeRef {
        TypeRef::new("colonist.ColonyFounder")
    }

    pub fn colonist_exception() -> TypeRef {
        TypeRef::new("colonist.ColonistException")
    }

    pub fn select_settlers_by_annotation() -> TypeRef {
        TypeRef::new("colonist.SelectSettlersByAnnotation")
    }

    pub fn select_settlers_by_super_type() -> TypeRef {
        TypeRef::new("colonist.SelectSettlersBySuperType")
    }

    pub fn select_settlers_with_registered_selector() -> TypeRef {
        TypeRef::new("colonist.SelectSettlersWithRegisteredSelector")
    }

    pub fn produce_settlers_via_constructor() -> TypeRef {
        TypeRef::new("colonist.ProduceSettlersViaConstructor")
    }

    pub fn produce_settlers_via_callback() -> TypeRef {
        TypeRef::new("colonist.ProduceSettlersViaCallback")
    }

    pub fn produce_settlers_as_classes() -> TypeRef {
        TypeRef::new("colonist.ProduceSettlersAsClasses")
    }

    pub fn accept_settlers_via_callback() -> TypeRef {
        TypeRef::new("colonist.AcceptSettlersViaCallback")
    }

    pub fn accept_settlers_and_forget() -> TypeRef {
        TypeRef::new("colonist.AcceptSettlersAndForget")
    }

    pub fn on_produce_settler() -> TypeRef {
        TypeRef::new("colonist.OnProduceSettler")
    }

    pub fn on_accept_settler() -> TypeRef {
        TypeRef::new("colonist.OnAcceptSettler")
    }
}
