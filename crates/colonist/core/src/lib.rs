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

//! Class-container library for the colonist processor
//!
//! This crate owns everything about compiled classes as data: the
//! class-file wire format, structural metadata mirrors, the per-run type
//! registry, container sources/sinks and the stack-based instruction model
//! used for generated method bodies. The processor crate consumes these
//! capabilities and never touches the binary format directly.

pub mod classfile;
pub mod code;
pub mod error;
pub mod flags;
pub mod io;
pub mod mirrors;
pub mod registry;
pub mod types;

pub use error::{CoreError, CoreResult};
pub use flags::Access;
pub use mirrors::{AnnotationMirror, AnnotationValue, ClassAttribute, ClassMirror, FieldMirror, MethodMirror};
pub use registry::{TypeRegistry, TypeRegistryBuilder};
pub use types::{MethodDescriptor, MethodSignature, TypeRef};
