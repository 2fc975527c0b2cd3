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

//! Class patching and delegate generation
//!
//! Two cooperating generators turn a colony and its resolved settlers into
//! executable dispatch logic: the patcher rewrites the colony's own class
//! and the delegate generator synthesizes one new class per colony holding
//! the settler-wiring body.

pub mod class_producer;
pub mod code_builder;
pub mod colony_patcher;
pub mod delegate_generator;

pub use class_producer::ClassProducer;
pub use code_builder::CodeBuilder;
pub use colony_patcher::ColonyPatcher;
pub use delegate_generator::DelegateGenerator;

use colonist_core::types::{MethodDescriptor, TypeRef, well_known};

/// Name of both the patched dispatcher and the delegate entry point
pub const FOUND_METHOD_NAME: &str = "found";

/// Runtime advisory raised when dispatch cannot reach a delegate
pub const DELEGATE_MISSING_MESSAGE: &str = "Failed to find colony delegate, is colonist plugin applied to the application module?";

/// `found(lang.Class)` on the patched colony class
pub fn dispatcher_descriptor() -> MethodDescriptor {
    MethodDescriptor::new(FOUND_METHOD_NAME, vec![well_known::class()], None)
}

/// `static found(colonyType)` on the generated delegate
pub fn delegate_found_descriptor(colony_type: &TypeRef) -> MethodDescriptor {
    MethodDescriptor::new(FOUND_METHOD_NAME, vec![colony_type.clone()], None)
}
