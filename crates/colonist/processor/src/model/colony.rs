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

use colonist_core::mirrors::MethodMirror;
use colonist_core::types::{MethodDescriptor, TypeRef};

use super::ColonyMarker;

/// A colony callback method located on the colony class.
///
/// Non-public callbacks cannot be invoked from the generated delegate, which
/// lives in a different class; those are wrapped in a `Bridged` variant
/// carrying the descriptor of a public bridge method the patcher emits next
/// to the original.
#[derive(Debug, Clone, PartialEq)]
pub enum CallbackMethod {
    Direct(MethodMirror),
    Bridged { bridge: MethodDescriptor, method: MethodMirror },
}

impl CallbackMethod {
    pub fn method(&self) -> &MethodMirror {
        match self {
            CallbackMethod::Direct(method) => method,
            CallbackMethod::Bridged { method, .. } => method,
        }
    }

    /// The externally callable descriptor and whether it is static
    pub fn call_target(&self) -> (MethodDescriptor, bool) {
        match self {
            CallbackMethod::Direct(method) => (method.descriptor(), method.access.is_static()),
            CallbackMethod::Bridged { bridge, method } => (bridge.clone(), method.access.is_static()),
        }
    }
}

/// One concrete class using a colony marker
#[derive(Debug, Clone, PartialEq)]
pub struct Colony {
    pub colony_type: TypeRef,
    /// Synthesized delegate type, derived deterministically from the colony
    /// and marker types
    pub delegate: TypeRef,
    pub marker: ColonyMarker,
    pub producer_callback: Option<CallbackMethod>,
    pub acceptor_callback: Option<CallbackMethod>,
}

impl Colony {
    /// The delegate type name for a colony/marker pair
    pub fn delegate_type(colony_type: &TypeRef, marker_type: &TypeRef) -> TypeRef {
        TypeRef::new(format!(
            "__colonist__{}_{}_Delegate",
            colony_type.sanitized_name(),
            marker_type.sanitized_name()
        ))
    }
}
