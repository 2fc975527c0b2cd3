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

//! Rewriting of colony classes

use indexmap::IndexMap;

use colonist_core::error::CoreResult;
use colonist_core::mirrors::{ClassMirror, MethodMirror};
use colonist_core::types::{MethodDescriptor, TypeRef, well_known};

use super::code_builder::{new_method, new_method_try_catch};
use super::{DELEGATE_MISSING_MESSAGE, delegate_found_descriptor, dispatcher_descriptor};
use crate::model::{CallbackMethod, Colony};
use crate::watermark;

/// Patches a colony's class: marker interface, visibility, the dispatcher
/// method and bridges for non-public callbacks.
///
/// One class may found several colonies (one per marker); the patcher
/// receives all of them and emits a single dispatcher covering every marker.
pub struct ColonyPatcher<'a> {
    colonies: &'a [Colony],
}

impl<'a> ColonyPatcher<'a> {
    pub fn new(colonies: &'a [Colony]) -> Self {
        Self { colonies }
    }

    pub fn patch(&self, mirror: &ClassMirror) -> CoreResult<ClassMirror> {
        let mut patched = mirror.clone();

        // The generated delegate lives in another class and calls back in.
        patched.access = patched.access.as_public();

        let founder = well_known::colony_founder();
        if !patched.implements(&founder) {
            patched.interfaces.push(founder);
        }

        // Drop any dispatcher from a previous processing pass before
        // emitting the current one, so repeated runs never accumulate
        // duplicates.
        let dispatcher = dispatcher_descriptor();
        patched.methods.retain(|method| method.descriptor() != dispatcher);
        patched.methods.push(self.generate_dispatcher_method()?);

        for bridge in self.generate_bridge_methods(&patched.type_ref)? {
            patched.methods.push(bridge);
        }

        watermark::mark(&mut patched);
        Ok(patched)
    }

    /// `found(markerClass)` dispatches to the delegate of the matching
    /// marker; `found(null)` dispatches every marker in order. A marker that
    /// matches nothing, and a delegate class missing at runtime, both raise
    /// the advisory exception.
    fn generate_dispatcher_method(&self) -> CoreResult<MethodMirror> {
        let colonies = self.colonies;
        new_method_try_catch(
            colonist_core::flags::Access::PUBLIC,
            &dispatcher_descriptor(),
            well_known::no_class_def_found_error(),
            |builder| {
                builder.load_arg(0);
                builder.if_null(|builder| {
                    for colony in colonies {
                        builder.load_this();
                        builder.invoke_static(colony.delegate.clone(), delegate_found_descriptor(&colony.colony_type));
                    }
                    builder.return_value();
                });

                for colony in colonies {
                    builder.load_arg(0);
                    builder.push_type(colony.marker.annotation_type.clone());
                    builder.if_ref_eq(|builder| {
                        builder.load_this();
                        builder.invoke_static(colony.delegate.clone(), delegate_found_descriptor(&colony.colony_type));
                        builder.return_value();
                    });
                }

                builder.throw_exception(well_known::colonist_exception(), DELEGATE_MISSING_MESSAGE);
            },
            |builder| {
                builder.throw_exception(well_known::colonist_exception(), DELEGATE_MISSING_MESSAGE);
            },
        )
    }

    fn generate_bridge_methods(&self, owner: &TypeRef) -> CoreResult<Vec<MethodMirror>> {
        // Two colonies of the same class may bridge the same method; keyed by
        // bridge name so it is emitted once.
        let mut bridged: IndexMap<String, (MethodDescriptor, MethodMirror)> = IndexMap::new();
        for colony in self.colonies {
            for callback in [&colony.producer_callback, &colony.acceptor_callback].into_iter().flatten() {
                if let CallbackMethod::Bridged { bridge, method } = callback {
                    bridged.entry(bridge.name.clone()).or_insert_with(|| (bridge.clone(), method.clone()));
                }
            }
        }

        let mut methods = Vec::with_capacity(bridged.len());
        for (_, (bridge, method)) in bridged {
            methods.push(generate_bridge_method(owner, &bridge, &method)?);
        }
        Ok(methods)
    }
}

/// A public same-shape method forwarding to the original callback
fn generate_bridge_method(owner: &TypeRef, bridge: &MethodDescriptor, method: &MethodMirror) -> CoreResult<MethodMirror> {
    let owner = owner.clone();
    let original = method.clone();
    new_method(method.access.as_public(), bridge, move |builder| {
        if !original.access.is_static() {
            builder.load_this();
        }
        for index in 0..original.signature.parameters.len() {
            builder.load_arg(index as u16);
        }
        if original.access.is_static() {
            builder.invoke_static(owner, original.descriptor());
        } else if original.access.is_private() {
            builder.invoke_special(owner, original.descriptor());
        } else {
            builder.invoke_virtual(owner, original.descriptor());
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ColonyMarker, SettlerAcceptor, SettlerProducer, SettlerSelector};
    use colonist_core::code::Instruction;
    use colonist_core::flags::Access;
    use colonist_core::mirrors::AnnotationMirror;
    use colonist_core::types::MethodSignature;

    fn marker(name: &str) -> ColonyMarker {
        ColonyMarker::new(
            TypeRef::new(name),
            SettlerSelector::Annotation(TypeRef::new("demo.Plugin")),
            SettlerProducer::Class,
            SettlerAcceptor::None,
        )
    }

    fn colony(colony_type: &str, marker_type: &str) -> Colony {
        let colony_type = TypeRef::new(colony_type);
        let marker = marker(marker_type);
        Colony {
            delegate: Colony::delegate_type(&colony_type, &marker.annotation_type),
            colony_type,
            marker,
            producer_callback: None,
            acceptor_callback: None,
        }
    }

    fn colony_class(name: &str) -> ClassMirror {
        ClassMirror::new(TypeRef::new(name))
            .with_access(Access::PUBLIC)
            .with_annotation(AnnotationMirror::new(TypeRef::new("demo.Registry")))
    }

    #[test]
    fn test_patch_adds_founder_interface_visibility_and_watermark() {
        let colonies = vec![colony("demo.AntColony", "demo.Registry")];
        let patcher = ColonyPatcher::new(&colonies);
        let mirror = colony_class("demo.AntColony").with_access(Access::empty());

        let patched = patcher.patch(&mirror).unwrap();

        assert!(patched.access.is_public());
        assert!(patched.implements(&well_known::colony_founder()));
        assert!(watermark::is_marked(&patched));
        assert!(patched.methods.iter().any(|method| method.descriptor() == dispatcher_descriptor()));
    }

    #[test]
    fn test_patch_is_idempotent_for_interfaces_and_dispatcher() {
        let colonies = vec![colony("demo.AntColony", "demo.Registry")];
        let patcher = ColonyPatcher::new(&colonies);
        let mirror = colony_class("demo.AntColony");

        let once = patcher.patch(&mirror).unwrap();
        let twice = patcher.patch(&once).unwrap();

        let founder_count = twice.interfaces.iter().filter(|i| **i == well_known::colony_founder()).count();
        assert_eq!(founder_count, 1);
        let dispatcher_count = twice
            .methods
            .iter()
            .filter(|method| method.descriptor() == dispatcher_descriptor())
            .count();
        assert_eq!(dispatcher_count, 1);
    }

    #[test]
    fn test_dispatcher_covers_null_and_every_marker() {
        let colonies = vec![colony("demo.AntColony", "demo.Registry"), colony("demo.AntColony", "demo.Hive")];
        let patcher = ColonyPatcher::new(&colonies);

        let patched = patcher.patch(&colony_class("demo.AntColony")).unwrap();
        let dispatcher = patched
            .methods
            .iter()
            .find(|method| method.descriptor() == dispatcher_descriptor())
            .unwrap();
        let body = dispatcher.body.as_ref().unwrap();

        let delegate_calls = body
            .instructions
            .iter()
            .filter(|instruction| matches!(instruction, Instruction::InvokeStatic { .. }))
            .count();
        // Two calls under the null branch plus one per marker comparison.
        assert_eq!(delegate_calls, 4);

        let marker_pushes: Vec<_> = body
            .instructions
            .iter()
            .filter_map(|instruction| match instruction {
                Instruction::PushType(type_ref) => Some(type_ref.class_name().to_string()),
                _ => None,
            })
            .collect();
        assert!(marker_pushes.contains(&"demo.Registry".to_string()));
        assert!(marker_pushes.contains(&"demo.Hive".to_string()));

        assert_eq!(body.try_catches.len(), 1);
        assert_eq!(body.try_catches[0].exception_type, well_known::no_class_def_found_error());
    }

    #[test]
    fn test_bridges_are_emitted_for_non_public_callbacks() {
        let callback = MethodMirror::new(Access::PRIVATE, "onPlugin", MethodSignature::new(vec![well_known::class()], None));
        let mut bridged_colony = colony("demo.AntColony", "demo.Registry");
        bridged_colony.acceptor_callback = Some(CallbackMethod::Bridged {
            bridge: MethodDescriptor::new("__bridge__onPlugin", vec![well_known::class()], None),
            method: callback.clone(),
        });
        let colonies = vec![bridged_colony];
        let patcher = ColonyPatcher::new(&colonies);

        let patched = patcher.patch(&colony_class("demo.AntColony").with_method(callback)).unwrap();

        let bridge = patched.methods.iter().find(|method| method.name == "__bridge__onPlugin").unwrap();
        assert!(bridge.access.is_public());
        let instructions = &bridge.body.as_ref().unwrap().instructions;
        assert_eq!(
            instructions,
            &vec![
                Instruction::LoadThis,
                Instruction::LoadArg(0),
                Instruction::InvokeSpecial {
                    owner: TypeRef::new("demo.AntColony"),
                    method: MethodDescriptor::new("onPlugin", vec![well_known::class()], None),
                },
                Instruction::Return,
            ]
        );
    }
}
