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

//! Synthesis of per-colony delegate classes

use colonist_core::flags::Access;
use colonist_core::mirrors::{ClassMirror, MethodMirror};
use colonist_core::types::{INSTANCE_FIELD, MethodDescriptor, TypeRef};

use super::code_builder::CodeBuilder;
use super::delegate_found_descriptor;
use crate::error::ProcessingError;
use crate::model::{CallbackMethod, Colony, Settler, SettlerAcceptor, SettlerProducer};
use crate::watermark;

/// Emits the delegate class holding a colony's settler-wiring logic.
///
/// The delegate's `found` method produces and accepts each settler in
/// discovery order; acceptor callbacks may have observable side effects, so
/// that order is part of the contract.
pub struct DelegateGenerator;

impl DelegateGenerator {
    pub fn generate(colony: &Colony, settlers: &[Settler]) -> Result<ClassMirror, ProcessingError> {
        let mut mirror = ClassMirror::new(colony.delegate.clone())
            .with_access(Access::PUBLIC | Access::FINAL)
            .with_method(Self::generate_found_method(colony, settlers)?);
        watermark::mark(&mut mirror);
        Ok(mirror)
    }

    fn generate_found_method(colony: &Colony, settlers: &[Settler]) -> Result<MethodMirror, ProcessingError> {
        let descriptor = delegate_found_descriptor(&colony.colony_type);
        let mut builder = CodeBuilder::for_method(&descriptor);
        for settler in settlers {
            Self::produce_settler(&mut builder, colony, settler)?;
            Self::accept_settler(&mut builder, colony, settler)?;
        }
        builder.return_value();

        let body = builder.into_body()?;
        Ok(MethodMirror::new(Access::PUBLIC | Access::STATIC, descriptor.name, descriptor.signature).with_body(body))
    }

    fn produce_settler(builder: &mut CodeBuilder, colony: &Colony, settler: &Settler) -> Result<(), ProcessingError> {
        match settler.producer_for(&colony.marker) {
            SettlerProducer::Constructor => {
                if settler.is_singleton {
                    builder.get_static(settler.settler_type.clone(), INSTANCE_FIELD, settler.settler_type.clone());
                } else {
                    builder.new_instance(settler.settler_type.clone());
                    builder.dup();
                    builder.invoke_constructor(settler.settler_type.clone(), MethodDescriptor::for_default_constructor());
                }
            }
            SettlerProducer::Callback => {
                let callback = required_callback(&colony.producer_callback, colony, "producer")?;
                let (target, is_static) = callback.call_target();
                if !is_static {
                    builder.load_arg(0);
                }
                builder.push_type(settler.settler_type.clone());
                invoke_callback(builder, &colony.colony_type, target, is_static);
            }
            SettlerProducer::Class => builder.push_type(settler.settler_type.clone()),
        }
        Ok(())
    }

    fn accept_settler(builder: &mut CodeBuilder, colony: &Colony, settler: &Settler) -> Result<(), ProcessingError> {
        match settler.acceptor_for(&colony.marker) {
            SettlerAcceptor::None => builder.pop(),
            SettlerAcceptor::Callback => {
                let callback = required_callback(&colony.acceptor_callback, colony, "acceptor")?;
                let (target, is_static) = callback.call_target();
                let parameter_type = target.signature.parameters.first().cloned().ok_or_else(|| {
                    ProcessingError::Model(format!(
                        "Acceptor callback {} of colony {} has no settler parameter",
                        target.name, colony.colony_type
                    ))
                })?;
                builder.check_cast(parameter_type);
                if is_static {
                    builder.invoke_static(colony.colony_type.clone(), target);
                } else {
                    builder.load_arg(0);
                    builder.swap();
                    builder.invoke_virtual(colony.colony_type.clone(), target);
                }
            }
        }
        Ok(())
    }
}

fn required_callback<'a>(callback: &'a Option<CallbackMethod>, colony: &Colony, kind: &str) -> Result<&'a CallbackMethod, ProcessingError> {
    callback.as_ref().ok_or_else(|| {
        ProcessingError::Model(format!("Colony {} has no {kind} callback for delegate generation", colony.colony_type))
    })
}

fn invoke_callback(builder: &mut CodeBuilder, colony_type: &TypeRef, target: MethodDescriptor, is_static: bool) {
    if is_static {
        builder.invoke_static(colony_type.clone(), target);
    } else {
        builder.invoke_virtual(colony_type.clone(), target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ColonyMarker, SettlerSelector};
    use colonist_core::code::Instruction;
    use colonist_core::types::{MethodSignature, well_known};

    fn colony(producer: SettlerProducer, acceptor: SettlerAcceptor) -> Colony {
        let marker = ColonyMarker::new(
            TypeRef::new("demo.Registry"),
            SettlerSelector::Annotation(TypeRef::new("demo.Plugin")),
            producer,
            acceptor,
        );
        let colony_type = TypeRef::new("demo.AntColony");
        Colony {
            delegate: Colony::delegate_type(&colony_type, &marker.annotation_type),
            colony_type,
            marker,
            producer_callback: None,
            acceptor_callback: None,
        }
    }

    fn acceptor_callback(parameter: TypeRef) -> CallbackMethod {
        CallbackMethod::Direct(MethodMirror::new(
            Access::PUBLIC,
            "onPlugin",
            MethodSignature::new(vec![parameter], None),
        ))
    }

    fn found_instructions(colony: &Colony, settlers: &[Settler]) -> Vec<Instruction> {
        let mirror = DelegateGenerator::generate(colony, settlers).unwrap();
        mirror.methods[0].body.as_ref().unwrap().instructions.clone()
    }

    #[test]
    fn test_delegate_class_shape() {
        let colony = colony(SettlerProducer::Class, SettlerAcceptor::None);
        let mirror = DelegateGenerator::generate(&colony, &[]).unwrap();

        assert_eq!(mirror.type_ref, colony.delegate);
        assert!(mirror.access.is_public());
        assert!(mirror.access.contains(Access::FINAL));
        assert!(watermark::is_marked(&mirror));
        assert_eq!(mirror.methods.len(), 1);
        let found = &mirror.methods[0];
        assert!(found.access.is_static());
        assert_eq!(found.signature.parameters, vec![TypeRef::new("demo.AntColony")]);
    }

    #[test]
    fn test_class_production_with_callback_acceptance_in_order() {
        let mut colony = colony(SettlerProducer::Class, SettlerAcceptor::Callback);
        colony.acceptor_callback = Some(acceptor_callback(well_known::class()));
        let settlers = vec![Settler::new(TypeRef::new("demo.A"), false), Settler::new(TypeRef::new("demo.B"), false)];

        let on_plugin = MethodDescriptor::new("onPlugin", vec![well_known::class()], None);
        assert_eq!(
            found_instructions(&colony, &settlers),
            vec![
                Instruction::PushType(TypeRef::new("demo.A")),
                Instruction::CheckCast(well_known::class()),
                Instruction::LoadArg(0),
                Instruction::Swap,
                Instruction::InvokeVirtual {
                    owner: TypeRef::new("demo.AntColony"),
                    method: on_plugin.clone(),
                },
                Instruction::PushType(TypeRef::new("demo.B")),
                Instruction::CheckCast(well_known::class()),
                Instruction::LoadArg(0),
                Instruction::Swap,
                Instruction::InvokeVirtual {
                    owner: TypeRef::new("demo.AntColony"),
                    method: on_plugin,
                },
                Instruction::Return,
            ]
        );
    }

    #[test]
    fn test_constructor_production_discarding_result() {
        let colony = colony(SettlerProducer::Constructor, SettlerAcceptor::None);
        let settlers = vec![Settler::new(TypeRef::new("demo.A"), false)];

        assert_eq!(
            found_instructions(&colony, &settlers),
            vec![
                Instruction::New(TypeRef::new("demo.A")),
                Instruction::Dup,
                Instruction::InvokeSpecial {
                    owner: TypeRef::new("demo.A"),
                    method: MethodDescriptor::for_default_constructor(),
                },
                Instruction::Pop,
                Instruction::Return,
            ]
        );
    }

    #[test]
    fn test_singleton_production_reads_the_instance_field() {
        let colony = colony(SettlerProducer::Constructor, SettlerAcceptor::None);
        let settlers = vec![Settler::new(TypeRef::new("demo.Singleton"), true)];

        assert_eq!(
            found_instructions(&colony, &settlers),
            vec![
                Instruction::GetStatic {
                    owner: TypeRef::new("demo.Singleton"),
                    field: INSTANCE_FIELD.to_string(),
                    field_type: TypeRef::new("demo.Singleton"),
                },
                Instruction::Pop,
                Instruction::Return,
            ]
        );
    }

    #[test]
    fn test_callback_production_passes_the_settler_class() {
        let mut colony = colony(SettlerProducer::Callback, SettlerAcceptor::None);
        colony.producer_callback = Some(CallbackMethod::Direct(MethodMirror::new(
            Access::PUBLIC,
            "produce",
            MethodSignature::new(vec![well_known::class()], Some(well_known::object())),
        )));
        let settlers = vec![Settler::new(TypeRef::new("demo.A"), false)];

        assert_eq!(
            found_instructions(&colony, &settlers),
            vec![
                Instruction::LoadArg(0),
                Instruction::PushType(TypeRef::new("demo.A")),
                Instruction::InvokeVirtual {
                    owner: TypeRef::new("demo.AntColony"),
                    method: MethodDescriptor::new("produce", vec![well_known::class()], Some(well_known::object())),
                },
                Instruction::Pop,
                Instruction::Return,
            ]
        );
    }

    #[test]
    fn test_bridged_callback_is_invoked_through_the_bridge() {
        let mut colony = colony(SettlerProducer::Class, SettlerAcceptor::Callback);
        colony.acceptor_callback = Some(CallbackMethod::Bridged {
            bridge: MethodDescriptor::new("__bridge__onPlugin", vec![well_known::class()], None),
            method: MethodMirror::new(Access::PRIVATE, "onPlugin", MethodSignature::new(vec![well_known::class()], None)),
        });
        let settlers = vec![Settler::new(TypeRef::new("demo.A"), false)];

        let instructions = found_instructions(&colony, &settlers);
        assert!(instructions.iter().any(|instruction| matches!(
            instruction,
            Instruction::InvokeVirtual { method, .. } if method.name == "__bridge__onPlugin"
        )));
    }

    #[test]
    fn test_settler_override_switches_production() {
        let colony = colony(SettlerProducer::Class, SettlerAcceptor::None);
        let mut overridden = Settler::new(TypeRef::new("demo.A"), false);
        overridden.overridden_producer = Some(SettlerProducer::Constructor);

        let instructions = found_instructions(&colony, &[overridden]);
        assert!(matches!(instructions[0], Instruction::New(_)));
    }

    #[test]
    fn test_missing_callback_is_a_model_error() {
        let colony = colony(SettlerProducer::Callback, SettlerAcceptor::None);
        let settlers = vec![Settler::new(TypeRef::new("demo.A"), false)];
        let error = DelegateGenerator::generate(&colony, &settlers).unwrap_err();
        assert!(error.to_string().contains("has no producer callback"));
    }
}
