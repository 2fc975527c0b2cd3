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

//! Parsing of concrete colony classes

use colonist_core::mirrors::{ClassMirror, MethodMirror};
use colonist_core::registry::TypeRegistry;
use colonist_core::types::{MethodDescriptor, TypeRef, well_known};

use crate::error::ProcessingError;
use crate::model::{CallbackMethod, Colony, ColonyMarker, SettlerAcceptor, SettlerProducer};

/// Prefix of synthesized bridge methods for non-public callbacks
pub const BRIDGE_PREFIX: &str = "__bridge__";

/// Locates a colony's callback methods and validates their shape
pub struct ColonyParser<'a> {
    registry: &'a TypeRegistry,
}

impl<'a> ColonyParser<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self { registry }
    }

    /// A class may implement several colony markers at once, so callbacks
    /// are matched on both the callback kind and the literal marker value.
    pub fn parse_colony(&self, colony_type: &TypeRef, marker: &ColonyMarker) -> Result<Colony, ProcessingError> {
        let mirror = self.registry.get_class_mirror(colony_type)?;
        let delegate = Colony::delegate_type(colony_type, &marker.annotation_type);

        let producer_callback = find_callback_method(&mirror, &well_known::on_produce_settler(), marker, Some(well_known::class()))?;
        let acceptor_callback = find_callback_method(&mirror, &well_known::on_accept_settler(), marker, accept_parameter_type(marker))?;

        Ok(Colony {
            colony_type: colony_type.clone(),
            delegate,
            marker: marker.clone(),
            producer_callback,
            acceptor_callback,
        })
    }
}

fn find_callback_method(
    mirror: &ClassMirror,
    callback_annotation_type: &TypeRef,
    marker: &ColonyMarker,
    required_parameter_type: Option<TypeRef>,
) -> Result<Option<CallbackMethod>, ProcessingError> {
    let matches: Vec<&MethodMirror> = mirror
        .methods
        .iter()
        .filter(|method| {
            method.annotations.iter().any(|annotation| {
                annotation.annotation_type == *callback_annotation_type
                    && annotation.type_value("colonyAnnotation") == Some(&marker.annotation_type)
            })
        })
        .collect();

    if matches.is_empty() {
        return Ok(None);
    }

    if matches.len() > 1 {
        let method_names = matches.iter().map(|method| method.name.as_str()).collect::<Vec<_>>().join("\n  ");
        return Err(ProcessingError::Model(format!(
            "Class {} contains multiple methods annotated with @{} for colony @{}:\n  {}",
            mirror.type_ref, callback_annotation_type, marker.annotation_type, method_names
        )));
    }

    let method = matches[0];
    if method.signature.parameters.len() != 1 {
        return Err(ProcessingError::Model(format!(
            "Callback method {} in class {} must have a single argument for a settler",
            method.name, mirror.type_ref
        )));
    }

    if let Some(required) = required_parameter_type {
        if method.signature.parameters[0] != required {
            return Err(ProcessingError::Model(format!(
                "Callback method {} in class {} must have a single argument of type {}",
                method.name, mirror.type_ref, required
            )));
        }
    }

    if method.access.is_public() {
        Ok(Some(CallbackMethod::Direct(method.clone())))
    } else {
        Ok(Some(CallbackMethod::Bridged {
            bridge: bridge_descriptor(method),
            method: method.clone(),
        }))
    }
}

fn bridge_descriptor(method: &MethodMirror) -> MethodDescriptor {
    let mut descriptor = method.descriptor();
    descriptor.name = format!("{BRIDGE_PREFIX}{}", method.name);
    descriptor
}

/// The acceptor parameter is only constrained when the produced value is
/// statically known to be a class literal
fn accept_parameter_type(marker: &ColonyMarker) -> Option<TypeRef> {
    if marker.acceptor == SettlerAcceptor::Callback && marker.producer == SettlerProducer::Class {
        Some(well_known::class())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SettlerSelector;
    use colonist_core::flags::Access;
    use colonist_core::mirrors::{AnnotationMirror, AnnotationValue};
    use colonist_core::registry::{TypeRegistry, TypeRegistryBuilder};
    use colonist_core::types::MethodSignature;
    use std::path::Path;

    fn marker() -> ColonyMarker {
        ColonyMarker::new(
            TypeRef::new("demo.Registry"),
            SettlerSelector::Annotation(TypeRef::new("demo.Plugin")),
            SettlerProducer::Class,
            SettlerAcceptor::Callback,
        )
    }

    fn callback_annotation(callback_type: TypeRef) -> AnnotationMirror {
        AnnotationMirror::new(callback_type).with_value("colonyAnnotation", AnnotationValue::Type(TypeRef::new("demo.Registry")))
    }

    fn acceptor_method(name: &str, access: Access, parameters: Vec<TypeRef>) -> MethodMirror {
        MethodMirror::new(access, name, MethodSignature::new(parameters, None))
            .with_annotation(callback_annotation(well_known::on_accept_settler()))
    }

    fn registry_of(mirror: ClassMirror) -> TypeRegistry {
        let mut builder = TypeRegistryBuilder::new();
        builder.add_class(Path::new("test"), mirror);
        builder.build()
    }

    #[test]
    fn test_locates_public_acceptor_as_direct() {
        let registry = registry_of(
            ClassMirror::new(TypeRef::new("demo.AntColony"))
                .with_access(Access::PUBLIC)
                .with_method(acceptor_method("onPlugin", Access::PUBLIC, vec![well_known::class()])),
        );
        let colony = ColonyParser::new(&registry).parse_colony(&TypeRef::new("demo.AntColony"), &marker()).unwrap();

        assert!(colony.producer_callback.is_none());
        match colony.acceptor_callback {
            Some(CallbackMethod::Direct(ref method)) => assert_eq!(method.name, "onPlugin"),
            ref other => panic!("expected a direct callback, got {other:?}"),
        }
        assert_eq!(colony.delegate.class_name(), "__colonist__demo_AntColony_demo_Registry_Delegate");
    }

    #[test]
    fn test_non_public_acceptor_is_bridged() {
        let registry = registry_of(
            ClassMirror::new(TypeRef::new("demo.AntColony"))
                .with_access(Access::PUBLIC)
                .with_method(acceptor_method("onPlugin", Access::PRIVATE, vec![well_known::class()])),
        );
        let colony = ColonyParser::new(&registry).parse_colony(&TypeRef::new("demo.AntColony"), &marker()).unwrap();

        match colony.acceptor_callback {
            Some(CallbackMethod::Bridged { ref bridge, ref method }) => {
                assert_eq!(bridge.name, "__bridge__onPlugin");
                assert_eq!(method.name, "onPlugin");
            }
            ref other => panic!("expected a bridged callback, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_callbacks_enumerate_method_names_in_order() {
        let registry = registry_of(
            ClassMirror::new(TypeRef::new("demo.AntColony"))
                .with_access(Access::PUBLIC)
                .with_method(acceptor_method("onFirst", Access::PUBLIC, vec![well_known::class()]))
                .with_method(acceptor_method("onSecond", Access::PUBLIC, vec![well_known::class()])),
        );
        let message = ColonyParser::new(&registry)
            .parse_colony(&TypeRef::new("demo.AntColony"), &marker())
            .unwrap_err()
            .to_string();

        assert!(message.contains("multiple methods annotated with @colonist.OnAcceptSettler for colony @demo.Registry"));
        let first = message.find("onFirst").unwrap();
        let second = message.find("onSecond").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_wrong_arity_is_rejected() {
        let registry = registry_of(
            ClassMirror::new(TypeRef::new("demo.AntColony"))
                .with_access(Access::PUBLIC)
                .with_method(acceptor_method("onPlugin", Access::PUBLIC, vec![well_known::class(), well_known::class()])),
        );
        let message = ColonyParser::new(&registry)
            .parse_colony(&TypeRef::new("demo.AntColony"), &marker())
            .unwrap_err()
            .to_string();
        assert!(message.contains("must have a single argument for a settler"));
    }

    #[test]
    fn test_class_produced_callback_acceptor_requires_class_parameter() {
        let registry = registry_of(
            ClassMirror::new(TypeRef::new("demo.AntColony"))
                .with_access(Access::PUBLIC)
                .with_method(acceptor_method("onPlugin", Access::PUBLIC, vec![TypeRef::new("demo.Plugin")])),
        );
        let message = ColonyParser::new(&registry)
            .parse_colony(&TypeRef::new("demo.AntColony"), &marker())
            .unwrap_err()
            .to_string();
        assert!(message.contains("must have a single argument of type lang.Class"));
    }

    #[test]
    fn test_unconstrained_acceptor_parameter_when_producer_constructs() {
        let constructor_marker = ColonyMarker::new(
            TypeRef::new("demo.Registry"),
            SettlerSelector::Annotation(TypeRef::new("demo.Plugin")),
            SettlerProducer::Constructor,
            SettlerAcceptor::Callback,
        );
        let registry = registry_of(
            ClassMirror::new(TypeRef::new("demo.AntColony"))
                .with_access(Access::PUBLIC)
                .with_method(acceptor_method("onPlugin", Access::PUBLIC, vec![TypeRef::new("demo.Plugin")])),
        );
        let colony = ColonyParser::new(&registry)
            .parse_colony(&TypeRef::new("demo.AntColony"), &constructor_marker)
            .unwrap();
        assert!(colony.acceptor_callback.is_some());
    }
}
