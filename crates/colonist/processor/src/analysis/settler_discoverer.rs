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

//! Settler discovery per (selector, producer) pair

use std::path::PathBuf;

use colonist_core::mirrors::ClassMirror;
use colonist_core::registry::TypeRegistry;
use colonist_core::types::TypeRef;

use super::annotation_index::AnnotationIndex;
use super::settler_parser::SettlerParser;
use super::subtype_resolver::SubtypeResolver;
use crate::error::{ErrorReporter, ProcessingError, ProcessingException};
use crate::model::{Settler, SettlerProducer, SettlerSelector};

/// Finds matching settler candidates and filters them for producibility.
///
/// Results for a given (selector, producer) pair are deterministic. The
/// discoverer is stateless apart from the shared error reporter, so it is
/// safe to invoke concurrently; callers memoize identical requests.
pub struct SettlerDiscoverer<'a> {
    registry: &'a TypeRegistry,
    annotation_index: &'a AnnotationIndex,
    scope: &'a [PathBuf],
    settler_parser: SettlerParser<'a>,
    error_reporter: &'a ErrorReporter,
}

impl<'a> SettlerDiscoverer<'a> {
    pub fn new(
        registry: &'a TypeRegistry,
        annotation_index: &'a AnnotationIndex,
        scope: &'a [PathBuf],
        error_reporter: &'a ErrorReporter,
    ) -> Self {
        Self {
            registry,
            annotation_index,
            scope,
            settler_parser: SettlerParser::new(registry),
            error_reporter,
        }
    }

    pub fn discover_settlers(
        &self,
        selector: &SettlerSelector,
        producer: &SettlerProducer,
    ) -> Result<Vec<Settler>, ProcessingException> {
        let selected = match selector {
            SettlerSelector::Annotation(annotation_type) => self.select_by_annotation(selector, annotation_type),
            SettlerSelector::SuperType(super_type) => self.select_by_super_type(selector, super_type)?,
            SettlerSelector::Registered => {
                return Err(ProcessingException::new("Registered settler selectors are not supported yet"));
            }
        };
        Ok(self.filter_producible_settlers(selected, selector, producer))
    }

    fn select_by_annotation(&self, selector: &SettlerSelector, annotation_type: &TypeRef) -> Vec<Settler> {
        let mut settlers = Vec::new();
        for settler_type in self.annotation_index.types_annotated_with(annotation_type) {
            match self.registry.get_class_mirror(settler_type) {
                Ok(mirror) => self.collect_public_settler(&mirror, selector, &mut settlers),
                Err(error) => self.error_reporter.report(error.into()),
            }
        }
        settlers
    }

    fn select_by_super_type(&self, selector: &SettlerSelector, super_type: &TypeRef) -> Result<Vec<Settler>, ProcessingException> {
        let resolver = SubtypeResolver::new(self.registry, super_type.clone())?;
        let mut settlers = Vec::new();
        for mirror in self.registry.classes_in(self.scope) {
            if resolver.is_subtype(&mirror)? {
                self.collect_public_settler(&mirror, selector, &mut settlers);
            }
        }
        Ok(settlers)
    }

    fn collect_public_settler(&self, mirror: &ClassMirror, selector: &SettlerSelector, settlers: &mut Vec<Settler>) {
        if !mirror.access.is_public() {
            self.error_reporter.report(ProcessingError::Model(format!(
                "Settler selected by {} should be a public class [{}]",
                selector.describe(),
                mirror.type_ref
            )));
            return;
        }
        match self.settler_parser.parse_settler(&mirror.type_ref) {
            Ok(settler) => settlers.push(settler),
            Err(error) => self.error_reporter.report(error),
        }
    }

    fn filter_producible_settlers(&self, settlers: Vec<Settler>, selector: &SettlerSelector, producer: &SettlerProducer) -> Vec<Settler> {
        settlers
            .into_iter()
            .filter(|settler| {
                let effective = settler.overridden_producer.unwrap_or(*producer);
                self.can_be_produced(settler, selector, effective)
            })
            .collect()
    }

    fn can_be_produced(&self, settler: &Settler, selector: &SettlerSelector, producer: SettlerProducer) -> bool {
        match producer {
            SettlerProducer::Callback | SettlerProducer::Class => true,
            SettlerProducer::Constructor => {
                let mirror = match self.registry.get_class_mirror(&settler.settler_type) {
                    Ok(mirror) => mirror,
                    Err(error) => {
                        self.error_reporter.report(error.into());
                        return false;
                    }
                };

                // Abstract candidates are expected under broad selectors and
                // simply skipped; a concrete class that cannot be constructed
                // is a real configuration problem.
                if mirror.access.is_interface() || mirror.access.is_abstract() {
                    return false;
                }

                if !settler.is_singleton && !mirror.has_public_default_constructor() {
                    self.error_reporter.report(ProcessingError::Model(format!(
                        "Settler selected by {} and produced via constructor does not have public default constructor [{}]",
                        selector.describe(),
                        settler.settler_type
                    )));
                    return false;
                }

                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colonist_core::flags::Access;
    use colonist_core::mirrors::{AnnotationMirror, MethodMirror};
    use colonist_core::registry::TypeRegistryBuilder;
    use colonist_core::types::{CONSTRUCTOR_NAME, MethodSignature, well_known};
    use std::path::Path;

    fn plugin_annotation() -> AnnotationMirror {
        AnnotationMirror::new(TypeRef::new("demo.Plugin"))
    }

    fn default_constructor() -> MethodMirror {
        MethodMirror::new(Access::PUBLIC, CONSTRUCTOR_NAME, MethodSignature::new(Vec::new(), None))
    }

    struct Fixture {
        registry: TypeRegistry,
        annotation_index: AnnotationIndex,
        scope: Vec<PathBuf>,
        error_reporter: ErrorReporter,
    }

    impl Fixture {
        fn new(mirrors: Vec<ClassMirror>) -> Self {
            let mut builder = TypeRegistryBuilder::new();
            for mirror in mirrors {
                builder.add_class(Path::new("test"), mirror);
            }
            let registry = builder.build();
            let scope = vec![PathBuf::from("test")];
            let annotation_index = AnnotationIndex::build(&registry, &scope);
            Self {
                registry,
                annotation_index,
                scope,
                error_reporter: ErrorReporter::new(),
            }
        }

        fn discover(&self, selector: SettlerSelector, producer: SettlerProducer) -> Result<Vec<Settler>, ProcessingException> {
            let discoverer = SettlerDiscoverer::new(&self.registry, &self.annotation_index, &self.scope, &self.error_reporter);
            discoverer.discover_settlers(&selector, &producer)
        }
    }

    fn object_class() -> ClassMirror {
        ClassMirror::new(well_known::object()).with_access(Access::PUBLIC).with_super_type(None)
    }

    #[test]
    fn test_selects_public_classes_by_annotation_in_order() {
        let fixture = Fixture::new(vec![
            ClassMirror::new(TypeRef::new("demo.B"))
                .with_access(Access::PUBLIC)
                .with_annotation(plugin_annotation())
                .with_method(default_constructor()),
            ClassMirror::new(TypeRef::new("demo.A"))
                .with_access(Access::PUBLIC)
                .with_annotation(plugin_annotation())
                .with_method(default_constructor()),
        ]);

        let settlers = fixture
            .discover(SettlerSelector::Annotation(TypeRef::new("demo.Plugin")), SettlerProducer::Class)
            .unwrap();

        let types: Vec<_> = settlers.iter().map(|settler| settler.settler_type.class_name().to_string()).collect();
        assert_eq!(types, vec!["demo.B", "demo.A"]);
        assert!(!fixture.error_reporter.has_errors());
    }

    #[test]
    fn test_non_public_settler_is_excluded_with_one_error() {
        let fixture = Fixture::new(vec![
            ClassMirror::new(TypeRef::new("demo.A"))
                .with_access(Access::PUBLIC)
                .with_annotation(plugin_annotation())
                .with_method(default_constructor()),
            ClassMirror::new(TypeRef::new("demo.B"))
                .with_annotation(plugin_annotation())
                .with_method(default_constructor()),
        ]);

        let settlers = fixture
            .discover(SettlerSelector::Annotation(TypeRef::new("demo.Plugin")), SettlerProducer::Class)
            .unwrap();

        assert_eq!(settlers.len(), 1);
        assert_eq!(settlers[0].settler_type, TypeRef::new("demo.A"));
        assert_eq!(fixture.error_reporter.error_count(), 1);
        let message = fixture.error_reporter.compose_message();
        assert_eq!(message, "Settler selected by @demo.Plugin should be a public class [demo.B]");
    }

    #[test]
    fn test_selects_by_super_type_through_resolver() {
        let fixture = Fixture::new(vec![
            object_class(),
            ClassMirror::new(TypeRef::new("demo.Base"))
                .with_access(Access::PUBLIC)
                .with_method(default_constructor()),
            ClassMirror::new(TypeRef::new("demo.Leaf"))
                .with_access(Access::PUBLIC)
                .with_super_type(Some(TypeRef::new("demo.Base")))
                .with_method(default_constructor()),
            ClassMirror::new(TypeRef::new("demo.Other")).with_access(Access::PUBLIC),
        ]);

        let settlers = fixture
            .discover(SettlerSelector::SuperType(TypeRef::new("demo.Base")), SettlerProducer::Class)
            .unwrap();

        let types: Vec<_> = settlers.iter().map(|settler| settler.settler_type.class_name().to_string()).collect();
        assert_eq!(types, vec!["demo.Base", "demo.Leaf"]);
    }

    #[test]
    fn test_registered_selector_fails_loudly() {
        let fixture = Fixture::new(vec![]);
        let error = fixture.discover(SettlerSelector::Registered, SettlerProducer::Class).unwrap_err();
        assert!(error.message.contains("Registered settler selectors are not supported"));
    }

    #[test]
    fn test_constructor_production_silently_skips_abstract_candidates() {
        let fixture = Fixture::new(vec![
            ClassMirror::new(TypeRef::new("demo.Abstract"))
                .with_access(Access::PUBLIC | Access::ABSTRACT)
                .with_annotation(plugin_annotation()),
            ClassMirror::new(TypeRef::new("demo.Iface"))
                .with_access(Access::PUBLIC | Access::INTERFACE | Access::ABSTRACT)
                .with_annotation(plugin_annotation()),
            ClassMirror::new(TypeRef::new("demo.Concrete"))
                .with_access(Access::PUBLIC)
                .with_annotation(plugin_annotation())
                .with_method(default_constructor()),
        ]);

        let selector = SettlerSelector::Annotation(TypeRef::new("demo.Plugin"));
        let settlers = fixture.discover(selector.clone(), SettlerProducer::Constructor).unwrap();
        assert_eq!(settlers.len(), 1);
        assert_eq!(settlers[0].settler_type, TypeRef::new("demo.Concrete"));
        assert!(!fixture.error_reporter.has_errors());

        // The same abstract candidates are kept when produced as classes.
        let as_classes = fixture.discover(selector, SettlerProducer::Class).unwrap();
        assert_eq!(as_classes.len(), 3);
    }

    #[test]
    fn test_non_instantiable_concrete_settler_is_an_error() {
        let fixture = Fixture::new(vec![
            ClassMirror::new(TypeRef::new("demo.NoCtor"))
                .with_access(Access::PUBLIC)
                .with_annotation(plugin_annotation())
                .with_method(MethodMirror::new(Access::PRIVATE, CONSTRUCTOR_NAME, MethodSignature::new(Vec::new(), None))),
        ]);

        let settlers = fixture
            .discover(SettlerSelector::Annotation(TypeRef::new("demo.Plugin")), SettlerProducer::Constructor)
            .unwrap();

        assert!(settlers.is_empty());
        let message = fixture.error_reporter.compose_message();
        assert_eq!(
            message,
            "Settler selected by @demo.Plugin and produced via constructor does not have public default constructor [demo.NoCtor]"
        );
    }

    #[test]
    fn test_singleton_settler_is_constructor_producible_without_public_constructor() {
        let fixture = Fixture::new(vec![
            ClassMirror::new(TypeRef::new("demo.Singleton"))
                .with_access(Access::PUBLIC | Access::SINGLETON)
                .with_annotation(plugin_annotation()),
        ]);

        let settlers = fixture
            .discover(SettlerSelector::Annotation(TypeRef::new("demo.Plugin")), SettlerProducer::Constructor)
            .unwrap();

        assert_eq!(settlers.len(), 1);
        assert!(settlers[0].is_singleton);
        assert!(!fixture.error_reporter.has_errors());
    }

    #[test]
    fn test_settler_override_takes_precedence_for_producibility() {
        // Overridden to callback production, so the missing constructor is
        // irrelevant.
        let fixture = Fixture::new(vec![
            ClassMirror::new(TypeRef::new("demo.Overridden"))
                .with_access(Access::PUBLIC)
                .with_annotation(plugin_annotation())
                .with_annotation(AnnotationMirror::new(well_known::produce_settlers_via_callback())),
        ]);

        let settlers = fixture
            .discover(SettlerSelector::Annotation(TypeRef::new("demo.Plugin")), SettlerProducer::Constructor)
            .unwrap();

        assert_eq!(settlers.len(), 1);
        assert!(!fixture.error_reporter.has_errors());
    }
}
