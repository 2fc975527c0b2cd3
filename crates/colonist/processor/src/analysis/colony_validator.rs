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

//! Cross-checks between a colony's callbacks and its settlers

use crate::error::{ErrorReporter, ProcessingError};
use crate::model::{Colony, Settler, SettlerAcceptor, SettlerProducer};

/// Validates that a colony declares the callbacks its settlers resolve to.
/// Violations are collected, not thrown, so a single run reports every
/// missing capability at once.
pub struct ColonyValidator<'a> {
    error_reporter: &'a ErrorReporter,
}

impl<'a> ColonyValidator<'a> {
    pub fn new(error_reporter: &'a ErrorReporter) -> Self {
        Self { error_reporter }
    }

    pub fn validate_colony(&self, colony: &Colony, settlers: &[Settler]) {
        self.validate_settler_producer(colony, settlers);
        self.validate_settler_acceptor(colony, settlers);
    }

    fn validate_settler_producer(&self, colony: &Colony, settlers: &[Settler]) {
        if colony.producer_callback.is_some() {
            return;
        }

        let callback_produced: Vec<&Settler> = settlers
            .iter()
            .filter(|settler| settler.producer_for(&colony.marker) == SettlerProducer::Callback)
            .collect();
        if callback_produced.is_empty() {
            return;
        }

        self.error_reporter.report(ProcessingError::Model(format!(
            "Colony {} expected to have a producer callback for settlers [{}]",
            colony.colony_type,
            join_types(&callback_produced)
        )));
    }

    fn validate_settler_acceptor(&self, colony: &Colony, settlers: &[Settler]) {
        if colony.acceptor_callback.is_some() {
            return;
        }

        let callback_accepted: Vec<&Settler> = settlers
            .iter()
            .filter(|settler| settler.acceptor_for(&colony.marker) == SettlerAcceptor::Callback)
            .collect();
        if callback_accepted.is_empty() {
            return;
        }

        self.error_reporter.report(ProcessingError::Model(format!(
            "Colony {} expected to have an acceptor callback for settlers [{}]",
            colony.colony_type,
            join_types(&callback_accepted)
        )));
    }
}

fn join_types(settlers: &[&Settler]) -> String {
    settlers
        .iter()
        .map(|settler| settler.settler_type.class_name().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ColonyMarker, SettlerSelector};
    use colonist_core::flags::Access;
    use colonist_core::mirrors::MethodMirror;
    use colonist_core::types::{MethodSignature, TypeRef, well_known};

    fn colony(producer: SettlerProducer, acceptor: SettlerAcceptor, with_callbacks: bool) -> Colony {
        let marker = ColonyMarker::new(
            TypeRef::new("demo.Registry"),
            SettlerSelector::Annotation(TypeRef::new("demo.Plugin")),
            producer,
            acceptor,
        );
        let callback = crate::model::CallbackMethod::Direct(MethodMirror::new(
            Access::PUBLIC,
            "onSettler",
            MethodSignature::new(vec![well_known::class()], None),
        ));
        Colony {
            colony_type: TypeRef::new("demo.AntColony"),
            delegate: Colony::delegate_type(&TypeRef::new("demo.AntColony"), &TypeRef::new("demo.Registry")),
            marker,
            producer_callback: with_callbacks.then(|| callback.clone()),
            acceptor_callback: with_callbacks.then(|| callback),
        }
    }

    #[test]
    fn test_missing_producer_callback_lists_exactly_the_callback_settlers() {
        let reporter = ErrorReporter::new();
        let validator = ColonyValidator::new(&reporter);
        let mut class_produced = Settler::new(TypeRef::new("demo.C"), false);
        class_produced.overridden_producer = Some(SettlerProducer::Class);
        let settlers = vec![
            Settler::new(TypeRef::new("demo.A"), false),
            Settler::new(TypeRef::new("demo.B"), false),
            class_produced,
        ];

        validator.validate_colony(&colony(SettlerProducer::Callback, SettlerAcceptor::None, false), &settlers);

        assert_eq!(reporter.error_count(), 1);
        assert_eq!(
            reporter.compose_message(),
            "Colony demo.AntColony expected to have a producer callback for settlers [demo.A, demo.B]"
        );
    }

    #[test]
    fn test_missing_acceptor_callback_is_symmetric() {
        let reporter = ErrorReporter::new();
        let validator = ColonyValidator::new(&reporter);
        let settlers = vec![Settler::new(TypeRef::new("demo.A"), false)];

        validator.validate_colony(&colony(SettlerProducer::Class, SettlerAcceptor::Callback, false), &settlers);

        assert_eq!(
            reporter.compose_message(),
            "Colony demo.AntColony expected to have an acceptor callback for settlers [demo.A]"
        );
    }

    #[test]
    fn test_declared_callbacks_satisfy_the_requirement() {
        let reporter = ErrorReporter::new();
        let validator = ColonyValidator::new(&reporter);
        let settlers = vec![Settler::new(TypeRef::new("demo.A"), false)];

        validator.validate_colony(&colony(SettlerProducer::Callback, SettlerAcceptor::Callback, true), &settlers);

        assert!(!reporter.has_errors());
    }

    #[test]
    fn test_no_callback_settlers_means_no_requirement() {
        let reporter = ErrorReporter::new();
        let validator = ColonyValidator::new(&reporter);
        let settlers = vec![Settler::new(TypeRef::new("demo.A"), false)];

        validator.validate_colony(&colony(SettlerProducer::Constructor, SettlerAcceptor::None, false), &settlers);

        assert!(!reporter.has_errors());
    }
}
