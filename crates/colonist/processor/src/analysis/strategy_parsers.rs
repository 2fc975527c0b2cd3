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

//! Strict parse tables from strategy annotations to tagged variants
//!
//! Each parser answers `Ok(None)` for annotations outside its closed table,
//! so callers can classify a mixed annotation list; a recognized annotation
//! with a malformed shape is a model error naming it.

use colonist_core::mirrors::AnnotationMirror;
use colonist_core::types::{TypeRef, well_known};

use crate::error::ProcessingError;
use crate::model::{SettlerAcceptor, SettlerProducer, SettlerSelector};

/// Parses one of the three settler selector annotations
pub fn parse_settler_selector(annotation: &AnnotationMirror) -> Result<Option<SettlerSelector>, ProcessingError> {
    let annotation_type = &annotation.annotation_type;
    if *annotation_type == well_known::select_settlers_by_annotation() {
        Ok(Some(SettlerSelector::Annotation(require_type_value(annotation)?)))
    } else if *annotation_type == well_known::select_settlers_by_super_type() {
        Ok(Some(SettlerSelector::SuperType(require_type_value(annotation)?)))
    } else if *annotation_type == well_known::select_settlers_with_registered_selector() {
        Ok(Some(SettlerSelector::Registered))
    } else {
        Ok(None)
    }
}

/// Parses one of the three settler producer annotations
pub fn parse_settler_producer(annotation: &AnnotationMirror) -> Result<Option<SettlerProducer>, ProcessingError> {
    let annotation_type = &annotation.annotation_type;
    if *annotation_type == well_known::produce_settlers_via_constructor() {
        Ok(Some(SettlerProducer::Constructor))
    } else if *annotation_type == well_known::produce_settlers_via_callback() {
        Ok(Some(SettlerProducer::Callback))
    } else if *annotation_type == well_known::produce_settlers_as_classes() {
        Ok(Some(SettlerProducer::Class))
    } else {
        Ok(None)
    }
}

/// Parses one of the two settler acceptor annotations
pub fn parse_settler_acceptor(annotation: &AnnotationMirror) -> Result<Option<SettlerAcceptor>, ProcessingError> {
    let annotation_type = &annotation.annotation_type;
    if *annotation_type == well_known::accept_settlers_and_forget() {
        Ok(Some(SettlerAcceptor::None))
    } else if *annotation_type == well_known::accept_settlers_via_callback() {
        Ok(Some(SettlerAcceptor::Callback))
    } else {
        Ok(None)
    }
}

fn require_type_value(annotation: &AnnotationMirror) -> Result<TypeRef, ProcessingError> {
    annotation.type_value("value").cloned().ok_or_else(|| {
        ProcessingError::Model(format!("Annotation @{} must declare a value type", annotation.annotation_type))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use colonist_core::mirrors::AnnotationValue;

    #[test]
    fn test_selector_table() {
        let by_annotation = AnnotationMirror::new(well_known::select_settlers_by_annotation())
            .with_value("value", AnnotationValue::Type(TypeRef::new("demo.Plugin")));
        assert_eq!(
            parse_settler_selector(&by_annotation).unwrap(),
            Some(SettlerSelector::Annotation(TypeRef::new("demo.Plugin")))
        );

        let registered = AnnotationMirror::new(well_known::select_settlers_with_registered_selector());
        assert_eq!(parse_settler_selector(&registered).unwrap(), Some(SettlerSelector::Registered));

        let unrelated = AnnotationMirror::new(TypeRef::new("demo.Retention"));
        assert_eq!(parse_settler_selector(&unrelated).unwrap(), None);
    }

    #[test]
    fn test_selector_without_value_is_a_model_error() {
        let malformed = AnnotationMirror::new(well_known::select_settlers_by_super_type());
        let error = parse_settler_selector(&malformed).unwrap_err();
        assert!(error.to_string().contains("colonist.SelectSettlersBySuperType"));
    }

    #[test]
    fn test_producer_table() {
        let via_callback = AnnotationMirror::new(well_known::produce_settlers_via_callback());
        assert_eq!(parse_settler_producer(&via_callback).unwrap(), Some(SettlerProducer::Callback));

        let as_classes = AnnotationMirror::new(well_known::produce_settlers_as_classes());
        assert_eq!(parse_settler_producer(&as_classes).unwrap(), Some(SettlerProducer::Class));
    }

    #[test]
    fn test_acceptor_table() {
        let and_forget = AnnotationMirror::new(well_known::accept_settlers_and_forget());
        assert_eq!(parse_settler_acceptor(&and_forget).unwrap(), Some(SettlerAcceptor::None));

        let via_callback = AnnotationMirror::new(well_known::accept_settlers_via_callback());
        assert_eq!(parse_settler_acceptor(&via_callback).unwrap(), Some(SettlerAcceptor::Callback));
    }
}
