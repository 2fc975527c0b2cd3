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

//! The two-phase processing pipeline
//!
//! Phase one discovers colonies and copies every input container, patching
//! colony classes on the way through. Phase two discovers settlers per
//! unique (producer, selector) pair, validates colonies against them and
//! generates the delegate classes. After each phase the collected errors are
//! checked; a non-empty collector aborts the run with one aggregated
//! failure, so a completed run always means every requested output exists.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parking_lot::Mutex;
use rayon::prelude::*;
use tracing::{debug, info};

use colonist_core::classfile;
use colonist_core::io::{self, DirectoryFileSink, EntryKind, FileSink, FileSource};
use colonist_core::registry::TypeRegistry;
use colonist_core::types::{TypeRef, well_known};

use crate::analysis::{AnnotationIndex, ColonyMarkerParser, ColonyParser, ColonyValidator, SettlerDiscoverer};
use crate::error::{ErrorReporter, ProcessingError, ProcessingException};
use crate::generation::{ClassProducer, ColonyPatcher, DelegateGenerator};
use crate::model::{Colony, Settler, SettlerProducer, SettlerSelector};
use crate::parameters::ColonistParameters;

/// Entry point of the engine
pub struct ColonistProcessor;

impl ColonistProcessor {
    /// Runs one complete processing pass over the parameter bundle.
    ///
    /// Either every requested output is written, or the first failed
    /// checkpoint raises a single aggregated failure and no further phase
    /// runs.
    pub fn process(parameters: &ColonistParameters) -> Result<(), ProcessingException> {
        parameters.validate()?;

        let mut resolution_paths = parameters.inputs.clone();
        resolution_paths.extend(parameters.classpath.iter().cloned());
        resolution_paths.extend(parameters.boot_classpath.iter().cloned());
        resolution_paths.extend(parameters.discovery_classpath.iter().cloned());
        let registry = TypeRegistry::load(&resolution_paths)?;
        info!("Loaded {} classes from {} container(s)", registry.len(), resolution_paths.len());

        let mut discovery_scope = parameters.inputs.clone();
        discovery_scope.extend(parameters.discovery_classpath.iter().cloned());
        let annotation_index = AnnotationIndex::build(&registry, &discovery_scope);

        let run = ProcessingRun {
            parameters,
            registry,
            annotation_index,
            discovery_scope,
            error_reporter: ErrorReporter::new(),
        };
        run.process_classes()
    }
}

struct ProcessingRun<'a> {
    parameters: &'a ColonistParameters,
    registry: TypeRegistry,
    annotation_index: AnnotationIndex,
    discovery_scope: Vec<std::path::PathBuf>,
    error_reporter: ErrorReporter,
}

impl ProcessingRun<'_> {
    fn process_classes(&self) -> Result<(), ProcessingException> {
        let colonies = self.find_colonies();
        self.check_errors()?;
        info!("Discovered {} colony(ies)", colonies.len());

        let processed_colonies = self.copy_and_patch_classes(&colonies)?;

        if self.parameters.discover_settlers {
            let colonies_with_settlers = self.find_settlers_for_colonies(&colonies, &processed_colonies)?;
            self.check_errors()?;
            self.generate_colony_delegates(&colonies_with_settlers)?;
        }
        Ok(())
    }

    fn find_colonies(&self) -> Vec<Colony> {
        let marker_parser = ColonyMarkerParser::new(&self.registry);
        let mut markers = Vec::new();
        for annotation_type in self.annotation_index.types_annotated_with(&well_known::colony()) {
            match marker_parser.parse_colony_marker(annotation_type) {
                Ok(marker) => markers.push(marker),
                Err(error) => self.error_reporter.report(error),
            }
        }

        let colony_parser = ColonyParser::new(&self.registry);
        let mut colonies = Vec::new();
        for marker in &markers {
            for colony_type in self.annotation_index.types_annotated_with(&marker.annotation_type) {
                match colony_parser.parse_colony(colony_type, marker) {
                    Ok(colony) => colonies.push(colony),
                    Err(error) => self.error_reporter.report(error),
                }
            }
        }
        colonies
    }

    /// Copies every input container to its output, patching colony classes
    /// in the same pass. I/O failures here are fatal: the copy phase is
    /// mandatory and a partial output set must never survive.
    fn copy_and_patch_classes(&self, colonies: &[Colony]) -> Result<Vec<TypeRef>, ProcessingException> {
        let mut colonies_by_type: HashMap<TypeRef, Vec<Colony>> = HashMap::new();
        for colony in colonies {
            colonies_by_type.entry(colony.colony_type.clone()).or_default().push(colony.clone());
        }

        let processed = Mutex::new(Vec::new());
        let inputs = &self.parameters.inputs;
        let outputs = &self.parameters.outputs;
        inputs.par_iter().zip(outputs.par_iter()).try_for_each(|(input, output)| -> Result<(), ProcessingException> {
            debug!("Copying {} to {}", input.display(), output.display());
            let source = io::open_source(input)?;
            let sink = io::open_sink(input, output)?;

            for (path, kind) in source.entries()? {
                match kind {
                    EntryKind::Class => {
                        let bytes = source.read_entry(&path)?;
                        let class_type = classfile::type_for_entry(&path);
                        let colony_group = class_type.as_ref().and_then(|type_ref| colonies_by_type.get(type_ref));
                        match (class_type, colony_group) {
                            (Some(class_type), Some(group)) => {
                                let mirror = classfile::read_class(&bytes)?;
                                let patched = ColonyPatcher::new(group).patch(&mirror)?;
                                sink.write_entry(&path, &classfile::write_class(&patched)?)?;
                                processed.lock().push(class_type);
                            }
                            _ => sink.write_entry(&path, &bytes)?,
                        }
                    }
                    EntryKind::File => sink.write_entry(&path, &source.read_entry(&path)?)?,
                    EntryKind::Directory => sink.create_directory(&path)?,
                }
            }

            sink.flush()?;
            Ok(())
        })?;

        self.check_errors()?;
        Ok(processed.into_inner())
    }

    fn find_settlers_for_colonies(
        &self,
        colonies: &[Colony],
        processed_colonies: &[TypeRef],
    ) -> Result<Vec<(Colony, Arc<Vec<Settler>>)>, ProcessingException> {
        let processed_types: HashSet<&TypeRef> = processed_colonies.iter().collect();
        let cache: DashMap<(SettlerProducer, SettlerSelector), Arc<Vec<Settler>>> = DashMap::new();
        let discoverer = SettlerDiscoverer::new(&self.registry, &self.annotation_index, &self.discovery_scope, &self.error_reporter);
        let validator = ColonyValidator::new(&self.error_reporter);

        colonies
            .par_iter()
            .map(|colony| -> Result<(Colony, Arc<Vec<Settler>>), ProcessingException> {
                let key = (colony.marker.producer, colony.marker.selector.clone());
                let settlers = match cache.entry(key) {
                    Entry::Occupied(entry) => Arc::clone(entry.get()),
                    Entry::Vacant(entry) => {
                        let discovered = Arc::new(discoverer.discover_settlers(&colony.marker.selector, &colony.marker.producer)?);
                        entry.insert(Arc::clone(&discovered));
                        discovered
                    }
                };

                if !self.is_colony_processed(colony, &processed_types) {
                    self.error_reporter.report(ProcessingError::Consistency(format!(
                        "Colony {} annotated by {} is not processed by colonist, is colonist plugin applied to the module?",
                        colony.colony_type, colony.marker.annotation_type
                    )));
                }

                validator.validate_colony(colony, settlers.as_slice());
                Ok((colony.clone(), settlers))
            })
            .collect()
    }

    /// A colony missed by the copy pass was either patched in an earlier run
    /// (it already implements the founder interface) or the patch step is
    /// not wired into the build for its module.
    fn is_colony_processed(&self, colony: &Colony, processed_types: &HashSet<&TypeRef>) -> bool {
        if processed_types.contains(&colony.colony_type) {
            return true;
        }
        self.registry
            .get_class_mirror(&colony.colony_type)
            .map(|mirror| mirror.implements(&well_known::colony_founder()))
            .unwrap_or(false)
    }

    fn generate_colony_delegates(&self, colonies_with_settlers: &[(Colony, Arc<Vec<Settler>>)]) -> Result<(), ProcessingException> {
        let generation_sink = DirectoryFileSink::new(&self.parameters.generation_output);
        let class_producer = ClassProducer::new(&generation_sink, &self.error_reporter);

        colonies_with_settlers.par_iter().for_each(|(colony, settlers)| {
            match DelegateGenerator::generate(colony, settlers.as_slice()) {
                Ok(mirror) => class_producer.produce_class(&mirror),
                Err(error) => self.error_reporter.report(error),
            }
        });

        generation_sink.flush()?;
        self.check_errors()?;
        info!("Generated {} delegate class(es)", colonies_with_settlers.len());
        Ok(())
    }

    fn check_errors(&self) -> Result<(), ProcessingException> {
        if self.error_reporter.has_errors() {
            Err(ProcessingException::from_reporter(&self.error_reporter))
        } else {
            Ok(())
        }
    }
}
