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

//! The parameter bundle a processing run is invoked with

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ProcessingException;

/// Inputs, outputs and toggles of one processing run.
///
/// `inputs` and `outputs` correspond 1:1; the auxiliary classpaths widen
/// type resolution and, for the discovery classpath, the settler search
/// scope. When `discover_settlers` is false only the colony-patching phase
/// runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColonistParameters {
    pub inputs: Vec<PathBuf>,
    pub outputs: Vec<PathBuf>,
    pub classpath: Vec<PathBuf>,
    pub boot_classpath: Vec<PathBuf>,
    pub discovery_classpath: Vec<PathBuf>,
    pub generation_output: PathBuf,
    pub discover_settlers: bool,
}

impl Default for ColonistParameters {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            outputs: Vec::new(),
            classpath: Vec::new(),
            boot_classpath: Vec::new(),
            discovery_classpath: Vec::new(),
            generation_output: PathBuf::new(),
            discover_settlers: true,
        }
    }
}

impl ColonistParameters {
    /// Up-front validation; a malformed bundle is a fatal configuration
    /// failure before any work starts
    pub fn validate(&self) -> Result<(), ProcessingException> {
        if self.inputs.len() != self.outputs.len() {
            return Err(ProcessingException::new(format!(
                "Input count {} does not match output count {}",
                self.inputs.len(),
                self.outputs.len()
            )));
        }
        if self.generation_output.as_os_str().is_empty() {
            return Err(ProcessingException::new("Generation output path is required"));
        }
        Ok(())
    }
}
