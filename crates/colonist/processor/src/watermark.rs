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

//! Watermarking of generated and patched classes
//!
//! Every class this engine touches carries an empty `Colonist` attribute so
//! clean/rebuild tooling can recognize engine output without re-running
//! discovery.

use std::path::Path;

use colonist_core::classfile::{self, CLASS_EXTENSION};
use colonist_core::error::CoreResult;
use colonist_core::mirrors::{ClassAttribute, ClassMirror};

/// Name of the watermark class attribute
pub const WATERMARK_ATTRIBUTE: &str = "Colonist";

/// Stamps the watermark; already-marked classes are left untouched
pub fn mark(mirror: &mut ClassMirror) {
    if !is_marked(mirror) {
        mirror.attributes.push(ClassAttribute {
            name: WATERMARK_ATTRIBUTE.to_string(),
            data: Vec::new(),
        });
    }
}

pub fn is_marked(mirror: &ClassMirror) -> bool {
    mirror.attribute(WATERMARK_ATTRIBUTE).is_some()
}

/// Detects engine output on disk
pub struct WatermarkChecker;

impl WatermarkChecker {
    /// Whether the file is a class file produced or patched by this engine;
    /// non-class files answer false without being read
    pub fn is_colonist_class(path: &Path) -> CoreResult<bool> {
        let is_class_file = path
            .extension()
            .and_then(|extension| extension.to_str())
            .is_some_and(|extension| extension.eq_ignore_ascii_case(CLASS_EXTENSION));
        if !is_class_file {
            return Ok(false);
        }
        let bytes = std::fs::read(path)?;
        let mirror = classfile::read_class(&bytes)?;
        Ok(is_marked(&mirror))
    }
}
