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

//! Discovery and validation of markers, colonies and settlers
//!
//! - `annotation_index`: one-time annotation-to-types index
//! - `subtype_resolver`: memoized subtype queries against a base type
//! - `strategy_parsers`: closed parse tables for strategy annotations
//! - `marker_parser` / `colony_parser` / `settler_parser`: model parsing
//! - `settler_discoverer`: candidate selection + producibility filtering
//! - `colony_validator`: callback capability cross-checks

pub mod annotation_index;
pub mod colony_parser;
pub mod colony_validator;
pub mod marker_parser;
pub mod settler_discoverer;
pub mod settler_parser;
pub mod strategy_parsers;
pub mod subtype_resolver;

pub use annotation_index::{AnnotationIndex, AnnotationIndexBuilder};
pub use colony_parser::ColonyParser;
pub use colony_validator::ColonyValidator;
pub use marker_parser::ColonyMarkerParser;
pub use settler_discoverer::SettlerDiscoverer;
pub use settler_parser::SettlerParser;
pub use subtype_resolver::SubtypeResolver;
