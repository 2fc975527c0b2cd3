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

//! Access flags for classes, fields and methods

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags! {
    /// Access and property flags of a class member
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Access: u32 {
        const PUBLIC = 0x0001;
        const PRIVATE = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC = 0x0008;
        const FINAL = 0x0010;
        const INTERFACE = 0x0200;
        const ABSTRACT = 0x0400;
        const ANNOTATION = 0x2000;
        /// Object-like class exposing a static `INSTANCE` field of its own type
        const SINGLETON = 0x10000;
    }
}

impl Access {
    pub fn is_public(self) -> bool {
        self.contains(Access::PUBLIC)
    }

    pub fn is_private(self) -> bool {
        self.contains(Access::PRIVATE)
    }

    pub fn is_static(self) -> bool {
        self.contains(Access::STATIC)
    }

    pub fn is_interface(self) -> bool {
        self.contains(Access::INTERFACE)
    }

    pub fn is_abstract(self) -> bool {
        self.contains(Access::ABSTRACT)
    }

    pub fn is_annotation(self) -> bool {
        self.contains(Access::ANNOTATION)
    }

    pub fn is_singleton(self) -> bool {
        self.contains(Access::SINGLETON)
    }

    /// Strips private/protected and adds public
    pub fn as_public(self) -> Access {
        (self - (Access::PRIVATE | Access::PROTECTED)) | Access::PUBLIC
    }
}

impl Serialize for Access {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.bits())
    }
}

impl<'de> Deserialize<'de> for Access {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u32::deserialize(deserializer).map(Access::from_bits_truncate)
    }
}
