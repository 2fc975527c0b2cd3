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

//! Binary encoding of class files
//!
//! A class file is a magic/version header followed by the bincode-encoded
//! [`ClassMirror`]. The header is checked before any payload decoding so a
//! foreign file fails fast with a precise error.

use crate::error::{CoreError, CoreResult};
use crate::mirrors::ClassMirror;
use crate::types::TypeRef;

/// File magic of the class-container format
pub const CLASS_MAGIC: [u8; 4] = *b"CLNY";

/// Current version of the class-container format
pub const CLASS_FILE_VERSION: u16 = 1;

/// Entry extension of compiled classes
pub const CLASS_EXTENSION: &str = "class";

const HEADER_LEN: usize = 6;

/// Serializes a class mirror into class-file bytes
pub fn write_class(mirror: &ClassMirror) -> CoreResult<Vec<u8>> {
    let payload = bincode::serde::encode_to_vec(mirror, bincode::config::standard())?;
    let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
    bytes.extend_from_slice(&CLASS_MAGIC);
    bytes.extend_from_slice(&CLASS_FILE_VERSION.to_le_bytes());
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

/// Decodes class-file bytes into a class mirror
pub fn read_class(bytes: &[u8]) -> CoreResult<ClassMirror> {
    if bytes.len() < HEADER_LEN || bytes[..4] != CLASS_MAGIC {
        return Err(CoreError::MalformedClass {
            details: "missing class-file magic".to_string(),
        });
    }
    let version = u16::from_le_bytes([bytes[4], bytes[5]]);
    if version != CLASS_FILE_VERSION {
        return Err(CoreError::UnsupportedVersion {
            version,
            expected: CLASS_FILE_VERSION,
        });
    }
    let (mirror, _) = bincode::serde::decode_from_slice(&bytes[HEADER_LEN..], bincode::config::standard())?;
    Ok(mirror)
}

/// The container entry path of a type, e.g. `demo/plugins/A.class`
pub fn entry_path(type_ref: &TypeRef) -> String {
    format!("{}.{}", type_ref.path_name(), CLASS_EXTENSION)
}

/// The type a container entry path denotes, if it is a class entry
pub fn type_for_entry(path: &str) -> Option<TypeRef> {
    let stem = path.strip_suffix(".class")?;
    Some(TypeRef::new(stem.replace('/', ".")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::Access;

    #[test]
    fn test_round_trip() {
        let mirror = ClassMirror::new(TypeRef::new("demo.A")).with_access(Access::PUBLIC);
        let bytes = write_class(&mirror).unwrap();
        let decoded = read_class(&bytes).unwrap();
        assert_eq!(decoded, mirror);
    }

    #[test]
    fn test_bad_magic_is_rejected() {
        let result = read_class(b"NOPE\x01\x00rest");
        assert!(matches!(result, Err(CoreError::MalformedClass { .. })));
    }

    #[test]
    fn test_unsupported_version_is_rejected() {
        let mirror = ClassMirror::new(TypeRef::new("demo.A"));
        let mut bytes = write_class(&mirror).unwrap();
        bytes[4] = 0xFF;
        assert!(matches!(read_class(&bytes), Err(CoreError::UnsupportedVersion { .. })));
    }

    #[test]
    fn test_entry_path_round_trip() {
        let type_ref = TypeRef::new("demo.plugins.A");
        let path = entry_path(&type_ref);
        assert_eq!(path, "demo/plugins/A.class");
        assert_eq!(type_for_entry(&path), Some(type_ref));
        assert_eq!(type_for_entry("META/resource.txt"), None);
    }
}
