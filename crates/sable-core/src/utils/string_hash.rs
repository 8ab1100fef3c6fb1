// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Case-insensitive 32-bit string hashes used to name shader resources and parameters.

use std::fmt;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// A 32-bit FNV-1a hash of an ASCII-lowercased string.
///
/// Shader resource and parameter names are compared through their hashes, so lookups
/// on the hot path never touch string data. The hash is `const`, which lets well-known
/// names be declared as constants.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct StringHash(u32);

impl StringHash {
    /// The hash of the empty string.
    pub const EMPTY: Self = Self(0);

    /// Hashes a string. The empty string maps to [`StringHash::EMPTY`].
    pub const fn new(value: &str) -> Self {
        let bytes = value.as_bytes();
        if bytes.is_empty() {
            return Self::EMPTY;
        }

        let mut hash = FNV_OFFSET_BASIS;
        let mut i = 0;
        while i < bytes.len() {
            hash ^= bytes[i].to_ascii_lowercase() as u32;
            hash = hash.wrapping_mul(FNV_PRIME);
            i += 1;
        }
        Self(hash)
    }

    /// Wraps an already computed hash value.
    pub const fn from_value(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw hash value.
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Returns `true` if this is the hash of the empty string.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl From<&str> for StringHash {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for StringHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StringHash(#{:08x})", self.0)
    }
}

impl fmt::Display for StringHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08x}", self.0)
    }
}
