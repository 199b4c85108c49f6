// Copyright 2019 Stichting Organism
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

//! Byte stream and Serde Support
//!
//! Every protocol value has a fixed-width encoding that is written at an
//! offset inside a larger buffer. Uninitialized values still occupy their
//! full width (as zeros) so that stream layouts do not shift.

use crate::errors::SchnorrError;

/// Fixed-width, offset-addressed encoding shared by all protocol values.
pub trait Serializable: Sized {
    /// Exact number of bytes written and read.
    const SERIALIZED_LENGTH: usize;

    /// Write `self` at `offset`, growing `dst` with zeros if needed.
    /// Returns the offset just past the written block.
    fn serialize(&self, dst: &mut Vec<u8>, offset: usize) -> usize;

    /// Read exactly `SERIALIZED_LENGTH` bytes starting at `offset`.
    fn deserialize(src: &[u8], offset: usize) -> Result<Self, SchnorrError>;
}

/// Copy `block` into `dst` at `offset`.
pub(crate) fn write_block(dst: &mut Vec<u8>, offset: usize, block: &[u8]) -> usize {
    let end = offset + block.len();
    if dst.len() < end {
        dst.resize(end, 0u8);
    }
    dst[offset..end].copy_from_slice(block);
    end
}

/// Borrow a `N` byte block at `offset`; no partial reads.
pub(crate) fn read_block<const N: usize>(
    src: &[u8],
    offset: usize,
    name: &'static str,
) -> Result<[u8; N], SchnorrError> {
    let block = offset
        .checked_add(N)
        .and_then(|end| src.get(offset..end))
        .ok_or(SchnorrError::BytesLengthError {
            name,
            length: N,
            offset,
            available: src.len(),
        })?;
    let mut out = [0u8; N];
    out.copy_from_slice(block);
    Ok(out)
}

macro_rules! serde_boilerplate { ($t:ty) => {
    impl ::serde::Serialize for $t {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error> where S: ::serde::Serializer {
            serializer.serialize_bytes(&self.to_bytes()[..])
        }
    }

    impl<'d> ::serde::Deserialize<'d> for $t {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error> where D: ::serde::Deserializer<'d> {
            struct MyVisitor;

            impl<'d> ::serde::de::Visitor<'d> for MyVisitor {
                type Value = $t;

                fn expecting(&self, formatter: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                    formatter.write_str(Self::Value::DESCRIPTION)
                }

                fn visit_bytes<E>(self, bytes: &[u8]) -> Result<$t, E> where E: ::serde::de::Error {
                    if bytes.len() != <$t as crate::ser::Serializable>::SERIALIZED_LENGTH {
                        return Err(E::invalid_length(bytes.len(), &self));
                    }
                    <$t as crate::ser::Serializable>::deserialize(bytes, 0).map_err(E::custom)
                }
            }
            deserializer.deserialize_bytes(MyVisitor)
        }
    }
} } // macro_rules! serde_boilerplate

/// Shared plumbing for the scalar-backed protocol values, which all wrap an
/// `Option<Scalar>` that is `None` until the value is initialized.
macro_rules! scalar_serializable { ($t:ident, $name:expr) => {
    impl $t {
        /// Whether this value holds a scalar.
        pub fn is_initialized(&self) -> bool {
            self.0.is_some()
        }

        /// Big-endian wire encoding, all zeros when uninitialized.
        pub fn to_bytes(&self) -> [u8; crate::tools::SCALAR_LENGTH] {
            match &self.0 {
                Some(s) => crate::tools::scalar_to_bytes(s),
                None => [0u8; crate::tools::SCALAR_LENGTH],
            }
        }

        pub(crate) fn as_scalar(&self) -> Option<&::curve25519_dalek::scalar::Scalar> {
            self.0.as_ref()
        }
    }

    impl crate::ser::Serializable for $t {
        const SERIALIZED_LENGTH: usize = crate::tools::SCALAR_LENGTH;

        fn serialize(&self, dst: &mut Vec<u8>, offset: usize) -> usize {
            crate::ser::write_block(dst, offset, &self.to_bytes())
        }

        fn deserialize(src: &[u8], offset: usize) -> Result<Self, crate::errors::SchnorrError> {
            let block = crate::ser::read_block::<{ crate::tools::SCALAR_LENGTH }>(src, offset, $name)?;
            crate::tools::scalar_from_bytes(&block).map(|s| $t(Some(s)))
        }
    }

    impl PartialEq for $t {
        fn eq(&self, other: &$t) -> bool {
            use ::subtle::ConstantTimeEq;
            self.to_bytes()[..].ct_eq(&other.to_bytes()[..]).into()
        }
    }

    impl Eq for $t {}
} } // macro_rules! scalar_serializable

/// `0x`-prefixed hex of the wire encoding.
macro_rules! hex_display { ($t:ty) => {
    impl ::core::fmt::Display for $t {
        fn fmt(&self, f: &mut ::core::fmt::Formatter) -> ::core::fmt::Result {
            write!(f, "0x{}", ::hex::encode(self.to_bytes()))
        }
    }
} } // macro_rules! hex_display
