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

//! The Extra Sauce
//! Hash-to-scalar, wire encodings for scalars and points, and
//! ristretto point tooling.
//!
//! We provide a `RistrettoBoth` type that contains both an uncompressed
//! `RistrettoPoint` along side its matching `CompressedRistretto`,
//! which helps several protocols avoid duplicate ristretto compressions
//! and/or decompressions.

use blake2::{Blake2b512, Digest};
use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::IsIdentity;
use std::fmt::Debug;

use crate::errors::SchnorrError;

/// Width of every scalar-backed value on the wire, in bytes.
pub const SCALAR_LENGTH: usize = 32;

/// Width of every point-backed value on the wire, in bytes.
pub const POINT_LENGTH: usize = 32;

/// Prefix of messages signed for proof-of-possession.
pub const POP_DOMAIN: u8 = 0x01;

/// Prefix of the commitment point hash input.
pub const POINT_HASH_DOMAIN: u8 = 0x02;

/// Prefix of the challenge hash input.
pub const CHALLENGE_DOMAIN: u8 = 0x03;

/// Hash a domain byte followed by `chunks` with Blake2b-512 and reduce mod n.
///
/// Returns `None` for the (negligibly likely) zero scalar so that every
/// derived value stays inside `[1, n-1]`.
pub(crate) fn hash_to_scalar(domain: u8, chunks: &[&[u8]]) -> Option<Scalar> {
    let mut h = Blake2b512::new();
    h.update([domain]);
    for chunk in chunks {
        h.update(*chunk);
    }
    let s = Scalar::from_hash(h);
    if s == Scalar::ZERO {
        None
    } else {
        Some(s)
    }
}

/// Big-endian encoding of a scalar.
pub(crate) fn scalar_to_bytes(s: &Scalar) -> [u8; SCALAR_LENGTH] {
    let mut bytes = s.to_bytes();
    bytes.reverse();
    bytes
}

/// Decode a big-endian scalar, rejecting zero and anything not below n.
pub(crate) fn scalar_from_bytes(bytes: &[u8; SCALAR_LENGTH]) -> Result<Scalar, SchnorrError> {
    let mut le = *bytes;
    le.reverse();
    let s: Option<Scalar> = Scalar::from_canonical_bytes(le).into();
    match s {
        Some(s) if s != Scalar::ZERO => Ok(s),
        _ => Err(SchnorrError::ScalarFormatError),
    }
}

/// Borrow `message[offset..offset + size]`, failing when the range
/// leaves the buffer.
pub(crate) fn message_range(message: &[u8], offset: usize, size: usize) -> Result<&[u8], SchnorrError> {
    offset
        .checked_add(size)
        .and_then(|end| message.get(offset..end))
        .ok_or(SchnorrError::RangeError {
            offset,
            size,
            length: message.len(),
        })
}

/// A `RistrettoPoint` together with its compressed form.
#[derive(Copy, Clone)]
pub struct RistrettoBoth {
    compressed: CompressedRistretto,
    point: RistrettoPoint,
}

impl Debug for RistrettoBoth {
    fn fmt(&self, f: &mut ::core::fmt::Formatter) -> ::core::fmt::Result {
        write!(f, "RistrettoBoth( {:?} )", &self.compressed)
    }
}

impl RistrettoBoth {
    /// Access the compressed Ristretto form
    pub fn as_compressed(&self) -> &CompressedRistretto {
        &self.compressed
    }

    /// Access the point form
    pub fn as_point(&self) -> &RistrettoPoint {
        &self.point
    }

    /// Extract the point form
    pub fn into_point(self) -> RistrettoPoint {
        self.point
    }

    /// Compress a point, keeping both forms.
    pub fn from_point(point: RistrettoPoint) -> RistrettoBoth {
        RistrettoBoth {
            compressed: point.compress(),
            point,
        }
    }

    /// Decompress, rejecting invalid encodings and the identity.
    pub fn from_compressed(compressed: CompressedRistretto) -> Result<RistrettoBoth, SchnorrError> {
        let point = compressed
            .decompress()
            .ok_or(SchnorrError::PointDecompressionError)?;
        if point.is_identity() {
            return Err(SchnorrError::IdentityPoint);
        }
        Ok(RistrettoBoth { compressed, point })
    }

    /// Decode from the fixed-width wire block.
    pub fn from_bytes(bytes: &[u8; POINT_LENGTH]) -> Result<RistrettoBoth, SchnorrError> {
        RistrettoBoth::from_compressed(CompressedRistretto(*bytes))
    }

    /// View the compressed form as bytes.
    pub fn as_bytes(&self) -> &[u8; POINT_LENGTH] {
        self.compressed.as_bytes()
    }

    /// Copy out the compressed form.
    pub fn to_bytes(&self) -> [u8; POINT_LENGTH] {
        self.compressed.to_bytes()
    }

    pub fn is_identity(&self) -> bool {
        self.point.is_identity()
    }
}

impl PartialEq for RistrettoBoth {
    fn eq(&self, other: &RistrettoBoth) -> bool {
        self.compressed == other.compressed
    }
}

impl Eq for RistrettoBoth {}
