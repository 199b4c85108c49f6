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

//! Schnorr Public Key generation,

use crate::errors::SchnorrError;
use crate::keys::SecretKey;
use crate::ser::{read_block, write_block, Serializable};
use crate::tools::{RistrettoBoth, POINT_LENGTH};
use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use std::fmt::Debug;

/// The length of a Ristretto Schnorr `PublicKey`, in bytes.
pub const PUBLIC_KEY_LENGTH: usize = POINT_LENGTH;

/// An Schnorr public key. Never the identity point.
#[derive(Copy, Clone)]
pub struct PublicKey(pub(crate) RistrettoBoth);

impl Debug for PublicKey {
    fn fmt(&self, f: &mut ::core::fmt::Formatter) -> ::core::fmt::Result {
        write!(f, "PublicKey( CompressedRistretto( {:?} ))", self.0.as_compressed())
    }
}

impl PublicKey {
    const DESCRIPTION: &'static str = "A Schnorr public key as a 32-byte compressed Ristretto point.";

    /// Access the compressed Ristretto form
    pub fn as_compressed(&self) -> &CompressedRistretto {
        self.0.as_compressed()
    }

    /// Access the point form
    pub fn as_point(&self) -> &RistrettoPoint {
        self.0.as_point()
    }

    /// Extract the point form
    pub fn into_point(self) -> RistrettoPoint {
        self.0.into_point()
    }

    /// Decompress into the `PublicKey` format that also retains the
    /// compressed form.
    pub fn from_compressed(compressed: CompressedRistretto) -> Result<PublicKey, SchnorrError> {
        RistrettoBoth::from_compressed(compressed).map(PublicKey)
    }

    /// Convert this public key to a byte array.
    #[inline]
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.0.to_bytes()
    }

    /// View this public key as a byte array.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        self.0.as_bytes()
    }

    /// Construct a `PublicKey` from exactly `PUBLIC_KEY_LENGTH` bytes.
    ///
    /// Fails when the bytes are not a canonical Ristretto encoding or
    /// encode the identity.
    #[inline]
    pub fn from_bytes(bytes: &[u8]) -> Result<PublicKey, SchnorrError> {
        if bytes.len() != PUBLIC_KEY_LENGTH {
            return Err(SchnorrError::BytesLengthError {
                name: "PublicKey",
                length: PUBLIC_KEY_LENGTH,
                offset: 0,
                available: bytes.len(),
            });
        }
        PublicKey::deserialize(bytes, 0)
    }

    /// Derive this public key from its corresponding `SecretKey`.
    pub fn from_secret(secret_key: &SecretKey) -> PublicKey {
        PublicKey(RistrettoBoth::from_point(RistrettoPoint::mul_base(
            secret_key.as_scalar(),
        )))
    }
}

impl From<&SecretKey> for PublicKey {
    fn from(source: &SecretKey) -> PublicKey {
        PublicKey::from_secret(source)
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &PublicKey) -> bool {
        self.0 == other.0
    }
}

impl Eq for PublicKey {}

impl Serializable for PublicKey {
    const SERIALIZED_LENGTH: usize = PUBLIC_KEY_LENGTH;

    fn serialize(&self, dst: &mut Vec<u8>, offset: usize) -> usize {
        write_block(dst, offset, self.as_bytes())
    }

    fn deserialize(src: &[u8], offset: usize) -> Result<PublicKey, SchnorrError> {
        let block = read_block::<PUBLIC_KEY_LENGTH>(src, offset, "PublicKey")?;
        RistrettoBoth::from_bytes(&block).map(PublicKey)
    }
}

serde_boilerplate!(PublicKey);
hex_display!(PublicKey);
