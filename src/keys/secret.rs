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

//! Schnorr Secret Key generation

use core::fmt::Debug;
use curve25519_dalek::scalar::Scalar;
use rand::{CryptoRng, RngCore};
use subtle::{Choice, ConstantTimeEq};
use zeroize::Zeroize;

use crate::errors::SchnorrError;
use crate::ser::{read_block, write_block, Serializable};
use crate::tools::{scalar_from_bytes, scalar_to_bytes, SCALAR_LENGTH};

/// The length of a Schnorr `SecretKey`, in bytes.
pub const SECRET_KEY_LENGTH: usize = SCALAR_LENGTH;

/// An Schnorr secret key: a scalar in `[1, n-1]`.
#[derive(Clone)]
pub struct SecretKey(pub(crate) Scalar);

impl Debug for SecretKey {
    fn fmt(&self, f: &mut ::core::fmt::Formatter) -> ::core::fmt::Result {
        write!(f, "SecretKey( .. )")
    }
}

impl Eq for SecretKey {}
impl PartialEq for SecretKey {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).unwrap_u8() == 1u8
    }
}
impl ConstantTimeEq for SecretKey {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }
}

impl Zeroize for SecretKey {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

/// Overwrite secret key material with null bytes when it goes out of scope.
impl Drop for SecretKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl SecretKey {
    const DESCRIPTION: &'static str = "A Schnorr secret key as 32 big-endian bytes.";

    /// Convert this secret key to a big-endian byte array.
    #[inline]
    pub fn to_bytes(&self) -> [u8; SECRET_KEY_LENGTH] {
        scalar_to_bytes(&self.0)
    }

    /// Construct a `SecretKey` from exactly `SECRET_KEY_LENGTH` big-endian bytes.
    ///
    /// # Returns
    ///
    /// A `Result` whose okay value is an Schnorr `SecretKey` or whose error value
    /// is an `SchnorrError` describing the error that occurred.
    #[inline]
    pub fn from_bytes(bytes: &[u8]) -> Result<SecretKey, SchnorrError> {
        if bytes.len() != SECRET_KEY_LENGTH {
            return Err(SchnorrError::BytesLengthError {
                name: "SecretKey",
                length: SECRET_KEY_LENGTH,
                offset: 0,
                available: bytes.len(),
            });
        }
        SecretKey::deserialize(bytes, 0)
    }

    /// Generate a `SecretKey` from a `csprng`.
    ///
    /// # Input
    ///
    /// A CSPRNG with a `fill_bytes()` method, e.g. `rand_chacha::ChaChaRng`
    pub fn generate<T>(csprng: &mut T) -> SecretKey
    where
        T: CryptoRng + RngCore,
    {
        loop {
            let s = Scalar::random(csprng);
            if s != Scalar::ZERO {
                return SecretKey(s);
            }
        }
    }

    /// View this key as a scalar.
    #[inline]
    pub fn as_scalar(&self) -> &Scalar {
        &self.0
    }

    /// Wrap a scalar, refusing zero.
    pub fn from_scalar(s: Scalar) -> Result<SecretKey, SchnorrError> {
        if s == Scalar::ZERO {
            return Err(SchnorrError::ScalarFormatError);
        }
        Ok(SecretKey(s))
    }
}

impl Serializable for SecretKey {
    const SERIALIZED_LENGTH: usize = SECRET_KEY_LENGTH;

    fn serialize(&self, dst: &mut Vec<u8>, offset: usize) -> usize {
        write_block(dst, offset, &self.to_bytes())
    }

    fn deserialize(src: &[u8], offset: usize) -> Result<SecretKey, SchnorrError> {
        let block = read_block::<SECRET_KEY_LENGTH>(src, offset, "SecretKey")?;
        scalar_from_bytes(&block).map(SecretKey)
    }
}

serde_boilerplate!(SecretKey);
