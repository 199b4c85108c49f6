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

//! Commitments used in the first round of the multisignature.
//!
//! Each signer draws a per-round `Secret` k, publishes the hash of its
//! `Point` k·G first, and reveals the `Point` only once every other
//! signer's `PointHash` has been collected.

use core::fmt::Debug;
use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar;
use rand::{CryptoRng, RngCore};
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::errors::SchnorrError;
use crate::ser::{read_block, write_block, Serializable};
use crate::tools::{hash_to_scalar, RistrettoBoth, POINT_HASH_DOMAIN, POINT_LENGTH};

/// The per-round commitment secret k.
#[derive(Clone, Default)]
pub struct Secret(pub(crate) Option<Scalar>);

impl Debug for Secret {
    fn fmt(&self, f: &mut ::core::fmt::Formatter) -> ::core::fmt::Result {
        match self.0 {
            Some(_) => write!(f, "Secret( .. )"),
            None => write!(f, "Secret( uninitialized )"),
        }
    }
}

impl Zeroize for Secret {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl Drop for Secret {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl Secret {
    const DESCRIPTION: &'static str = "A commitment secret as 32 big-endian bytes.";

    /// Draw a uniformly random non-zero scalar.
    pub fn generate<R>(csprng: &mut R) -> Secret
    where
        R: CryptoRng + RngCore,
    {
        loop {
            let k = Scalar::random(csprng);
            if k != Scalar::ZERO {
                return Secret(Some(k));
            }
        }
    }
}

scalar_serializable!(Secret, "Secret");
serde_boilerplate!(Secret);

/// The public commitment point k·G.
#[derive(Copy, Clone, Default, PartialEq, Eq)]
pub struct Point(pub(crate) Option<RistrettoBoth>);

impl Debug for Point {
    fn fmt(&self, f: &mut ::core::fmt::Formatter) -> ::core::fmt::Result {
        match &self.0 {
            Some(p) => write!(f, "Point( {:?} )", p.as_compressed()),
            None => write!(f, "Point( uninitialized )"),
        }
    }
}

impl Point {
    const DESCRIPTION: &'static str = "A commitment point as a 32-byte compressed Ristretto point.";

    /// Derive k·G; uninitialized when `secret` is.
    pub fn from_secret(secret: &Secret) -> Point {
        let mut point = Point::default();
        point.set(secret);
        point
    }

    /// Replace this point with k·G for `secret`.
    pub fn set(&mut self, secret: &Secret) {
        self.0 = secret
            .as_scalar()
            .map(|k| RistrettoBoth::from_point(RistrettoPoint::mul_base(k)));
    }

    /// Whether this value holds a point.
    pub fn is_initialized(&self) -> bool {
        self.0.is_some()
    }

    /// Compressed wire encoding, all zeros when uninitialized.
    pub fn to_bytes(&self) -> [u8; POINT_LENGTH] {
        match &self.0 {
            Some(p) => p.to_bytes(),
            None => [0u8; POINT_LENGTH],
        }
    }

    /// Wrap a group element; the identity is not a valid commitment.
    pub(crate) fn from_point(point: RistrettoPoint) -> Point {
        let both = RistrettoBoth::from_point(point);
        if both.is_identity() {
            Point(None)
        } else {
            Point(Some(both))
        }
    }

    pub(crate) fn as_both(&self) -> Option<&RistrettoBoth> {
        self.0.as_ref()
    }
}

impl Serializable for Point {
    const SERIALIZED_LENGTH: usize = POINT_LENGTH;

    fn serialize(&self, dst: &mut Vec<u8>, offset: usize) -> usize {
        write_block(dst, offset, &self.to_bytes())
    }

    fn deserialize(src: &[u8], offset: usize) -> Result<Point, SchnorrError> {
        let block = read_block::<POINT_LENGTH>(src, offset, "Point")?;
        RistrettoBoth::from_bytes(&block).map(|p| Point(Some(p)))
    }
}

serde_boilerplate!(Point);
hex_display!(Point);

/// Binding hash H(Point) mod n, published before the point itself.
#[derive(Copy, Clone, Default)]
pub struct PointHash(pub(crate) Option<Scalar>);

impl Debug for PointHash {
    fn fmt(&self, f: &mut ::core::fmt::Formatter) -> ::core::fmt::Result {
        write!(f, "PointHash( {} )", self)
    }
}

impl PointHash {
    const DESCRIPTION: &'static str = "A commitment point hash as 32 big-endian bytes.";

    /// Hash `point`; uninitialized when `point` is.
    pub fn from_point(point: &Point) -> PointHash {
        let mut hash = PointHash::default();
        hash.set(point);
        hash
    }

    /// Replace this hash with H(`point`).
    pub fn set(&mut self, point: &Point) {
        self.0 = point
            .as_both()
            .and_then(|p| hash_to_scalar(POINT_HASH_DOMAIN, &[&p.as_bytes()[..]]));
    }

    /// Check a revealed point against this hash, in constant time.
    ///
    /// False when either side is uninitialized.
    pub fn opens(&self, point: &Point) -> bool {
        match (self.0, PointHash::from_point(point).0) {
            (Some(committed), Some(revealed)) => committed.ct_eq(&revealed).into(),
            _ => false,
        }
    }
}

scalar_serializable!(PointHash, "PointHash");
serde_boilerplate!(PointHash);
hex_display!(PointHash);

/// Generate a fresh commitment secret and its point.
///
/// The secret must stay private; only the point (and its hash) is sent.
pub fn generate_commitment<R>(csprng: &mut R) -> (Secret, Point)
where
    R: CryptoRng + RngCore,
{
    let secret = Secret::generate(csprng);
    let point = Point::from_secret(&secret);
    (secret, point)
}

/// Everything one signer produces in the commit round.
#[derive(Clone, Debug)]
pub struct Commitment {
    /// Kept by the signer until the response round.
    pub secret: Secret,
    /// Revealed in the second half of the commit round.
    pub point: Point,
    /// Broadcast first.
    pub hash: PointHash,
}

impl Commitment {
    /// Generate secret, point and point hash in one go.
    pub fn generate<R>(csprng: &mut R) -> Commitment
    where
        R: CryptoRng + RngCore,
    {
        let (secret, point) = generate_commitment(csprng);
        let hash = PointHash::from_point(&point);
        Commitment { secret, point, hash }
    }
}
