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

//! A Rust implementation of Schnorr signing
//!
//! A signature is the pair (c, s) with c = H(R ‖ X ‖ m) and s = k - c·x.
//! Verification recovers R = s·G + c·X and recomputes c. Aggregated
//! multisignatures share this exact format.

use curve25519_dalek::ristretto::RistrettoPoint;
use merlin::Transcript;
use rand::{CryptoRng, RngCore};
use std::fmt::Debug;
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::challenge::{self, Challenge};
use crate::commitment::{Point, Secret};
use crate::errors::SchnorrError;
use crate::keys::{Keypair, PublicKey};
use crate::response::Response;
use crate::ser::{read_block, write_block, Serializable};
use crate::tools::{message_range, RistrettoBoth, SCALAR_LENGTH};

/// The length of a Schnorr `Signature`, in bytes.
pub const SIGNATURE_LENGTH: usize = 2 * SCALAR_LENGTH;

/// An Schnorr signature.
///
/// # Note
///
/// These signatures are "detached": they do **not** include a copy
/// of the message which has been signed.
#[derive(Copy, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    /// `c`, the challenge the signature was produced under.
    pub(crate) challenge: Challenge,

    /// `s`, formed by s = k - cx
    ///
    /// - the `k` is the nonce (or the sum of all signers' nonces)
    /// - the 'x' is the secret key signing (or the sum of all signers' keys)
    pub(crate) response: Response,
}

impl Debug for Signature {
    fn fmt(&self, f: &mut ::core::fmt::Formatter) -> ::core::fmt::Result {
        write!(f, "Signature( c: {}, s: {} )", &self.challenge, &self.response)
    }
}

impl Signature {
    const DESCRIPTION: &'static str = "A Schnorr signature as challenge then response, 64 bytes.";

    /// Pair a challenge with a response.
    pub fn new(challenge: Challenge, response: Response) -> Signature {
        Signature { challenge, response }
    }

    pub fn challenge(&self) -> &Challenge {
        &self.challenge
    }

    pub fn response(&self) -> &Response {
        &self.response
    }

    /// Both halves are present.
    pub fn is_initialized(&self) -> bool {
        self.challenge.is_initialized() && self.response.is_initialized()
    }

    /// Challenge bytes followed by response bytes.
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        let mut bytes = [0u8; SIGNATURE_LENGTH];
        bytes[..SCALAR_LENGTH].copy_from_slice(&self.challenge.to_bytes());
        bytes[SCALAR_LENGTH..].copy_from_slice(&self.response.to_bytes());
        bytes
    }

    /// Sign `message` with `keypair`.
    ///
    /// The nonce is hedged: a transcript of the message is rekeyed with
    /// the secret key and then finalized with `csprng`, so neither a weak
    /// generator nor a repeated message alone repeats the nonce.
    pub fn sign<R>(message: &[u8], keypair: &Keypair, csprng: &mut R) -> Signature
    where
        R: CryptoRng + RngCore,
    {
        let mut transcript = Transcript::new(b"schnorr-multisig nonce");
        transcript.append_message(b"public_key", keypair.public.as_bytes());
        transcript.append_message(b"message", message);

        let mut rng = transcript
            .build_rng()
            .rekey_with_witness_bytes(b"secret_key", &keypair.secret.to_bytes())
            .finalize(csprng);

        loop {
            // R = k·G
            let secret = Secret::generate(&mut rng);
            let point = Point::from_secret(&secret);
            // c = H(R ‖ X ‖ m), s = k - cx
            let challenge = Challenge::new(&point, &keypair.public, message);
            let response = Response::new(&secret, &challenge, &keypair.secret);

            let signature = Signature::new(challenge, response);
            if signature.is_initialized() {
                return signature;
            }
        }
    }

    /// Verify this signature over `message`.
    ///
    /// Returns false on a mismatch or when either half is uninitialized.
    pub fn verify(&self, message: &[u8], public_key: &PublicKey) -> bool {
        let (c, s) = match (self.challenge.as_scalar(), self.response.as_scalar()) {
            (Some(c), Some(s)) => (c, s),
            _ => {
                debug!("verification of an uninitialized signature");
                return false;
            }
        };

        // R = s·G + c·X
        let recovered = RistrettoPoint::vartime_double_scalar_mul_basepoint(c, public_key.as_point(), s);
        let recovered = RistrettoBoth::from_point(recovered);
        if recovered.is_identity() {
            debug!("signature recovers the identity commitment");
            return false;
        }

        match challenge::derive(&recovered, public_key, message) {
            Some(expected) => c.ct_eq(&expected).into(),
            None => false,
        }
    }

    /// Verify this signature over `message[offset..offset + size]`.
    ///
    /// A range that leaves the buffer is an error, not a mismatch.
    pub fn verify_range(
        &self,
        message: &[u8],
        offset: usize,
        size: usize,
        public_key: &PublicKey,
    ) -> Result<bool, SchnorrError> {
        let message = message_range(message, offset, size)?;
        Ok(self.verify(message, public_key))
    }
}

impl Serializable for Signature {
    const SERIALIZED_LENGTH: usize = SIGNATURE_LENGTH;

    fn serialize(&self, dst: &mut Vec<u8>, offset: usize) -> usize {
        write_block(dst, offset, &self.to_bytes())
    }

    fn deserialize(src: &[u8], offset: usize) -> Result<Signature, SchnorrError> {
        // length first, so a short stream reports the signature width
        read_block::<SIGNATURE_LENGTH>(src, offset, "Signature")?;
        let challenge = Challenge::deserialize(src, offset)?;
        let response = Response::deserialize(src, offset + SCALAR_LENGTH)?;
        Ok(Signature { challenge, response })
    }
}

serde_boilerplate!(Signature);
