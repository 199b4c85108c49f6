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

//! The Fiat–Shamir challenge of the multisignature.
//!
//! c = H(R ‖ X ‖ m) mod n, where R is the aggregated commitment point,
//! X the aggregated public key and m the message or a slice of it.

use core::fmt::Debug;
use curve25519_dalek::scalar::Scalar;
use tracing::debug;

use crate::commitment::Point;
use crate::errors::SchnorrError;
use crate::keys::PublicKey;
use crate::tools::{hash_to_scalar, message_range, RistrettoBoth, CHALLENGE_DOMAIN};

/// Challenge scalar binding one round to its key, commitment and message.
#[derive(Copy, Clone, Default)]
pub struct Challenge(pub(crate) Option<Scalar>);

impl Debug for Challenge {
    fn fmt(&self, f: &mut ::core::fmt::Formatter) -> ::core::fmt::Result {
        write!(f, "Challenge( {} )", self)
    }
}

impl Challenge {
    const DESCRIPTION: &'static str = "A multisignature challenge as 32 big-endian bytes.";

    /// Derive the challenge over the whole message.
    ///
    /// Uninitialized when `aggregated_commit` is.
    pub fn new(aggregated_commit: &Point, aggregated_pubkey: &PublicKey, message: &[u8]) -> Challenge {
        match aggregated_commit.as_both() {
            Some(commit) => Challenge(derive(commit, aggregated_pubkey, message)),
            None => {
                debug!("challenge requested over an uninitialized commitment");
                Challenge(None)
            }
        }
    }

    /// Derive the challenge over `message[offset..offset + size]`.
    pub fn new_range(
        aggregated_commit: &Point,
        aggregated_pubkey: &PublicKey,
        message: &[u8],
        offset: usize,
        size: usize,
    ) -> Result<Challenge, SchnorrError> {
        let mut challenge = Challenge::default();
        challenge.set(aggregated_commit, aggregated_pubkey, message, offset, size)?;
        Ok(challenge)
    }

    /// Replace this challenge with one derived over
    /// `message[offset..offset + size]`.
    ///
    /// On a range violation the challenge is left uninitialized and the
    /// error is returned.
    pub fn set(
        &mut self,
        aggregated_commit: &Point,
        aggregated_pubkey: &PublicKey,
        message: &[u8],
        offset: usize,
        size: usize,
    ) -> Result<(), SchnorrError> {
        self.0 = None;
        let message = message_range(message, offset, size)?;
        *self = Challenge::new(aggregated_commit, aggregated_pubkey, message);
        Ok(())
    }
}

/// H(CHALLENGE_DOMAIN ‖ R ‖ X ‖ m) mod n
pub(crate) fn derive(commit: &RistrettoBoth, pubkey: &PublicKey, message: &[u8]) -> Option<Scalar> {
    hash_to_scalar(
        CHALLENGE_DOMAIN,
        &[&commit.as_bytes()[..], &pubkey.as_bytes()[..], message],
    )
}

scalar_serializable!(Challenge, "Challenge");
serde_boilerplate!(Challenge);
hex_display!(Challenge);
