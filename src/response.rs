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

//! A signer's response: s_i = k_i - c·x_i mod n

use core::fmt::Debug;
use curve25519_dalek::scalar::Scalar;
use tracing::debug;

use crate::challenge::Challenge;
use crate::commitment::Secret;
use crate::keys::SecretKey;

/// One signer's contribution, or the sum of all of them.
#[derive(Copy, Clone, Default)]
pub struct Response(pub(crate) Option<Scalar>);

impl Debug for Response {
    fn fmt(&self, f: &mut ::core::fmt::Formatter) -> ::core::fmt::Result {
        write!(f, "Response( {} )", self)
    }
}

impl Response {
    const DESCRIPTION: &'static str = "A multisignature response as 32 big-endian bytes.";

    /// Compute k - c·x; uninitialized when `secret` or `challenge` is.
    pub fn new(secret: &Secret, challenge: &Challenge, privkey: &SecretKey) -> Response {
        let mut response = Response::default();
        response.set(secret, challenge, privkey);
        response
    }

    /// Replace this response with k - c·x.
    pub fn set(&mut self, secret: &Secret, challenge: &Challenge, privkey: &SecretKey) {
        self.0 = match (secret.as_scalar(), challenge.as_scalar()) {
            (Some(k), Some(c)) => {
                let s = k - c * privkey.as_scalar();
                if s == Scalar::ZERO {
                    None
                } else {
                    Some(s)
                }
            }
            _ => {
                debug!("response requested from an uninitialized secret or challenge");
                None
            }
        };
    }

    pub(crate) fn from_scalar(s: Scalar) -> Response {
        if s == Scalar::ZERO {
            Response(None)
        } else {
            Response(Some(s))
        }
    }
}

scalar_serializable!(Response, "Response");
serde_boilerplate!(Response);
hex_display!(Response);

#[cfg(test)]
mod test {
    use super::*;
    use crate::commitment::Commitment;
    use crate::keys::Keypair;
    use crate::ser::Serializable;
    use rand::SeedableRng;
    use rand_chacha::ChaChaRng;

    #[test]
    fn response_is_secret_minus_challenge_times_key() {
        let mut csprng = ChaChaRng::from_seed([31u8; 32]);
        let keypair = Keypair::generate(&mut csprng);
        let commitment = Commitment::generate(&mut csprng);
        let challenge = Challenge::new(&commitment.point, &keypair.public, b"hello");

        let response = Response::new(&commitment.secret, &challenge, &keypair.secret);
        let k = commitment.secret.as_scalar().unwrap();
        let c = challenge.as_scalar().unwrap();
        assert_eq!(
            response.as_scalar().unwrap() + c * keypair.secret.as_scalar(),
            *k
        );
    }

    #[test]
    fn uninitialized_inputs_give_uninitialized_response() {
        let mut csprng = ChaChaRng::from_seed([32u8; 32]);
        let keypair = Keypair::generate(&mut csprng);
        let commitment = Commitment::generate(&mut csprng);
        let challenge = Challenge::new(&commitment.point, &keypair.public, b"hello");

        assert!(!Response::new(&Secret::default(), &challenge, &keypair.secret).is_initialized());
        assert!(!Response::new(&commitment.secret, &Challenge::default(), &keypair.secret).is_initialized());

        let mut response = Response::new(&commitment.secret, &challenge, &keypair.secret);
        assert!(response.is_initialized());
        response.set(&Secret::default(), &challenge, &keypair.secret);
        assert!(!response.is_initialized());
    }

    #[test]
    fn response_round_trip() {
        let mut csprng = ChaChaRng::from_seed([33u8; 32]);
        let keypair = Keypair::generate(&mut csprng);
        let commitment = Commitment::generate(&mut csprng);
        let challenge = Challenge::new(&commitment.point, &keypair.public, b"hello");
        let response = Response::new(&commitment.secret, &challenge, &keypair.secret);

        let mut stream = Vec::new();
        response.serialize(&mut stream, 0);
        assert_eq!(Response::deserialize(&stream, 0).unwrap(), response);
        assert!(Response::deserialize(&stream[..31], 0).is_err());
    }
}
