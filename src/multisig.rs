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

//! EC-Schnorr multisignatures and key aggregation.
//!
//! Three rounds, driven by an outside orchestrator:
//!
//! 1. every signer publishes `PointHash` of its commitment `Point`, then
//!    reveals the `Point` once all hashes are in;
//! 2. the aggregator sums the points and the public keys and derives the
//!    `Challenge` over the message;
//! 3. every signer answers with a `Response`, which is checked with
//!    [`verify_response`] before being summed into the signature.
//!
//! Keys must be admitted only after a proof-of-possession
//! ([`sign_key`] / [`verify_key`]), otherwise a participant could pick
//! its key as a function of the others' and forge for the group.
//!
//! The arithmetic underneath is reentrant, so none of these functions
//! hold a lock and all of them may be called concurrently.

use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::IsIdentity;
use subtle::ConstantTimeEq;
use tracing::{debug, trace, warn};

use crate::challenge::Challenge;
use crate::commitment::Point;
use crate::errors::{self, MuSigError, SchnorrError};
use crate::keys::{Keypair, PublicKey};
use crate::response::Response;
use crate::signature::Signature;
use crate::tools::{RistrettoBoth, POP_DOMAIN};

/// Sum the public keys of every signer.
pub fn aggregate_pubkeys(pubkeys: &[PublicKey]) -> Result<PublicKey, SchnorrError> {
    if pubkeys.is_empty() {
        return Err(errors::from_musig(MuSigError::BadArguments));
    }
    trace!(signers = pubkeys.len(), "aggregating public keys");

    let sum: RistrettoPoint = pubkeys.iter().map(|pk| pk.as_point()).sum();
    if sum.is_identity() {
        warn!("public keys cancel out");
        return Err(errors::from_musig(MuSigError::PointOperationFailed));
    }
    Ok(PublicKey(RistrettoBoth::from_point(sum)))
}

/// Sum the revealed commitment points of every signer.
pub fn aggregate_commits(points: &[Point]) -> Result<Point, SchnorrError> {
    if points.is_empty() {
        return Err(errors::from_musig(MuSigError::BadArguments));
    }
    trace!(signers = points.len(), "aggregating commitment points");

    let mut sum = RistrettoPoint::default();
    for (index, point) in points.iter().enumerate() {
        match point.as_both() {
            Some(p) => sum += p.as_point(),
            None => {
                warn!(index, "uninitialized commitment point");
                return Err(errors::from_musig(MuSigError::UninitializedShare { index }));
            }
        }
    }

    let aggregated = Point::from_point(sum);
    if !aggregated.is_initialized() {
        warn!("commitment points cancel out");
        return Err(errors::from_musig(MuSigError::PointOperationFailed));
    }
    Ok(aggregated)
}

/// Sum the (already verified) responses of every signer mod n.
pub fn aggregate_responses(responses: &[Response]) -> Result<Response, SchnorrError> {
    if responses.is_empty() {
        return Err(errors::from_musig(MuSigError::BadArguments));
    }
    trace!(signers = responses.len(), "aggregating responses");

    let mut sum = Scalar::ZERO;
    for (index, response) in responses.iter().enumerate() {
        match response.as_scalar() {
            Some(s) => sum += s,
            None => {
                warn!(index, "uninitialized response");
                return Err(errors::from_musig(MuSigError::UninitializedShare { index }));
            }
        }
    }

    let aggregated = Response::from_scalar(sum);
    if !aggregated.is_initialized() {
        warn!("responses sum to zero");
        return Err(errors::from_musig(MuSigError::PointOperationFailed));
    }
    Ok(aggregated)
}

/// Package the challenge and the aggregated response as the final signature.
///
/// The result is an ordinary Schnorr signature under the aggregated key.
pub fn aggregate_sign(challenge: &Challenge, aggregated_response: &Response) -> Result<Signature, SchnorrError> {
    if !challenge.is_initialized() {
        return Err(SchnorrError::Uninitialized { name: "Challenge" });
    }
    if !aggregated_response.is_initialized() {
        return Err(SchnorrError::Uninitialized { name: "Response" });
    }
    Ok(Signature::new(*challenge, *aggregated_response))
}

/// Check one signer's response: s_i·G + c·X_i == R_i.
///
/// A false result identifies the signer to exclude; do this before
/// aggregating, since the final check cannot say who misbehaved.
pub fn verify_response(response: &Response, challenge: &Challenge, pubkey: &PublicKey, commit_point: &Point) -> bool {
    let (s, c, r) = match (response.as_scalar(), challenge.as_scalar(), commit_point.as_both()) {
        (Some(s), Some(c), Some(r)) => (s, c, r),
        _ => {
            debug!("response verification with uninitialized input");
            return false;
        }
    };

    let expected = RistrettoPoint::vartime_double_scalar_mul_basepoint(c, pubkey.as_point(), s);
    let ok: bool = expected.compress().ct_eq(r.as_compressed()).into();
    if !ok {
        debug!(pubkey = %pubkey, "response does not match commitment");
    }
    ok
}

/// Verify a multisignature over the whole `message`.
pub fn multisig_verify(message: &[u8], signature: &Signature, aggregated_pubkey: &PublicKey) -> bool {
    let ok = signature.verify(message, aggregated_pubkey);
    if !ok {
        debug!(pubkey = %aggregated_pubkey, "multisignature rejected");
    }
    ok
}

/// Verify a multisignature over `message[offset..offset + size]`.
///
/// `Err` only for a range outside `message`; a bad signature is `Ok(false)`.
pub fn multisig_verify_range(
    message: &[u8],
    offset: usize,
    size: usize,
    signature: &Signature,
    aggregated_pubkey: &PublicKey,
) -> Result<bool, SchnorrError> {
    let ok = signature.verify_range(message, offset, size, aggregated_pubkey)?;
    if !ok {
        debug!(pubkey = %aggregated_pubkey, offset, size, "multisignature rejected");
    }
    Ok(ok)
}

fn pop_message(message_with_pubkey: &[u8]) -> Vec<u8> {
    let mut message = Vec::with_capacity(1 + message_with_pubkey.len());
    message.push(POP_DOMAIN);
    message.extend_from_slice(message_with_pubkey);
    message
}

/// Proof-of-possession: sign a message that embeds the signer's own key.
pub fn sign_key(message_with_pubkey: &[u8], keypair: &Keypair) -> Signature {
    Signature::sign(&pop_message(message_with_pubkey), keypair, &mut rand::thread_rng())
}

/// Check a proof-of-possession produced by [`sign_key`].
pub fn verify_key(message_with_pubkey: &[u8], signature: &Signature, pubkey: &PublicKey) -> bool {
    let ok = signature.verify(&pop_message(message_with_pubkey), pubkey);
    if !ok {
        debug!(pubkey = %pubkey, "proof of possession rejected");
    }
    ok
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::commitment::{Commitment, Secret};
    use rand::prelude::*;
    use rand_chacha::ChaChaRng;

    struct Signer {
        keypair: Keypair,
        commitment: Commitment,
    }

    fn signers(n: usize, seed: u8) -> Vec<Signer> {
        let mut csprng = ChaChaRng::from_seed([seed; 32]);
        (0..n)
            .map(|_| Signer {
                keypair: Keypair::generate(&mut csprng),
                commitment: Commitment::generate(&mut csprng),
            })
            .collect()
    }

    /// Runs a full round and returns the aggregated key, the challenge and
    /// every signer's response.
    fn run_round(signers: &[Signer], message: &[u8]) -> (PublicKey, Challenge, Vec<Response>) {
        let pubkeys: Vec<PublicKey> = signers.iter().map(|s| s.keypair.public).collect();
        let points: Vec<Point> = signers.iter().map(|s| s.commitment.point).collect();

        let aggregated_pubkey = aggregate_pubkeys(&pubkeys).unwrap();
        let aggregated_commit = aggregate_commits(&points).unwrap();
        let challenge = Challenge::new(&aggregated_commit, &aggregated_pubkey, message);

        let responses = signers
            .iter()
            .map(|s| Response::new(&s.commitment.secret, &challenge, &s.keypair.secret))
            .collect();
        (aggregated_pubkey, challenge, responses)
    }

    #[test]
    fn three_signers_hello() {
        let signers = signers(3, 1);
        let message = b"hello";
        let (aggregated_pubkey, challenge, responses) = run_round(&signers, message);

        for (signer, response) in signers.iter().zip(responses.iter()) {
            assert!(verify_response(
                response,
                &challenge,
                &signer.keypair.public,
                &signer.commitment.point
            ));
        }

        let aggregated_response = aggregate_responses(&responses).unwrap();
        let signature = aggregate_sign(&challenge, &aggregated_response).unwrap();
        assert!(multisig_verify(message, &signature, &aggregated_pubkey));

        // two of three responses is not a signature
        let partial = aggregate_responses(&responses[..2]).unwrap();
        let partial_signature = aggregate_sign(&challenge, &partial).unwrap();
        assert!(!multisig_verify(message, &partial_signature, &aggregated_pubkey));
    }

    #[test]
    fn single_signer_multisig_is_a_plain_signature() {
        let signers = signers(1, 2);
        let (aggregated_pubkey, challenge, responses) = run_round(&signers, b"solo");
        assert_eq!(aggregated_pubkey, signers[0].keypair.public);

        let signature = aggregate_sign(&challenge, &aggregate_responses(&responses).unwrap()).unwrap();
        assert!(signature.verify(b"solo", &signers[0].keypair.public));
    }

    #[test]
    fn aggregation_is_order_independent() {
        let signers = signers(5, 3);
        let (_, _, responses) = run_round(&signers, b"order");
        let pubkeys: Vec<PublicKey> = signers.iter().map(|s| s.keypair.public).collect();
        let points: Vec<Point> = signers.iter().map(|s| s.commitment.point).collect();

        let mut csprng = ChaChaRng::from_seed([4u8; 32]);
        let mut order: Vec<usize> = (0..signers.len()).collect();
        for _ in 0..4 {
            order.shuffle(&mut csprng);
            let shuffled_keys: Vec<PublicKey> = order.iter().map(|i| pubkeys[*i]).collect();
            let shuffled_points: Vec<Point> = order.iter().map(|i| points[*i]).collect();
            let shuffled_responses: Vec<Response> = order.iter().map(|i| responses[*i]).collect();

            assert_eq!(aggregate_pubkeys(&shuffled_keys), aggregate_pubkeys(&pubkeys));
            assert_eq!(aggregate_commits(&shuffled_points), aggregate_commits(&points));
            assert_eq!(aggregate_responses(&shuffled_responses), aggregate_responses(&responses));
        }
    }

    #[test]
    fn tampered_message_fails() {
        let signers = signers(3, 5);
        let message = b"transfer 10 coins".to_vec();
        let (aggregated_pubkey, challenge, responses) = run_round(&signers, &message);
        let signature = aggregate_sign(&challenge, &aggregate_responses(&responses).unwrap()).unwrap();
        assert!(multisig_verify(&message, &signature, &aggregated_pubkey));

        for byte in 0..message.len() {
            let mut tampered = message.clone();
            tampered[byte] ^= 0x04;
            assert!(!multisig_verify(&tampered, &signature, &aggregated_pubkey));
        }
    }

    #[test]
    fn substituted_key_fails() {
        let signers = signers(3, 6);
        let message = b"hello";
        let (aggregated_pubkey, challenge, responses) = run_round(&signers, message);
        let signature = aggregate_sign(&challenge, &aggregate_responses(&responses).unwrap()).unwrap();
        assert!(multisig_verify(message, &signature, &aggregated_pubkey));

        let outsider = Keypair::generate(&mut ChaChaRng::from_seed([7u8; 32]));
        let mut pubkeys: Vec<PublicKey> = signers.iter().map(|s| s.keypair.public).collect();
        pubkeys[1] = outsider.public;
        let forged_key = aggregate_pubkeys(&pubkeys).unwrap();
        assert!(!multisig_verify(message, &signature, &forged_key));
    }

    #[test]
    fn bad_response_is_caught_before_aggregation() {
        let signers = signers(3, 8);
        let (_, challenge, mut responses) = run_round(&signers, b"hello");

        // signer 2 answers with someone else's key
        responses[2] = Response::new(&signers[2].commitment.secret, &challenge, &signers[0].keypair.secret);
        assert!(!verify_response(
            &responses[2],
            &challenge,
            &signers[2].keypair.public,
            &signers[2].commitment.point
        ));
        // and the honest response does not verify against the wrong commitment
        assert!(!verify_response(
            &responses[0],
            &challenge,
            &signers[0].keypair.public,
            &signers[1].commitment.point
        ));
    }

    #[test]
    fn verify_response_rejects_uninitialized_input() {
        let signers = signers(1, 9);
        let (_, challenge, responses) = run_round(&signers, b"x");
        let signer = &signers[0];

        assert!(!verify_response(&Response::default(), &challenge, &signer.keypair.public, &signer.commitment.point));
        assert!(!verify_response(&responses[0], &Challenge::default(), &signer.keypair.public, &signer.commitment.point));
        assert!(!verify_response(&responses[0], &challenge, &signer.keypair.public, &Point::default()));
    }

    #[test]
    fn aggregation_preconditions() {
        assert_eq!(
            aggregate_pubkeys(&[]).unwrap_err(),
            errors::from_musig(MuSigError::BadArguments)
        );
        assert_eq!(
            aggregate_commits(&[]).unwrap_err(),
            errors::from_musig(MuSigError::BadArguments)
        );
        assert_eq!(
            aggregate_responses(&[]).unwrap_err(),
            errors::from_musig(MuSigError::BadArguments)
        );

        let signers = signers(2, 10);
        let points = vec![signers[0].commitment.point, Point::from_secret(&Secret::default())];
        assert_eq!(
            aggregate_commits(&points).unwrap_err(),
            errors::from_musig(MuSigError::UninitializedShare { index: 1 })
        );
        let responses = vec![Response::default()];
        assert_eq!(
            aggregate_responses(&responses).unwrap_err(),
            errors::from_musig(MuSigError::UninitializedShare { index: 0 })
        );
    }

    #[test]
    fn cancelling_shares_are_refused() {
        let signers = signers(1, 11);
        let pk = signers[0].keypair.public;
        let negated = PublicKey(RistrettoBoth::from_point(-pk.into_point()));
        assert_eq!(
            aggregate_pubkeys(&[pk, negated]).unwrap_err(),
            errors::from_musig(MuSigError::PointOperationFailed)
        );

        let s = Scalar::from(5u64);
        let responses = [Response::from_scalar(s), Response::from_scalar(-s)];
        assert_eq!(
            aggregate_responses(&responses).unwrap_err(),
            errors::from_musig(MuSigError::PointOperationFailed)
        );
    }

    #[test]
    fn aggregate_sign_requires_both_halves() {
        let signers = signers(1, 12);
        let (_, challenge, responses) = run_round(&signers, b"x");
        assert!(aggregate_sign(&Challenge::default(), &responses[0]).is_err());
        assert!(aggregate_sign(&challenge, &Response::default()).is_err());
        assert_eq!(
            aggregate_sign(&challenge, &responses[0]).unwrap().to_bytes()[..32],
            challenge.to_bytes()[..]
        );
    }

    #[test]
    fn ranged_multisig() {
        let signers = signers(3, 13);
        let buffer = b"HEADERhello";
        let (aggregated_pubkey, challenge, responses) = run_round(&signers, &buffer[6..]);
        let signature = aggregate_sign(&challenge, &aggregate_responses(&responses).unwrap()).unwrap();

        assert_eq!(multisig_verify_range(buffer, 6, 5, &signature, &aggregated_pubkey), Ok(true));
        assert!(multisig_verify(b"hello", &signature, &aggregated_pubkey));
        assert_eq!(multisig_verify_range(buffer, 0, 5, &signature, &aggregated_pubkey), Ok(false));
        assert!(matches!(
            multisig_verify_range(buffer, 6, 6, &signature, &aggregated_pubkey),
            Err(SchnorrError::RangeError { offset: 6, size: 6, length: 11 })
        ));
    }

    #[test]
    fn proof_of_possession() {
        let keypair = Keypair::generate(&mut thread_rng());
        let other = Keypair::generate(&mut thread_rng());

        let mut message = b"register:".to_vec();
        message.extend_from_slice(keypair.public.as_bytes());

        let pop = sign_key(&message, &keypair);
        assert!(verify_key(&message, &pop, &keypair.public));
        assert!(!verify_key(&message, &pop, &other.public));
        assert!(!verify_key(b"register:", &pop, &keypair.public));

        // a PoP is not a plain signature over the same bytes
        assert!(!multisig_verify(&message, &pop, &keypair.public));
    }
}
