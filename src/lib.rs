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

//
// EC-Schnorr multisignatures via ristretto
//

// Modified From the hard work off:
// Authors:
// - Isis Agora Lovecruft <isis@patternsinthevoid.net>
// - Jeff Burdges <jeff@web3.foundation>
// - The Tari Project Authors

//Useful links:
//https://blockstream.com/2018/01/23/musig-key-aggregation-schnorr-signatures/
//https://eprint.iacr.org/2018/068

//! Interactive n-of-n Schnorr multisignatures.
//!
//! Signers run a commit / challenge / response round; the aggregated
//! result is an ordinary [`Signature`] under the sum of their public keys.
//! Proofs of possession ([`sign_key`], [`verify_key`]) guard the key
//! aggregation against rogue keys. All values carry a fixed-width
//! big-endian wire encoding through [`Serializable`].

#[macro_use]
mod ser;

mod errors;
pub use errors::{MuSigError, SchnorrError};
pub use ser::Serializable;

pub mod tools;
pub use crate::tools::{CHALLENGE_DOMAIN, POINT_HASH_DOMAIN, POINT_LENGTH, POP_DOMAIN, SCALAR_LENGTH};

pub mod keys;
pub use crate::keys::*;

mod commitment;
pub use crate::commitment::{generate_commitment, Commitment, Point, PointHash, Secret};

mod challenge;
pub use crate::challenge::Challenge;

mod response;
pub use crate::response::Response;

pub mod signature;
pub use crate::signature::{Signature, SIGNATURE_LENGTH};

mod multisig;
pub use crate::multisig::{
    aggregate_commits,
    aggregate_pubkeys,
    aggregate_responses,
    aggregate_sign,
    multisig_verify,
    multisig_verify_range,
    sign_key,
    verify_key,
    verify_response,
};
