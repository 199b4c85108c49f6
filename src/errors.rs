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

//! Errors which may occur when decoding protocol values from byte streams,
//! aggregating shares, or slicing messages.

use thiserror::Error;

/// Represents an error in key, commitment, or response aggregation.
#[derive(Error, Clone, Debug, Eq, PartialEq)]
pub enum MuSigError {
    /// Aggregation was asked to combine nothing.
    #[error("Bad arguments")]
    BadArguments,

    /// A share handed to aggregation was never initialized
    #[error("Share at index {index} is not initialized")]
    UninitializedShare {
        /// Position of the offending share in the input slice
        index: usize,
    },

    /// The aggregate is the identity point or the zero scalar.
    #[error("Point operation failed")]
    PointOperationFailed,

    /// The public half of a keypair does not match its secret half
    #[error("Public key does not belong to the secret key")]
    KeypairMismatch,
}

/// Internal errors.  Most application-level developers will likely not
/// need to pay any attention to these.
#[derive(Eq, PartialEq, Debug, Error, Clone)]
pub enum SchnorrError {
    /// Invalid point provided.
    #[error("Cannot decompress Ristretto point")]
    PointDecompressionError,

    /// The point decoded to the group identity.
    #[error("Point is the identity element")]
    IdentityPoint,

    /// Invalid scalar provided.
    #[error("Scalar is zero or not reduced modulo the group order")]
    ScalarFormatError,

    /// The byte stream ended before a full value could be read.
    #[error("{name} needs {length} bytes at offset {offset}, stream holds {available}")]
    BytesLengthError {
        /// Type being decoded
        name: &'static str,
        /// Fixed width of its encoding
        length: usize,
        /// Where reading started
        offset: usize,
        /// Total length of the stream
        available: usize,
    },

    /// A message sub-range reaches past the end of the buffer.
    #[error("Range [{offset}, {offset}+{size}) exceeds message of {length} bytes")]
    RangeError {
        /// Start of the requested range
        offset: usize,
        /// Number of requested bytes
        size: usize,
        /// Length of the buffer
        length: usize,
    },

    /// An operation needed an initialized value.
    #[error("{name} is not initialized")]
    Uninitialized {
        /// Type that was found uninitialized
        name: &'static str,
    },

    /// Musig
    #[error("Absent {kind:?} violated multi-signature protocol")]
    MuSig { kind: MuSigError },
}

/// Helper function to convert a musig error into schnorr error
pub fn from_musig(err: MuSigError) -> SchnorrError {
    SchnorrError::MuSig { kind: err }
}
